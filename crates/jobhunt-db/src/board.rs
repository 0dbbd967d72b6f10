//! Board posts, comments and likes.
//!
//! `posts.like_count` and `posts.comment_count` are derived from the `likes`
//! and `comments` tables. Every statement that changes either table runs in
//! the same transaction as the matching counter update, so the two never
//! disagree between operations.

use rusqlite::{Connection, Row, params};

use jobhunt_types::api::{NewComment, NewPost};
use jobhunt_types::models::{Comment, Post, PostDetail, PostView};

use crate::error::OptionalExt;
use crate::{Database, StoreError, StoreResult};

impl Database {
    // -- Posts --

    pub fn create_post(&self, author_id: i64, new: &NewPost) -> StoreResult<Post> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (title, content, display_name, user_id) VALUES (?1, ?2, ?3, ?4)",
                params![new.title, new.content, new.display_name, author_id],
            )?;
            let id = conn.last_insert_rowid();
            query_post(conn, id)?.ok_or(StoreError::NotFound)
        })
    }

    /// Newest first, each row flagged with whether `viewer_id` liked it.
    pub fn list_posts(&self, viewer_id: i64, limit: u32, offset: u32) -> StoreResult<Vec<PostView>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.*,
                        EXISTS(SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = ?1) AS is_liked
                 FROM posts p
                 ORDER BY p.created_at DESC, p.id DESC
                 LIMIT ?2 OFFSET ?3",
            )?;

            let rows = stmt
                .query_map(params![viewer_id, limit, offset], |row| {
                    Ok(PostView {
                        post: post_from_row(row)?,
                        is_liked: row.get("is_liked")?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_post(&self, id: i64) -> StoreResult<Option<Post>> {
        self.with_conn(|conn| query_post(conn, id))
    }

    /// A post with its comments and the viewer's like state, read under one lock.
    pub fn get_post_detail(&self, viewer_id: i64, id: i64) -> StoreResult<Option<PostDetail>> {
        self.with_conn(|conn| {
            let Some(post) = query_post(conn, id)? else {
                return Ok(None);
            };
            let is_liked = query_is_liked(conn, id, viewer_id)?;
            let comments = query_comments(conn, id)?;
            Ok(Some(PostDetail {
                post,
                is_liked,
                comments,
            }))
        })
    }

    /// Comments and likes of the post go with it (`ON DELETE CASCADE`).
    pub fn delete_post(&self, id: i64, author_id: i64) -> StoreResult<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM posts WHERE id = ?1 AND user_id = ?2",
                [id, author_id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    // -- Likes --

    /// Returns `true` if a like was recorded, `false` if the user had already
    /// liked the post.
    pub fn like_post(&self, post_id: i64, user_id: i64) -> StoreResult<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            ensure_post_exists(&tx, post_id)?;

            let inserted = tx.execute(
                "INSERT OR IGNORE INTO likes (post_id, user_id) VALUES (?1, ?2)",
                [post_id, user_id],
            )?;
            if inserted == 0 {
                return Ok(false);
            }

            tx.execute(
                "UPDATE posts SET like_count = like_count + 1 WHERE id = ?1",
                [post_id],
            )?;
            tx.commit()?;
            Ok(true)
        })
    }

    /// Returns `true` if a like was removed. The counter only moves when a
    /// row actually went away; a missing post is `NotFound`, as for likes.
    pub fn unlike_post(&self, post_id: i64, user_id: i64) -> StoreResult<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            ensure_post_exists(&tx, post_id)?;

            let removed = tx.execute(
                "DELETE FROM likes WHERE post_id = ?1 AND user_id = ?2",
                [post_id, user_id],
            )?;
            if removed == 0 {
                return Ok(false);
            }

            tx.execute(
                "UPDATE posts SET like_count = like_count - 1 WHERE id = ?1",
                [post_id],
            )?;
            tx.commit()?;
            Ok(true)
        })
    }

    pub fn is_liked(&self, post_id: i64, user_id: i64) -> StoreResult<bool> {
        self.with_conn(|conn| query_is_liked(conn, post_id, user_id))
    }

    // -- Comments --

    pub fn create_comment(
        &self,
        post_id: i64,
        user_id: i64,
        new: &NewComment,
    ) -> StoreResult<Comment> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            ensure_post_exists(&tx, post_id)?;

            tx.execute(
                "INSERT INTO comments (content, display_name, post_id, user_id) VALUES (?1, ?2, ?3, ?4)",
                params![new.content, new.display_name, post_id, user_id],
            )?;
            let id = tx.last_insert_rowid();

            tx.execute(
                "UPDATE posts SET comment_count = comment_count + 1 WHERE id = ?1",
                [post_id],
            )?;

            let comment = tx
                .query_row("SELECT * FROM comments WHERE id = ?1", [id], comment_from_row)
                .optional()?
                .ok_or(StoreError::NotFound)?;
            tx.commit()?;
            Ok(comment)
        })
    }

    /// Oldest first.
    pub fn list_comments(&self, post_id: i64) -> StoreResult<Vec<Comment>> {
        self.with_conn(|conn| query_comments(conn, post_id))
    }
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        display_name: row.get("display_name")?,
        like_count: row.get("like_count")?,
        comment_count: row.get("comment_count")?,
        user_id: row.get("user_id")?,
        created_at: row.get("created_at")?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        content: row.get("content")?,
        display_name: row.get("display_name")?,
        post_id: row.get("post_id")?,
        user_id: row.get("user_id")?,
        created_at: row.get("created_at")?,
    })
}

fn query_post(conn: &Connection, id: i64) -> StoreResult<Option<Post>> {
    conn.query_row("SELECT * FROM posts WHERE id = ?1", [id], post_from_row)
        .optional()
}

fn ensure_post_exists(conn: &Connection, post_id: i64) -> StoreResult<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1)",
        [post_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

fn query_is_liked(conn: &Connection, post_id: i64, user_id: i64) -> StoreResult<bool> {
    let liked = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE post_id = ?1 AND user_id = ?2)",
        [post_id, user_id],
        |row| row.get(0),
    )?;
    Ok(liked)
}

fn query_comments(conn: &Connection, post_id: i64) -> StoreResult<Vec<Comment>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM comments WHERE post_id = ?1 ORDER BY created_at ASC, id ASC",
    )?;
    let rows = stmt
        .query_map([post_id], comment_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
