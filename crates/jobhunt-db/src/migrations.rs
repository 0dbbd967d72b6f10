use rusqlite::Connection;
use tracing::info;

use crate::StoreResult;

pub fn run(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("running migration v1 (initial schema)");
        // Millisecond timestamps so comment order survives bursts within one second.
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            );

            CREATE TABLE company_lists (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                company     TEXT NOT NULL,
                occupation  TEXT NOT NULL DEFAULT '',
                member      INTEGER NOT NULL,
                selection   TEXT NOT NULL DEFAULT '',
                intern      INTEGER NOT NULL DEFAULT 0,
                user_id     INTEGER NOT NULL REFERENCES users(id),
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
                updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            );

            CREATE INDEX idx_company_lists_user ON company_lists(user_id);
            CREATE INDEX idx_company_lists_member ON company_lists(member);

            CREATE TABLE internships (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                title       TEXT NOT NULL,
                company     TEXT NOT NULL,
                dailystart  INTEGER NOT NULL,
                dailyfinish INTEGER NOT NULL,
                content     TEXT NOT NULL DEFAULT '',
                selection   TEXT NOT NULL,
                joined      INTEGER NOT NULL DEFAULT 0,
                user_id     INTEGER NOT NULL REFERENCES users(id),
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
                updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            );

            CREATE INDEX idx_internships_user ON internships(user_id);

            CREATE TABLE posts (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                title          TEXT NOT NULL,
                content        TEXT NOT NULL,
                display_name   TEXT NOT NULL,
                like_count     INTEGER NOT NULL DEFAULT 0 CHECK (like_count >= 0),
                comment_count  INTEGER NOT NULL DEFAULT 0 CHECK (comment_count >= 0),
                user_id        INTEGER NOT NULL REFERENCES users(id),
                created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            );

            CREATE INDEX idx_posts_created ON posts(created_at);
            CREATE INDEX idx_posts_user ON posts(user_id);

            CREATE TABLE comments (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                content       TEXT NOT NULL,
                display_name  TEXT NOT NULL,
                post_id       INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                user_id       INTEGER NOT NULL REFERENCES users(id),
                created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            );

            CREATE INDEX idx_comments_post ON comments(post_id, created_at);

            CREATE TABLE likes (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                user_id     INTEGER NOT NULL REFERENCES users(id),
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
                UNIQUE(post_id, user_id)
            );

            CREATE INDEX idx_likes_user ON likes(user_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }
}
