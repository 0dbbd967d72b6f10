use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of a user's application tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyList {
    pub id: i64,
    pub company: String,
    pub occupation: String,
    pub member: i64,
    pub selection: String,
    pub intern: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An internship the user applied to or joined.
///
/// `dailystart`/`dailyfinish` are opaque integers chosen by the client
/// (typically time-of-day codes such as `930` for 09:30).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Internship {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub dailystart: i64,
    pub dailyfinish: i64,
    pub content: String,
    pub selection: String,
    pub joined: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Board post. The counters are maintained by the storage layer and are
/// never taken from a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub display_name: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub display_name: String,
    pub post_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A post as seen by one viewer in the board listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub is_liked: bool,
}

/// A single post with its comments, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    pub is_liked: bool,
    pub comments: Vec<Comment>,
}
