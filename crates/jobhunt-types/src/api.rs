use serde::{Deserialize, Serialize};

use validator::Validate;

// -- JWT Claims --

/// Claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iat: usize,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

impl RegisterRequest {
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: i64,
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// -- Tracker --

/// Writable fields of a company list entry. The owner is never part of the
/// body; it always comes from the authenticated caller.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CompanyListFields {
    #[validate(length(min = 1, message = "is required"))]
    pub company: String,
    #[serde(default)]
    pub occupation: String,
    #[validate(range(min = 1, message = "must be a positive number"))]
    pub member: i64,
    #[serde(default)]
    pub selection: String,
    #[serde(default)]
    pub intern: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct InternshipFields {
    #[validate(length(min = 1, message = "is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub company: String,
    pub dailystart: i64,
    pub dailyfinish: i64,
    #[serde(default)]
    pub content: String,
    #[validate(length(min = 1, message = "is required"))]
    pub selection: String,
    #[serde(default)]
    pub joined: bool,
}

// -- Board --

/// `display_name` is a free pseudonym of at most 20 characters.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewPost {
    #[validate(length(min = 1, message = "is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub content: String,
    #[validate(length(min = 1, max = 20, message = "must be 1 to 20 characters"))]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewComment {
    #[validate(length(min = 1, message = "is required"))]
    pub content: String,
    #[validate(length(min = 1, max = 20, message = "must be 1 to 20 characters"))]
    pub display_name: String,
}

pub const DEFAULT_PAGE_LIMIT: u32 = 20;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub post_id: i64,
    pub liked: bool,
}
