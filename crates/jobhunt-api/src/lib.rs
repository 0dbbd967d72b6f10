//! HTTP surface of the jobhunt backend: token issuance and verification,
//! the bearer-token guard, and the handlers for the tracker and the board.

pub mod auth;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod password;
pub mod posts;
pub mod router;
pub mod token;
pub mod tracker;

pub use auth::{AppState, AppStateInner};
pub use error::{ApiError, ApiResult};
pub use router::router;
