//! Shared record and wire types for the jobhunt backend.
//!
//! `models` holds the persisted records as they leave the storage layer,
//! `api` the request/response bodies, and `validate` the field checks run on
//! every inbound body before it reaches storage.

pub mod api;
pub mod models;
pub mod validate;
