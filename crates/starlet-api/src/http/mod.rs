//! HTTP/REST API layer for Starlet.
//!
//! One persona per server. Errors are `{ "detail": ... }` bodies with a
//! matching status code.

pub mod error;
pub mod handlers;
pub mod router;
