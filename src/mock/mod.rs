//! Mock data-access layer
//!
//! Serves every read endpoint from the fixture store after an artificial
//! delay, and answers writes with a success envelope without touching the
//! store. Responses use the same envelope as the live client.

mod routes;
mod source;

pub use routes::{paged, WriteTarget, DEFAULT_PAGE_LIMIT, STATUS_NOT_FOUND};
pub use source::*;
