//! Application context
//!
//! [`AppContext`] owns the data-mode switch, both data sources and the
//! notifier. Queries and mutations built from it resolve the active source
//! at the moment each request is issued.

mod app;

pub use app::*;
