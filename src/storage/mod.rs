//! Client-side persistent state
//!
//! Key-value storage for the data mode and bearer token, backed by a JSON
//! file or by memory.

mod state;

pub use state::*;
