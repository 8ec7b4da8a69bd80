//! Data-mode switch
//!
//! Selects between the in-memory mock layer and the live REST API, and
//! provides the labels used by mode indicators.

mod switch;

pub use switch::*;
