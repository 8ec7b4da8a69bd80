//! Configuration module for Telecom IMS
//!
//! Command-line arguments with environment fallbacks, and the settings the
//! application context is built from.

mod settings;

pub use settings::*;
