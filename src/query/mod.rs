//! Generic read and write primitives
//!
//! [`Query`] tracks one read with last-issued-wins ordering and
//! stale-on-error data; [`Mutation`] performs writes and reports them.
//! Both are indifferent to which data mode serves them.

mod mutation;
mod read;

pub use mutation::*;
pub use read::*;
