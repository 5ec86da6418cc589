//! Shared utilities.
//!
//! Hashing, slash-path helpers and test helpers.

pub mod hash;
pub mod path;

#[cfg(test)]
pub mod testutil;
