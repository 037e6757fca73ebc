//! Domain model: identifiers and solution snapshots.

pub mod solution;
pub mod types;
