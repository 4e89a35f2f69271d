//! CLI subcommand implementations.

pub mod current;
pub mod stats;
