//! Timewarrior tools CLI library.
//!
//! This crate provides the CLI interface on top of `tw-core`.

mod cli;
pub mod commands;
mod config;
pub mod timew;

pub use cli::{Cli, Commands};
pub use config::{Config, FetchFailurePolicy};
