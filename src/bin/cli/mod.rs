//! CLI Module Organization
//!
//! - args: CLI argument structures
//! - commands: command execution
//! - config_layer: configuration layering and CLI overrides
//! - output: summaries, progress and report writing
//! - prompt: interactive project strategy selection

pub mod args;
pub mod commands;
pub mod config_layer;
pub mod output;
pub mod prompt;

pub use args::*;
pub use commands::*;
