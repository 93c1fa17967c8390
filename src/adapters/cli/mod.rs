//! CLI Adapter
//!
//! Command-line interface for the apiary engine.
//! Uses clap derive macros for argument parsing.

pub mod commands;

pub use commands::{BenchmarkCmd, CliApp, Command, RunCmd, ScoreCmd};
