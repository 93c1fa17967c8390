//! CLI Command Definitions
//!
//! Argument parsing for the apiary binary using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Apiary - Options-Flow Signal Ranking Engine
#[derive(Parser, Debug)]
#[command(
    name = "apiary",
    version = env!("CARGO_PKG_VERSION"),
    about = "Options-flow signal ranking engine",
    long_about = "Apiary filters raw options-flow events through a novelty gate and \
                  strategy rules, classifies them against the market bias, scores \
                  them and emits a ranked list of trade ideas."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest a JSONL event feed and emit ranked ideas
    Run(RunCmd),

    /// Evaluate a single event from a JSON file
    Score(ScoreCmd),

    /// Run the benchmark tracker once
    Benchmark(BenchmarkCmd),
}

/// Ingest a feed
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Path to the JSONL event feed
    #[arg(short, long, value_name = "FILE")]
    pub feed: PathBuf,

    /// Session bias level (URSA_MAJOR .. TORO_MAJOR)
    #[arg(long, value_name = "LEVEL", default_value = "NEUTRAL")]
    pub bias: String,

    /// Session market zone (MAX_LONG, RECOVERY, CHOP, DISTRIBUTION, WATERFALL, CAPITULATION)
    #[arg(long, value_name = "ZONE", default_value = "CHOP")]
    pub zone: String,
}

/// Evaluate one event
#[derive(Parser, Debug)]
pub struct ScoreCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Path to a JSON file holding one raw event
    #[arg(short, long, value_name = "FILE")]
    pub event: PathBuf,

    /// Session bias level
    #[arg(long, value_name = "LEVEL", default_value = "NEUTRAL")]
    pub bias: String,

    /// Session market zone
    #[arg(long, value_name = "ZONE", default_value = "CHOP")]
    pub zone: String,
}

/// Run the benchmark tracker
#[derive(Parser, Debug)]
pub struct BenchmarkCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// JSONL file of daily closes for the reference instrument
    #[arg(long, value_name = "FILE")]
    pub prices: PathBuf,

    /// JSONL file of daily bias signs
    #[arg(long, value_name = "FILE")]
    pub signs: PathBuf,

    /// Append the computed row to this JSONL archive
    #[arg(long, value_name = "FILE")]
    pub archive: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let app = CliApp::try_parse_from([
            "apiary", "run", "--feed", "events.jsonl", "--bias", "TORO_MAJOR", "--zone",
            "MAX_LONG",
        ])
        .unwrap();
        match app.command {
            Command::Run(cmd) => {
                assert_eq!(cmd.feed, PathBuf::from("events.jsonl"));
                assert_eq!(cmd.bias, "TORO_MAJOR");
                assert_eq!(cmd.zone, "MAX_LONG");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_verbose_flag() {
        let app = CliApp::try_parse_from(["apiary", "-v", "score", "--event", "e.json"]).unwrap();
        assert!(app.verbose);
    }

    #[test]
    fn test_benchmark_requires_inputs() {
        assert!(CliApp::try_parse_from(["apiary", "benchmark"]).is_err());
    }
}
