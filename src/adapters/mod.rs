//! Adapters Layer - Thin shells around the core
//!
//! Implementations of the port traits plus the CLI surface:
//! - cli: clap command definitions
//! - feed: JSONL event source for replay/ingestion
//! - console: stdout sink for ideas, JSONL archive for benchmark rows
//! - providers: session bias and file-backed history providers

pub mod cli;
pub mod console;
pub mod feed;
pub mod providers;

pub use console::ConsoleSink;
pub use feed::{read_events, FeedBatch, FeedError};
pub use providers::{JsonlDailyBias, JsonlPriceHistory, NoHistory, SessionBiasProvider};
