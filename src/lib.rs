//! Apiary - Options-Flow Signal Ranking Engine Library
//!
//! Ingests streams of market/options-flow events and produces a ranked
//! list of actionable trade ideas.
//!
//! # Modules
//!
//! - `domain`: Core types (RawEvent, BiasContext, ScoredSignal, ...)
//! - `strategy`: The pipeline stages (NoveltyFilter, SignalValidator,
//!   BiasClassifier, CompositeScorer, ProfileSelector, BenchmarkTracker)
//! - `ports`: Trait abstractions (BiasProvider, PriceHistoryPort,
//!   DailyBiasPort, OutputSink)
//! - `application`: The SignalEngine pipeline coordinator
//! - `adapters`: CLI, JSONL feed, console sink, session providers
//! - `config`: Configuration loading and validation

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod strategy;
