//! Ports Layer - Trait definitions for external collaborators
//!
//! Following hexagonal architecture, these traits abstract:
//! - Bias readings (current level, alignment, market zone)
//! - Historical market data (daily closes, daily bias signs)
//! - The output sink for ranked ideas and benchmark rows

pub mod bias;
pub mod market_data;
pub mod mocks;
pub mod sink;

pub use bias::{BiasProvider, ProviderError};
pub use market_data::{DailyBiasPort, DailyClose, PriceHistoryPort};
pub use sink::{MemorySink, OutputSink, SinkError};
