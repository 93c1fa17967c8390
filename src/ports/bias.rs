//! Bias provider port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{BiasContext, Direction, MarketZone, Timeframe};

/// Provider-side error type shared by the read-only data ports
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("No data for {0}")]
    NoData(String),

    #[error("Malformed provider payload: {0}")]
    Malformed(String),
}

/// Source of the current market bias reading.
///
/// The alignment flag is derived by the provider from the requested
/// trade direction; pipeline stages never re-derive it.
#[async_trait]
pub trait BiasProvider: Send + Sync {
    /// Current bias level and whether it agrees with `direction`
    async fn current_bias(
        &self,
        timeframe: Timeframe,
        direction: Direction,
    ) -> Result<BiasContext, ProviderError>;

    /// Current market-structure zone
    async fn current_zone(&self) -> Result<MarketZone, ProviderError>;
}
