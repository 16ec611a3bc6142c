//! Market data provider trait.

use crate::error::DataError;
use crate::types::{PriceSeries, Timeframe};
use async_trait::async_trait;

/// Supplies the most recent fixed-length window of bars for a symbol.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch up to `count` of the most recent bars, oldest first.
    ///
    /// Fails with [`DataError::SymbolNotFound`] when the symbol/timeframe
    /// pair is unsupported and [`DataError::NoDataAvailable`] when it is empty.
    async fn fetch_recent(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<PriceSeries, DataError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}
