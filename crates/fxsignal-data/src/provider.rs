//! Directory of per-symbol CSV files exposed as a market data provider.

use async_trait::async_trait;
use fxsignal_core::error::DataError;
use fxsignal_core::traits::MarketDataProvider;
use fxsignal_core::types::{PriceSeries, Timeframe};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::csv_source::read_bars;

/// Serves bars from `<root>/<SYMBOL>_<tf>.csv` files.
///
/// `<root>/<symbol>_<tf>.csv` (lowercase) and `<root>/<SYMBOL>/<tf>.csv`
/// are accepted too.
#[derive(Debug, Clone)]
pub struct CsvDirectoryProvider {
    root: PathBuf,
}

impl CsvDirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, symbol: &str, timeframe: Timeframe) -> [PathBuf; 3] {
        let tf = timeframe.code();
        [
            self.root.join(format!("{}_{}.csv", symbol, tf)),
            self.root.join(format!("{}_{}.csv", symbol.to_lowercase(), tf)),
            self.root.join(symbol).join(format!("{}.csv", tf)),
        ]
    }

    /// First existing file for the pair.
    pub fn resolve(&self, symbol: &str, timeframe: Timeframe) -> Option<PathBuf> {
        self.candidates(symbol, timeframe)
            .into_iter()
            .find(|path| path.is_file())
    }
}

#[async_trait]
impl MarketDataProvider for CsvDirectoryProvider {
    async fn fetch_recent(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<PriceSeries, DataError> {
        let path = self
            .resolve(symbol, timeframe)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            })?;
        debug!(symbol, %timeframe, path = %path.display(), "Reading bars");

        let bars = read_bars(&path).await?;
        if bars.is_empty() || count == 0 {
            return Err(DataError::NoDataAvailable(format!("{} {}", symbol, timeframe)));
        }
        Ok(PriceSeries::most_recent(symbol, timeframe, bars, count)?)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
