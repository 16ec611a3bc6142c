//! Market data for the signal scanner.
//!
//! Bars come from CSV exports, one file per symbol and timeframe.

mod csv_source;
mod provider;

pub use csv_source::{parse_bars, parse_timestamp, read_bars};
pub use provider::CsvDirectoryProvider;

use fxsignal_core::error::DataError;
use fxsignal_core::types::{PriceSeries, Timeframe};
use std::path::Path;

/// Load a whole CSV file as a validated series.
pub async fn load_csv(
    path: impl AsRef<Path>,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<PriceSeries, DataError> {
    let bars = read_bars(path.as_ref()).await?;
    if bars.is_empty() {
        return Err(DataError::NoDataAvailable(path.as_ref().display().to_string()));
    }
    Ok(PriceSeries::new(symbol, timeframe, bars)?)
}
