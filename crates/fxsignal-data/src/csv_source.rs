//! CSV bar parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use fxsignal_core::error::DataError;
use fxsignal_core::types::Bar;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One CSV row. Header names vary between exports.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Time",
        alias = "Date",
        alias = "date",
        alias = "timestamp",
        alias = "Timestamp",
        alias = "datetime",
        alias = "Datetime"
    )]
    time: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close", alias = "Adj Close")]
    close: f64,
    #[serde(
        default,
        alias = "Volume",
        alias = "tick_volume",
        alias = "TickVolume",
        alias = "tickvol"
    )]
    volume: Option<f64>,
}

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Parse a timestamp cell into Unix milliseconds.
///
/// Accepts RFC 3339, common datetime and date layouts (read as UTC), and
/// Unix seconds or milliseconds.
pub fn parse_timestamp(raw: &str) -> Result<i64, DataError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp_millis());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    if let Ok(ts) = raw.parse::<i64>() {
        // More than 10 digits can only be milliseconds
        return Ok(if ts.abs() > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!("Could not parse timestamp: {}", raw)))
}

/// Parse bars from CSV text, oldest first.
///
/// Rows are sorted by timestamp; ordering and OHLC consistency are checked
/// later when the bars become a series.
pub fn parse_bars<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (row, result) in reader.deserialize::<CsvRecord>().enumerate() {
        let record =
            result.map_err(|e| DataError::ParseError(format!("row {}: {}", row + 1, e)))?;
        let timestamp = parse_timestamp(&record.time)?;

        let bar = Bar::new(timestamp, record.open, record.high, record.low, record.close);
        bars.push(match record.volume {
            Some(volume) => bar.with_volume(volume),
            None => bar,
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

/// Read and parse a CSV file.
pub async fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
    let content = tokio::fs::read(path).await?;
    parse_bars(content.as_slice())
}
