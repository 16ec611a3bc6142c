//! OHLCV (Open, High, Low, Close, Volume) data types.

use serde::{Deserialize, Serialize};

use super::Timeframe;
use crate::error::SeriesError;

/// One OHLC(V) observation.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded (or tick) volume, when the feed provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    /// Create a new bar without volume.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// Attach a volume figure.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Check OHLC consistency: finite prices, high/low bracketing open and close,
    /// and non-negative finite volume.
    pub fn validate(&self) -> Result<(), String> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err("non-finite price".into());
        }
        if self.high < self.low {
            return Err(format!("high {} below low {}", self.high, self.low));
        }
        if self.high < self.open.max(self.close) {
            return Err(format!("high {} below open/close", self.high));
        }
        if self.low > self.open.min(self.close) {
            return Err(format!("low {} above open/close", self.low));
        }
        if let Some(volume) = self.volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(format!("invalid volume {}", volume));
            }
        }
        Ok(())
    }
}

/// Price column selector used by indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

/// An immutable, validated window of bars ordered by strictly increasing timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series, rejecting empty input, malformed bars and out-of-order
    /// timestamps.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        for (index, bar) in bars.iter().enumerate() {
            bar.validate()
                .map_err(|reason| SeriesError::MalformedBar { index, reason })?;
        }
        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(SeriesError::NonIncreasingTimestamp {
                index: index + 1,
                timestamp: bars[index + 1].timestamp,
                previous: bars[index].timestamp,
            });
        }

        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        })
    }

    /// Build a series from the most recent `window` bars.
    pub fn most_recent(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        mut bars: Vec<Bar>,
        window: usize,
    ) -> Result<Self, SeriesError> {
        if bars.len() > window {
            bars.drain(..bars.len() - window);
        }
        Self::new(symbol, timeframe, bars)
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Extract one price column.
    pub fn field(&self, field: PriceField) -> Vec<f64> {
        self.bars
            .iter()
            .map(|b| match field {
                PriceField::Open => b.open,
                PriceField::High => b.high,
                PriceField::Low => b.low,
                PriceField::Close => b.close,
            })
            .collect()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.field(PriceField::Close)
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.field(PriceField::High)
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.field(PriceField::Low)
    }

    /// Extract volumes, or `None` unless every bar carries one.
    pub fn volumes(&self) -> Option<Vec<f64>> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar::new(ts, close, close + 1.0, close - 1.0, close).with_volume(1000.0)
    }

    #[test]
    fn test_bar_validation() {
        assert!(Bar::new(1, 100.0, 101.0, 99.0, 100.5).validate().is_ok());
        assert!(Bar::new(1, 100.0, 99.0, 101.0, 100.0).validate().is_err());
        assert!(Bar::new(1, 100.0, 100.2, 99.0, 100.5).validate().is_err());
        assert!(Bar::new(1, 100.0, 101.0, 99.0, f64::NAN).validate().is_err());
        assert!(Bar::new(1, 100.0, 101.0, 99.0, 100.0)
            .with_volume(-1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_series_rejects_malformed_bar() {
        let bars = vec![bar(1, 100.0), Bar::new(2, 100.0, 98.0, 99.0, 100.0)];
        let err = PriceSeries::new("EURUSD", Timeframe::Hour1, bars).unwrap_err();
        assert!(matches!(err, SeriesError::MalformedBar { index: 1, .. }));
    }

    #[test]
    fn test_series_rejects_unordered_timestamps() {
        let bars = vec![bar(1, 100.0), bar(3, 101.0), bar(3, 102.0)];
        let err = PriceSeries::new("EURUSD", Timeframe::Hour1, bars).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NonIncreasingTimestamp {
                index: 2,
                timestamp: 3,
                previous: 3
            }
        );
    }

    #[test]
    fn test_series_rejects_empty() {
        let err = PriceSeries::new("EURUSD", Timeframe::Hour1, vec![]).unwrap_err();
        assert_eq!(err, SeriesError::Empty);
    }

    #[test]
    fn test_most_recent_trims_window() {
        let bars: Vec<Bar> = (0..10).map(|i| bar(i, 100.0 + i as f64)).collect();
        let series = PriceSeries::most_recent("EURUSD", Timeframe::Hour1, bars, 4).unwrap();

        assert_eq!(series.len(), 4);
        assert_eq!(series.get(0).unwrap().timestamp, 6);
        assert_eq!(series.last().unwrap().timestamp, 9);
    }

    #[test]
    fn test_series_extractions() {
        let series =
            PriceSeries::new("EURUSD", Timeframe::Hour1, vec![bar(1, 100.5), bar(2, 101.5)])
                .unwrap();

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.highs(), vec![101.5, 102.5]);
        assert_eq!(series.volumes(), Some(vec![1000.0, 1000.0]));
    }

    #[test]
    fn test_volumes_absent_when_any_bar_lacks_volume() {
        let bars = vec![bar(1, 100.0), Bar::new(2, 100.0, 101.0, 99.0, 100.0)];
        let series = PriceSeries::new("EURUSD", Timeframe::Hour1, bars).unwrap();
        assert!(series.volumes().is_none());
    }
}
