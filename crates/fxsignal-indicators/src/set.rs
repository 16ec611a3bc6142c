//! Memoized indicator lines over one price series.
//!
//! Strategies ask an [`IndicatorSet`] for the lines they need; the first
//! request computes the line and every later request with the same
//! parameters shares it. Lines are aligned with the series, so index `i` of
//! any line refers to bar `i`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fxsignal_core::error::IndicatorError;
use fxsignal_core::traits::Indicator;
use fxsignal_core::types::{PriceField, PriceSeries};

use crate::extrema::{RollingMax, RollingMin};
use crate::momentum::{Macd, MacdOutput, Rsi};
use crate::moving_average::{rolling_mean, Ema, Sma};
use crate::require_period;
use crate::trend::DirectionalIndex;
use crate::volatility::{true_range, Atr, StdDev};
use crate::volume::VolumeRatio;

/// A shared, immutable indicator series aligned with the bars.
pub type Line = Arc<[Option<f64>]>;

/// Checked access into aligned lines.
pub trait LineExt {
    /// Value at bar `index`, `None` when out of range or undefined.
    fn at(&self, index: usize) -> Option<f64>;

    /// Value at the most recent bar.
    fn latest(&self) -> Option<f64>;
}

impl LineExt for [Option<f64>] {
    #[inline]
    fn at(&self, index: usize) -> Option<f64> {
        self.get(index).copied().flatten()
    }

    #[inline]
    fn latest(&self) -> Option<f64> {
        self.last().copied().flatten()
    }
}

/// MACD, signal and histogram lines.
#[derive(Debug, Clone)]
pub struct MacdLines {
    pub macd: Line,
    pub signal: Line,
    pub histogram: Line,
}

/// Bollinger band lines.
#[derive(Debug, Clone)]
pub struct BandLines {
    pub upper: Line,
    pub middle: Line,
    pub lower: Line,
}

/// +DI, -DI and ADX lines.
#[derive(Debug, Clone)]
pub struct TrendLines {
    pub plus_di: Line,
    pub minus_di: Line,
    pub adx: Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Key {
    Sma(PriceField, usize),
    Ema(PriceField, usize),
    Rsi(usize),
    TrueRange,
    Atr(usize),
    AtrMean(usize, usize),
    StdDev(usize),
    BandUpper(usize, u64),
    BandLower(usize, u64),
    RollingMax(PriceField, usize),
    RollingMin(PriceField, usize),
    VolumeRatio(usize),
    PctChange(usize),
    PlusDi(usize),
    MinusDi(usize),
    Adx(usize),
    Macd(usize, usize, usize),
    MacdSignal(usize, usize, usize),
    MacdHistogram(usize, usize, usize),
}

/// Indicator cache bound to one series.
///
/// Safe to share between threads; concurrent misses on the same key may
/// compute twice but always store identical values.
pub struct IndicatorSet<'a> {
    series: &'a PriceSeries,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Option<Vec<f64>>,
    cache: Mutex<HashMap<Key, Line>>,
}

impl<'a> IndicatorSet<'a> {
    pub fn new(series: &'a PriceSeries) -> Self {
        Self {
            series,
            open: series.field(PriceField::Open),
            high: series.highs(),
            low: series.lows(),
            close: series.closes(),
            volume: series.volumes(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The series these lines are computed over.
    pub fn series(&self) -> &'a PriceSeries {
        self.series
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Index of the most recent bar.
    pub fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    /// Raw price column.
    pub fn field(&self, field: PriceField) -> &[f64] {
        match field {
            PriceField::Open => &self.open,
            PriceField::High => &self.high,
            PriceField::Low => &self.low,
            PriceField::Close => &self.close,
        }
    }

    /// Raw volume column, when every bar has one.
    pub fn volumes(&self) -> Option<&[f64]> {
        self.volume.as_deref()
    }

    /// Number of distinct lines computed so far.
    pub fn cached_len(&self) -> usize {
        self.lock().len()
    }

    pub fn sma(&self, field: PriceField, period: usize) -> Result<Line, IndicatorError> {
        self.memo(Key::Sma(field, period), || {
            Ok(Sma::new(period)?.calculate(self.field(field)))
        })
    }

    pub fn ema(&self, field: PriceField, span: usize) -> Result<Line, IndicatorError> {
        self.memo(Key::Ema(field, span), || {
            Ok(Ema::new(span)?.calculate(self.field(field)))
        })
    }

    /// RSI of closes.
    pub fn rsi(&self, period: usize) -> Result<Line, IndicatorError> {
        self.memo(Key::Rsi(period), || Ok(Rsi::new(period)?.calculate(&self.close)))
    }

    pub fn true_range(&self) -> Line {
        if let Some(line) = self.cached(&Key::TrueRange) {
            return line;
        }
        self.store(Key::TrueRange, true_range(&self.high, &self.low, &self.close))
    }

    pub fn atr(&self, period: usize) -> Result<Line, IndicatorError> {
        self.memo(Key::Atr(period), || {
            Ok(Atr::new(period)?.from_true_range(&self.true_range()))
        })
    }

    /// Rolling mean of the ATR line itself.
    pub fn atr_mean(&self, atr_period: usize, mean_period: usize) -> Result<Line, IndicatorError> {
        self.memo(Key::AtrMean(atr_period, mean_period), || {
            require_period("ATR mean", mean_period, 1)?;
            Ok(rolling_mean(&self.atr(atr_period)?, mean_period))
        })
    }

    /// Sample standard deviation of closes.
    pub fn std_dev(&self, period: usize) -> Result<Line, IndicatorError> {
        self.memo(Key::StdDev(period), || {
            Ok(StdDev::new(period)?.calculate(&self.close))
        })
    }

    /// Bollinger bands of closes, built from the shared SMA and std dev lines.
    pub fn bollinger(&self, period: usize, k: f64) -> Result<BandLines, IndicatorError> {
        if !(k > 0.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "Std dev multiplier must be positive, got {}",
                k
            )));
        }
        let middle = self.sma(PriceField::Close, period)?;
        let std_dev = self.std_dev(period)?;
        let band = |sign: f64| -> Vec<Option<f64>> {
            middle
                .iter()
                .zip(std_dev.iter())
                .map(|(m, s)| Some((*m)? + sign * k * (*s)?))
                .collect()
        };

        let upper = self.memo(Key::BandUpper(period, k.to_bits()), || Ok(band(1.0)))?;
        let lower = self.memo(Key::BandLower(period, k.to_bits()), || Ok(band(-1.0)))?;
        Ok(BandLines {
            upper,
            middle,
            lower,
        })
    }

    pub fn rolling_max(&self, field: PriceField, window: usize) -> Result<Line, IndicatorError> {
        self.memo(Key::RollingMax(field, window), || {
            Ok(RollingMax::new(window)?.calculate(self.field(field)))
        })
    }

    pub fn rolling_min(&self, field: PriceField, window: usize) -> Result<Line, IndicatorError> {
        self.memo(Key::RollingMin(field, window), || {
            Ok(RollingMin::new(window)?.calculate(self.field(field)))
        })
    }

    /// Volume over its rolling average; neutral 1.0 for series without volume.
    pub fn volume_ratio(&self, period: usize) -> Result<Line, IndicatorError> {
        self.memo(Key::VolumeRatio(period), || {
            let ratio = VolumeRatio::new(period)?;
            Ok(match &self.volume {
                Some(volume) => ratio.calculate(volume),
                None => VolumeRatio::neutral(self.len()),
            })
        })
    }

    /// Percentage change of closes over `periods` bars.
    pub fn pct_change(&self, periods: usize) -> Result<Line, IndicatorError> {
        self.memo(Key::PctChange(periods), || {
            require_period("Percent change", periods, 1)?;
            Ok((0..self.len())
                .map(|i| {
                    let base = *self.close.get(i.checked_sub(periods)?)?;
                    (base != 0.0).then(|| (self.close[i] - base) / base * 100.0)
                })
                .collect())
        })
    }

    pub fn directional(&self, period: usize) -> Result<TrendLines, IndicatorError> {
        if let (Some(plus_di), Some(minus_di), Some(adx)) = (
            self.cached(&Key::PlusDi(period)),
            self.cached(&Key::MinusDi(period)),
            self.cached(&Key::Adx(period)),
        ) {
            return Ok(TrendLines {
                plus_di,
                minus_di,
                adx,
            });
        }

        let lines = DirectionalIndex::new(period)?.calculate_ohlc(&self.high, &self.low, &self.close);
        Ok(TrendLines {
            plus_di: self.store(Key::PlusDi(period), lines.plus_di),
            minus_di: self.store(Key::MinusDi(period), lines.minus_di),
            adx: self.store(Key::Adx(period), lines.adx),
        })
    }

    pub fn macd(&self, fast: usize, slow: usize, signal: usize) -> Result<MacdLines, IndicatorError> {
        if let (Some(macd), Some(signal_line), Some(histogram)) = (
            self.cached(&Key::Macd(fast, slow, signal)),
            self.cached(&Key::MacdSignal(fast, slow, signal)),
            self.cached(&Key::MacdHistogram(fast, slow, signal)),
        ) {
            return Ok(MacdLines {
                macd,
                signal: signal_line,
                histogram,
            });
        }

        let output = Macd::with_periods(fast, slow, signal)?.calculate(&self.close);
        let pick = |f: fn(&MacdOutput) -> f64| -> Vec<Option<f64>> {
            output.iter().map(|o| o.as_ref().map(f)).collect()
        };

        Ok(MacdLines {
            macd: self.store(Key::Macd(fast, slow, signal), pick(|o| o.macd)),
            signal: self.store(Key::MacdSignal(fast, slow, signal), pick(|o| o.signal)),
            histogram: self.store(Key::MacdHistogram(fast, slow, signal), pick(|o| o.histogram)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Key, Line>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached(&self, key: &Key) -> Option<Line> {
        self.lock().get(key).cloned()
    }

    fn store(&self, key: Key, values: Vec<Option<f64>>) -> Line {
        let line: Line = values.into();
        self.lock().entry(key).or_insert(line).clone()
    }

    // Computes outside the lock so a line may be built from other lines.
    fn memo<F>(&self, key: Key, compute: F) -> Result<Line, IndicatorError>
    where
        F: FnOnce() -> Result<Vec<Option<f64>>, IndicatorError>,
    {
        if let Some(line) = self.cached(&key) {
            return Ok(line);
        }
        let values = compute()?;
        debug_assert_eq!(values.len(), self.len());
        Ok(self.store(key, values))
    }
}

impl std::fmt::Debug for IndicatorSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorSet")
            .field("symbol", &self.series.symbol)
            .field("bars", &self.len())
            .field("cached", &self.cached_len())
            .finish()
    }
}
