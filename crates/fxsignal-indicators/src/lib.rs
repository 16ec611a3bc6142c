//! Technical indicators.
//!
//! Every indicator produces a series aligned with its input, `None` until
//! warmed up:
//! - Moving averages (SMA, EMA) and rolling extrema
//! - Momentum (RSI, MACD)
//! - Volatility (True Range, ATR, standard deviation, Bollinger Bands)
//! - Trend strength (+DI, -DI, ADX)
//! - Volume ratio against its rolling average
//!
//! [`IndicatorSet`] memoizes these per series so strategies evaluating the
//! same window share one computation.

pub mod extrema;
pub mod momentum;
pub mod moving_average;
pub mod set;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use extrema::{RollingMax, RollingMin};
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{rolling_mean, Ema, Sma};
pub use set::{BandLines, IndicatorSet, Line, LineExt, MacdLines, TrendLines};
pub use trend::{DirectionalIndex, DirectionalLines};
pub use volatility::{true_range, Atr, StdDev};
pub use volume::VolumeRatio;

use fxsignal_core::error::IndicatorError;

pub(crate) fn require_period(name: &str, period: usize, min: usize) -> Result<(), IndicatorError> {
    if period < min {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} period must be at least {}, got {}",
            name, min, period
        )));
    }
    Ok(())
}
