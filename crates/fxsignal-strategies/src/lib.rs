//! Signal detection strategies.
//!
//! Six independent detectors, each looking only at the most recent bar of a
//! series:
//! - Range breakout with ATR buffer and volume confirmation
//! - EMA crossover confirmed by RSI, volume and momentum
//! - RSI reversal filtered by the long-term SMA
//! - ATR band breaks in strong ADX trends
//! - Support/resistance exhaustion fades
//! - Fibonacci retracements with RSI and MACD confirmation
//!
//! [`SignalAggregator`] runs them over one shared indicator cache and ranks
//! whatever triggers.

mod aggregator;
mod breakout;
mod fibonacci;
mod ma_crossover;
mod registry;
mod rsi_reversal;
mod support_resistance;
mod traits;
mod trend_atr;

pub use aggregator::{Aggregate, SignalAggregator, StrategyFailure};
pub use breakout::{BreakoutConfig, BreakoutStrategy};
pub use fibonacci::{nearest_level, FibonacciConfig, FibonacciStrategy, FIB_LEVELS};
pub use ma_crossover::{MACrossoverConfig, MACrossoverStrategy};
pub use registry::{StrategyInfo, StrategyRegistry};
pub use rsi_reversal::{RsiReversalConfig, RsiReversalStrategy};
pub use support_resistance::{SupportResistanceConfig, SupportResistanceStrategy};
pub use traits::Strategy;
pub use trend_atr::{TrendAtrConfig, TrendAtrStrategy};
