//! Core data types.

mod alert;
mod ohlcv;
mod signal;
mod timeframe;

pub use alert::Alert;
pub use ohlcv::{Bar, PriceField, PriceSeries};
pub use signal::{cap_confidence, Direction, Signal, SignalKind, DEFAULT_CONFIDENCE, MAX_CONFIDENCE};
pub use timeframe::Timeframe;
