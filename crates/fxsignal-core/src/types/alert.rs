//! A signal addressed to a human.

use serde::{Deserialize, Serialize};

use super::{Signal, Timeframe};

/// Everything a notification sink needs to present one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Instrument the signal was detected on
    pub symbol: String,
    /// Timeframe of the evaluated series
    pub timeframe: Timeframe,
    /// Name the bot signs its messages with
    pub bot_name: String,
    /// The signal itself
    pub signal: Signal,
}

impl Alert {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, bot_name: impl Into<String>, signal: Signal) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bot_name: bot_name.into(),
            signal,
        }
    }
}
