//! Timeframe definitions for market data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bar timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "1m", alias = "1M")]
    Minute1,
    #[serde(rename = "5m", alias = "5M")]
    Minute5,
    #[serde(rename = "15m", alias = "15M")]
    Minute15,
    #[serde(rename = "30m", alias = "30M")]
    Minute30,
    #[serde(rename = "1h", alias = "1H")]
    #[default]
    Hour1,
    #[serde(rename = "4h", alias = "4H")]
    Hour4,
    #[serde(rename = "1d", alias = "1D")]
    Daily,
    #[serde(rename = "1w", alias = "1W")]
    Weekly,
}

impl Timeframe {
    /// Get the duration of the timeframe in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            Timeframe::Minute1 => 60,
            Timeframe::Minute5 => 300,
            Timeframe::Minute15 => 900,
            Timeframe::Minute30 => 1800,
            Timeframe::Hour1 => 3600,
            Timeframe::Hour4 => 14400,
            Timeframe::Daily => 86400,
            Timeframe::Weekly => 604800,
        }
    }

    /// Short code used in file names and config ("15m", "1h", "4h").
    pub fn code(&self) -> &'static str {
        match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute30 => "30m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1w",
        }
    }

    /// Label shown to humans in alerts ("15m", "1H", "4H", "1D").
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute30 => "30m",
            Timeframe::Hour1 => "1H",
            Timeframe::Hour4 => "4H",
            Timeframe::Daily => "1D",
            Timeframe::Weekly => "1W",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" | "m1" => Ok(Timeframe::Minute1),
            "5m" | "5min" | "m5" => Ok(Timeframe::Minute5),
            "15m" | "15min" | "m15" => Ok(Timeframe::Minute15),
            "30m" | "30min" | "m30" => Ok(Timeframe::Minute30),
            "1h" | "h1" | "hour" => Ok(Timeframe::Hour1),
            "4h" | "h4" => Ok(Timeframe::Hour4),
            "1d" | "d1" | "daily" => Ok(Timeframe::Daily),
            "1w" | "w1" | "weekly" => Ok(Timeframe::Weekly),
            _ => Err(format!("Invalid timeframe: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_parse() {
        assert_eq!(Timeframe::from_str("15m").unwrap(), Timeframe::Minute15);
        assert_eq!(Timeframe::from_str("4H").unwrap(), Timeframe::Hour4);
        assert_eq!(Timeframe::from_str("h1").unwrap(), Timeframe::Hour1);
        assert!(Timeframe::from_str("3h").is_err());
    }

    #[test]
    fn test_timeframe_labels() {
        assert_eq!(Timeframe::Hour4.to_string(), "4h");
        assert_eq!(Timeframe::Hour4.label(), "4H");
        assert_eq!(Timeframe::Minute15.label(), "15m");
    }

    #[test]
    fn test_timeframe_serde() {
        let tf: Timeframe = serde_json::from_str("\"4H\"").unwrap();
        assert_eq!(tf, Timeframe::Hour4);
        assert_eq!(serde_json::to_string(&Timeframe::Minute15).unwrap(), "\"15m\"");
    }
}
