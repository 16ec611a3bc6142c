//! Core traits.

mod data_source;
mod indicator;
mod notifier;
mod strategy;

pub use data_source::MarketDataProvider;
pub use indicator::Indicator;
pub use notifier::Notifier;
pub use strategy::StrategyConfig;
