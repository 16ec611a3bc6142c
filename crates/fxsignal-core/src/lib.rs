//! Core types and traits for the signal scanner.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries, Timeframe)
//! - The Signal record emitted by strategies
//! - Core traits for indicators, strategies, data providers and notifiers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{FxSignalError, FxSignalResult};
pub use traits::*;
pub use types::*;
