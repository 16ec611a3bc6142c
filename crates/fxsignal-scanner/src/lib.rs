//! One scan pass over every configured symbol and timeframe.
//!
//! Each pair is fetched, evaluated by every strategy, and its best signal is
//! sent to the notifier. Pairs are independent: a failure is recorded in the
//! report and the pass moves on.

mod config;
mod report;
mod scanner;

pub use config::ScannerConfig;
pub use report::{PairOutcome, PairReport, ScanReport, ScanSummary};
pub use scanner::Scanner;
