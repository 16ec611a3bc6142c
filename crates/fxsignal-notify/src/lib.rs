//! Presenting signals to a human.
//!
//! Alerts are rendered in one of three message formats and delivered through
//! the Telegram Bot API, falling back to simpler formats when the richer ones
//! are rejected. Accepted alerts are followed by a candlestick chart of the
//! signal, sent as a photo.

mod chart;
mod fallback;
mod format;
mod log;
mod telegram;

pub use chart::{chart_caption, render_chart, ChartOptions};
pub use fallback::FallbackNotifier;
pub use format::MessageFormat;
pub use log::LogNotifier;
pub use telegram::{TelegramClient, TelegramConfig, DEFAULT_API_BASE};
