//! Message rendering.

use fxsignal_core::types::{Alert, Direction};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// How an alert is rendered, and the Telegram parse mode that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    Markdown,
    Html,
    Plain,
}

impl MessageFormat {
    /// Richest first.
    pub const FALLBACK_ORDER: [MessageFormat; 3] =
        [MessageFormat::Markdown, MessageFormat::Html, MessageFormat::Plain];

    /// Value for the Bot API `parse_mode` field.
    pub fn parse_mode(&self) -> Option<&'static str> {
        match self {
            MessageFormat::Markdown => Some("Markdown"),
            MessageFormat::Html => Some("HTML"),
            MessageFormat::Plain => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MessageFormat::Markdown => "markdown",
            MessageFormat::Html => "html",
            MessageFormat::Plain => "plain",
        }
    }

    /// Render an alert.
    pub fn render(&self, alert: &Alert) -> String {
        match self {
            MessageFormat::Markdown => render_rich(alert, escape_markdown, |s| format!("*{}*", s)),
            MessageFormat::Html => render_rich(alert, escape_html, |s| format!("<b>{}</b>", s)),
            MessageFormat::Plain => render_plain(alert),
        }
    }
}

fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn direction_icon(direction: Direction) -> &'static str {
    match direction {
        Direction::Buy => "🟢",
        Direction::Sell => "🔴",
    }
}

// Markdown and HTML share a layout and differ only in how emphasis and
// escaping are applied.
fn render_rich(
    alert: &Alert,
    escape: fn(&str) -> String,
    bold: impl Fn(&str) -> String,
) -> String {
    let s = &alert.signal;
    let mut msg = String::new();

    let _ = writeln!(msg, "🚨 {} Signal", bold(&escape(&s.strategy)));
    let _ = writeln!(msg, "📈 {} {}", bold("Pair:"), escape(&alert.symbol));
    let _ = writeln!(msg, "⏰ {} {}", bold("Timeframe:"), alert.timeframe.label());
    let _ = writeln!(
        msg,
        "📊 {} {} {}",
        bold("Signal:"),
        direction_icon(s.direction),
        s.direction
    );
    let _ = writeln!(msg, "💰 {} {:.5}", bold("Entry:"), s.entry);
    let _ = writeln!(msg, "🛑 {} {:.5}", bold("Stop Loss:"), s.stop_loss);
    let _ = writeln!(msg, "🎯 {} {:.5}", bold("Take Profit:"), s.take_profit);
    let _ = writeln!(msg, "⚖️ {} {:.1}", bold("R:R Ratio:"), s.reward_risk());

    if let Some(confidence) = s.confidence {
        let _ = writeln!(msg, "🎯 {} {:.1}%", bold("Confidence:"), confidence);
    }
    if let Some(rsi) = s.metric("rsi") {
        let _ = writeln!(msg, "📊 {} {:.1}", bold("RSI:"), rsi);
    }
    if let Some(ratio) = s.metric("volume_ratio") {
        let _ = writeln!(msg, "📈 {} {:.1}x", bold("Volume:"), ratio);
    }
    if let Some(adx) = s.metric("adx") {
        let _ = writeln!(msg, "📉 {} {:.1}", bold("ADX:"), adx);
    }

    let _ = write!(msg, "\n🤖 {}", bold(&escape(&alert.bot_name)));
    msg
}

fn render_plain(alert: &Alert) -> String {
    let s = &alert.signal;
    let mut msg = String::new();

    let _ = writeln!(msg, "SIGNAL: {}", s.strategy);
    let _ = writeln!(msg, "Pair: {} ({})", alert.symbol, alert.timeframe.label());
    let _ = writeln!(msg, "Direction: {}", s.direction);
    let _ = writeln!(msg, "Entry: {:.5}", s.entry);
    let _ = writeln!(msg, "Stop: {:.5}", s.stop_loss);
    let _ = writeln!(msg, "Target: {:.5}", s.take_profit);
    let _ = writeln!(msg, "R:R: {:.1}", s.reward_risk());

    if let Some(confidence) = s.confidence {
        let _ = writeln!(msg, "Confidence: {:.1}%", confidence);
    }
    if let Some(rsi) = s.metric("rsi") {
        let _ = writeln!(msg, "RSI: {:.1}", rsi);
    }
    if let Some(ratio) = s.metric("volume_ratio") {
        let _ = writeln!(msg, "Volume: {:.1}x", ratio);
    }
    if let Some(adx) = s.metric("adx") {
        let _ = writeln!(msg, "ADX: {:.1}", adx);
    }

    let _ = write!(msg, "\n{}", alert.bot_name);
    msg
}
