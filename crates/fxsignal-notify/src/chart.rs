//! Candlestick chart of the bars behind an alert.
//!
//! The chart zooms into the most recent bars and marks the entry, stop-loss
//! and take-profit from the signal bar to the right edge. It carries no text;
//! the levels are spelled out in the photo caption instead.

use std::fmt::Write as _;
use std::io::Cursor;

use fxsignal_core::error::NotifyError;
use fxsignal_core::types::{Alert, Bar, Direction, PriceSeries};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

const BULL: RGBColor = RGBColor(38, 166, 154);
const BEAR: RGBColor = RGBColor(239, 83, 80);
const ENTRY: RGBColor = RGBColor(255, 140, 0);
const STOP: RGBColor = RGBColor(200, 30, 30);
const TARGET: RGBColor = RGBColor(20, 150, 60);

/// Chart size and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Most recent bars drawn
    pub bars: usize,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            bars: 60,
            width: 1400,
            height: 800,
        }
    }
}

impl ChartOptions {
    pub fn validate(&self) -> Result<(), NotifyError> {
        if self.bars == 0 {
            return Err(NotifyError::Configuration(
                "chart must draw at least one bar".into(),
            ));
        }
        if self.width < 200 || self.height < 200 {
            return Err(NotifyError::Configuration(format!(
                "chart size {}x{} is below 200x200",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Render the alert's chart as PNG bytes.
pub fn render_chart(
    alert: &Alert,
    series: &PriceSeries,
    options: &ChartOptions,
) -> Result<Vec<u8>, NotifyError> {
    options.validate()?;

    let all = series.bars();
    let start = all.len().saturating_sub(options.bars);
    let window = &all[start..];
    let Some(last) = window.len().checked_sub(1) else {
        return Err(NotifyError::Chart("no bars to draw".into()));
    };

    let signal = &alert.signal;
    // Signals from an older window are pinned to the last bar.
    let signal_x = signal
        .index
        .checked_sub(start)
        .filter(|&i| i <= last)
        .unwrap_or(last) as f64;
    let (low, high) = price_range(window, [signal.entry, signal.stop_loss, signal.take_profit]);
    let right = window.len() as f64;
    let candle_width = (options.width as usize * 6 / 10 / window.len()).clamp(1, 18) as u32;

    let mut pixels = vec![0u8; options.width as usize * options.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(24)
            .build_cartesian_2d(-1.0..right, low..high)
            .map_err(chart_error)?;

        chart
            .draw_series(window.iter().enumerate().map(|(i, bar)| {
                CandleStick::new(
                    i as f64,
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    BULL.filled(),
                    BEAR.filled(),
                    candle_width,
                )
            }))
            .map_err(chart_error)?;

        for (level, color) in [
            (signal.entry, ENTRY),
            (signal.stop_loss, STOP),
            (signal.take_profit, TARGET),
        ] {
            chart
                .draw_series(LineSeries::new(
                    [(signal_x, level), (right, level)],
                    color.stroke_width(2),
                ))
                .map_err(chart_error)?;
        }

        let marker = match signal.direction {
            Direction::Buy => TARGET,
            Direction::Sell => STOP,
        };
        chart
            .draw_series(std::iter::once(Circle::new(
                (signal_x, signal.entry),
                7,
                marker.filled(),
            )))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    encode_png(pixels, options.width, options.height)
}

/// Photo caption spelling out what the chart marks.
pub fn chart_caption(alert: &Alert) -> String {
    let s = &alert.signal;
    let mut caption = format!("{} - {}", s.direction, s.strategy);
    if let Some(confidence) = s.confidence.filter(|c| *c > 0.0) {
        let _ = write!(caption, " ({:.0}%)", confidence);
    }
    let _ = write!(
        caption,
        "\n{} {} | {}\nEntry: {:.5}\nSL: {:.5}\nTP: {:.5}",
        alert.symbol,
        alert.timeframe.label(),
        alert.bot_name,
        s.entry,
        s.stop_loss,
        s.take_profit
    );
    caption
}

fn price_range(bars: &[Bar], levels: [f64; 3]) -> (f64, f64) {
    let low = bars
        .iter()
        .map(|b| b.low)
        .chain(levels)
        .fold(f64::INFINITY, f64::min);
    let high = bars
        .iter()
        .map(|b| b.high)
        .chain(levels)
        .fold(f64::NEG_INFINITY, f64::max);
    let pad = ((high - low) * 0.05).max(high.abs() * 1e-4).max(1e-9);
    (low - pad, high + pad)
}

fn encode_png(pixels: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, NotifyError> {
    let image = RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| NotifyError::Chart("pixel buffer does not match chart size".into()))?;
    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .map_err(chart_error)?;
    Ok(png.into_inner())
}

fn chart_error(e: impl std::fmt::Display) -> NotifyError {
    NotifyError::Chart(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxsignal_core::types::{Signal, SignalKind, Timeframe};

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn series(n: usize) -> PriceSeries {
        let bars = (0..n)
            .map(|i| {
                let c = 1.1 + 0.002 * (i as f64 * 0.3).sin();
                let o = c - 0.0003 * (i as f64).cos();
                Bar::new(i as i64 * 3_600_000, o, c.max(o) + 0.0004, c.min(o) - 0.0004, c)
            })
            .collect();
        PriceSeries::new("EURUSD", Timeframe::Hour4, bars).unwrap()
    }

    fn alert(index: usize, entry: f64) -> Alert {
        let signal = Signal::from_levels(
            "Enhanced Fibonacci",
            SignalKind::Fib,
            Direction::Sell,
            entry,
            entry + 0.003,
            2.0,
        )
        .unwrap()
        .at_bar(index, index as i64 * 3_600_000)
        .with_confidence(64.4);
        Alert::new("EURUSD", Timeframe::Hour4, "FX Bot", signal)
    }

    #[test]
    fn test_renders_png() {
        let series = series(300);
        let alert = alert(299, series.last().unwrap().close);
        let options = ChartOptions {
            width: 400,
            height: 300,
            ..Default::default()
        };

        let png = render_chart(&alert, &series, &options).unwrap();
        assert!(png.starts_with(&PNG_MAGIC));
    }

    #[test]
    fn test_short_series_and_stale_index() {
        let series = series(10);
        // Index beyond the window is pinned to the last bar rather than failing
        let alert = alert(500, 1.1);
        let options = ChartOptions {
            width: 200,
            height: 200,
            ..Default::default()
        };

        assert!(render_chart(&alert, &series, &options).is_ok());
    }

    #[test]
    fn test_rejects_degenerate_options() {
        let series = series(10);
        let alert = alert(9, 1.1);

        let no_bars = ChartOptions {
            bars: 0,
            ..Default::default()
        };
        assert!(matches!(
            render_chart(&alert, &series, &no_bars),
            Err(NotifyError::Configuration(_))
        ));

        let tiny = ChartOptions {
            width: 50,
            ..Default::default()
        };
        assert!(tiny.validate().is_err());
    }

    #[test]
    fn test_caption_lists_levels() {
        let caption = chart_caption(&alert(299, 1.1));

        assert!(caption.starts_with("SELL - Enhanced Fibonacci (64%)"));
        assert!(caption.contains("EURUSD 4H | FX Bot"));
        assert!(caption.contains("Entry: 1.10000"));
        assert!(caption.contains("SL: 1.10300"));
        assert!(caption.contains("TP: 1.09400"));
    }
}
