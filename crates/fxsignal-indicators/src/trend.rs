//! Trend strength: directional movement and ADX.

use fxsignal_core::error::IndicatorError;

use crate::moving_average::rolling_mean;
use crate::require_period;
use crate::volatility::Atr;

/// Aligned +DI, -DI and ADX series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionalLines {
    pub plus_di: Vec<Option<f64>>,
    pub minus_di: Vec<Option<f64>>,
    pub adx: Vec<Option<f64>>,
}

/// Directional movement index.
///
/// +DM counts an up-move only when it beats the magnitude of the low change;
/// -DM counts a down-move only when its magnitude beats the up-move. Both are
/// smoothed with a simple rolling mean and normalized by ATR over the same
/// period. A zero ATR gives DI of 0, and a zero DI sum gives DX of 0.
#[derive(Debug, Clone)]
pub struct DirectionalIndex {
    period: usize,
    atr: Atr,
}

impl DirectionalIndex {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        require_period("ADX", period, 1)?;
        Ok(Self {
            period,
            atr: Atr::new(period)?,
        })
    }

    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> DirectionalLines {
        let len = high.len().min(low.len()).min(close.len());
        let mut plus_dm = Vec::with_capacity(len);
        let mut minus_dm = Vec::with_capacity(len);

        for i in 0..len {
            if i == 0 {
                plus_dm.push(None);
                minus_dm.push(None);
                continue;
            }
            let up = high[i] - high[i - 1];
            let down = low[i] - low[i - 1];

            plus_dm.push(Some(if up > down.abs() && up > 0.0 { up } else { 0.0 }));
            minus_dm.push(Some(if down.abs() > up && down < 0.0 {
                down.abs()
            } else {
                0.0
            }));
        }

        let atr = self.atr.calculate_ohlc(high, low, close);
        let plus_di = normalize(&rolling_mean(&plus_dm, self.period), &atr);
        let minus_di = normalize(&rolling_mean(&minus_dm, self.period), &atr);

        let dx: Vec<Option<f64>> = plus_di
            .iter()
            .zip(&minus_di)
            .map(|(plus, minus)| {
                let (plus, minus) = ((*plus)?, (*minus)?);
                let sum = plus + minus;
                Some(if sum == 0.0 {
                    0.0
                } else {
                    100.0 * (plus - minus).abs() / sum
                })
            })
            .collect();
        let adx = rolling_mean(&dx, self.period);

        DirectionalLines {
            plus_di,
            minus_di,
            adx,
        }
    }
}

fn normalize(movement: &[Option<f64>], atr: &[Option<f64>]) -> Vec<Option<f64>> {
    movement
        .iter()
        .zip(atr)
        .map(|(dm, atr)| {
            let (dm, atr) = ((*dm)?, (*atr)?);
            Some(if atr == 0.0 { 0.0 } else { 100.0 * dm / atr })
        })
        .collect()
}
