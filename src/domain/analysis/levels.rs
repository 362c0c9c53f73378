//! Support/resistance levels and the resulting trade signal.
//!
//! Levels are taken from the last `level_lookback` points: resistance is the
//! `level_count` highest distinct highs, support the `level_count` lowest
//! distinct lows. When fewer distinct values exist the available ones are
//! used as-is, without padding.

use serde::Serialize;
use std::fmt;

use crate::domain::error::AnalysisError;
use crate::domain::series::Series;
use crate::domain::stats::round2;
use crate::domain::thresholds::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn explanation(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY: the price is below the floor. This may be a good time to buy.",
            Signal::Sell => "SELL: the price is above the ceiling. This may be a good time to sell.",
            Signal::Hold => "HOLD: the price is between the floor and the ceiling. Wait for a better entry.",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelReading {
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
    pub floor_price: f64,
    pub ceiling_price: f64,
    pub current_price: f64,
    pub signal: Signal,
    pub signal_explanation: String,
}

/// Sorted ascending, exact duplicates removed.
fn distinct_sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    values
}

/// BUY below the lowest support, SELL above the highest resistance, HOLD otherwise.
pub fn signal_for(close: f64, support: &[f64], resistance: &[f64]) -> Signal {
    let floor = support.iter().copied().fold(f64::INFINITY, f64::min);
    let ceiling = resistance.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if close < floor {
        Signal::Buy
    } else if close > ceiling {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

pub fn analyze(series: &Series, thresholds: &Thresholds) -> Result<LevelReading, AnalysisError> {
    if thresholds.level_count == 0 {
        return Err(AnalysisError::invalid_parameter(
            "level_count",
            "must be at least 1",
        ));
    }
    let window = series.tail(thresholds.level_lookback.max(1));
    let current = window
        .last()
        .map(|p| p.close)
        .ok_or(AnalysisError::InsufficientData { have: 0, need: 1 })?;

    let highs = distinct_sorted(window.iter().map(|p| p.high).collect());
    let lows = distinct_sorted(window.iter().map(|p| p.low).collect());

    let resistance: Vec<f64> = highs
        .iter()
        .rev()
        .take(thresholds.level_count)
        .rev()
        .copied()
        .collect();
    let support: Vec<f64> = lows.iter().take(thresholds.level_count).copied().collect();

    let (Some(&floor), Some(&ceiling)) = (support.first(), resistance.last()) else {
        return Err(AnalysisError::DegenerateInput {
            reason: "no candidate support or resistance levels".to_string(),
        });
    };

    let signal = signal_for(current, &support, &resistance);

    Ok(LevelReading {
        support_levels: support.iter().map(|v| round2(*v)).collect(),
        resistance_levels: resistance.iter().map(|v| round2(*v)).collect(),
        floor_price: round2(floor),
        ceiling_price: round2(ceiling),
        current_price: round2(current),
        signal,
        signal_explanation: signal.explanation().to_string(),
    })
}
