//! Moving-average trend classifier.
//!
//! SMA(window) over the most recent closes, compared to the latest close.
//! Strictly above is BULLISH; equal or below is BEARISH.

use serde::Serialize;
use std::fmt;

use crate::domain::error::AnalysisError;
use crate::domain::series::Series;
use crate::domain::stats::{mean, round2};

pub const DEFAULT_WINDOW: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Bullish,
    Bearish,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "BULLISH"),
            Trend::Bearish => write!(f, "BEARISH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReading {
    pub current_price: f64,
    pub average_price: f64,
    pub window: usize,
    pub trend: Trend,
    pub explanation: String,
}

pub fn classify(series: &Series, window: usize) -> Result<TrendReading, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::invalid_parameter(
            "window",
            "must be at least 1",
        ));
    }
    if series.len() < window {
        return Err(AnalysisError::InsufficientData {
            have: series.len(),
            need: window,
        });
    }

    let closes: Vec<f64> = series.tail(window).iter().map(|p| p.close).collect();
    let average = mean(&closes);
    let current = series
        .last()
        .map(|p| p.close)
        .ok_or(AnalysisError::InsufficientData { have: 0, need: 1 })?;

    let trend = if current > average {
        Trend::Bullish
    } else {
        Trend::Bearish
    };

    let current_price = round2(current);
    let average_price = round2(average);
    let explanation = match trend {
        Trend::Bullish => format!(
            "The stock is at ${:.2}, which is ABOVE its {}-day average of ${:.2}, so it is trending UP.",
            current_price, window, average_price
        ),
        Trend::Bearish => format!(
            "The stock is at ${:.2}, which is NOT ABOVE its {}-day average of ${:.2}, so it is trending DOWN.",
            current_price, window, average_price
        ),
    };

    Ok(TrendReading {
        current_price,
        average_price,
        window,
        trend,
        explanation,
    })
}
