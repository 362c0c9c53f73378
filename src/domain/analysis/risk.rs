//! Volatility-based risk classifier.
//!
//! Volatility is the population standard deviation of every close in the
//! series. Tier boundaries come from [`Thresholds`].

use serde::Serialize;
use std::fmt;

use crate::domain::error::AnalysisError;
use crate::domain::series::Series;
use crate::domain::stats::{mean, min_max, pct_returns, population_stddev, round2};
use crate::domain::thresholds::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_volatility(volatility: f64, thresholds: &Thresholds) -> Self {
        if volatility < thresholds.low_risk_ceiling {
            RiskLevel::Low
        } else if volatility < thresholds.medium_risk_ceiling {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            RiskLevel::Low => {
                "This stock is STABLE: the price does not jump around much, like a calm river."
            }
            RiskLevel::Medium => {
                "This stock is MODERATE: the price moves a bit, like a wavy river."
            }
            RiskLevel::High => {
                "This stock is RISKY: the price jumps around a lot, like a wild river."
            }
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub lowest: f64,
    pub highest: f64,
    pub current: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReading {
    pub volatility: f64,
    pub average_daily_return_pct: f64,
    pub risk_level: RiskLevel,
    pub risk_explanation: String,
    pub price_range: PriceRange,
}

pub fn classify(series: &Series, thresholds: &Thresholds) -> Result<RiskReading, AnalysisError> {
    let closes = series.closes();
    let (lowest, highest) =
        min_max(&closes).ok_or(AnalysisError::InsufficientData { have: 0, need: 1 })?;
    let current = closes[closes.len() - 1];

    let volatility = population_stddev(&closes);
    // Fewer than two closes give no returns; mean() reports 0.0 for that.
    let average_return = mean(&pct_returns(&closes));

    let risk_level = RiskLevel::from_volatility(volatility, thresholds);

    Ok(RiskReading {
        volatility: round2(volatility),
        average_daily_return_pct: round2(average_return),
        risk_level,
        risk_explanation: risk_level.explanation().to_string(),
        price_range: PriceRange {
            lowest: round2(lowest),
            highest: round2(highest),
            current: round2(current),
        },
    })
}
