//! Linear-regression price forecast.
//!
//! Ordinary least squares of close against day index 0..n-1:
//!   slope     = sum((x - x_mean)(y - y_mean)) / sum((x - x_mean)^2)
//!   intercept = y_mean - slope * x_mean
//! A single point has zero index variance; slope falls back to 0.

use serde::Serialize;
use std::fmt;

use crate::domain::error::AnalysisError;
use crate::domain::series::Series;
use crate::domain::stats::{mean, round2};

pub const DEFAULT_FORECAST_DAYS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub slope: f64,
    pub intercept: f64,
    pub forecast: Vec<f64>,
    pub current_price: f64,
    pub predicted_price: f64,
    pub change_percent: f64,
    pub direction: Direction,
    pub prediction: String,
}

/// Slope and intercept of the least-squares line through (i, values[i]).
pub fn linear_fit(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    let slope = if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    };
    (slope, y_mean - slope * x_mean)
}

pub fn project(series: &Series, forecast_days: usize) -> Result<Forecast, AnalysisError> {
    if forecast_days == 0 {
        return Err(AnalysisError::invalid_parameter(
            "forecast_days",
            "must be at least 1",
        ));
    }
    let closes = series.closes();
    let current = *closes
        .last()
        .ok_or(AnalysisError::InsufficientData { have: 0, need: 1 })?;

    let (slope, intercept) = linear_fit(&closes);
    let last_index = closes.len() - 1;
    let forecast: Vec<f64> = (1..=forecast_days)
        .map(|i| round2(slope * (last_index + i) as f64 + intercept))
        .collect();
    let predicted = forecast[forecast.len() - 1];
    let change_percent = (predicted - current) / current * 100.0;

    let direction = if slope > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };

    let prediction = match direction {
        Direction::Up => format!(
            "The stock is predicted to go UP. It might reach ${:.2} in {} days (up {:.1}%).",
            predicted,
            forecast_days,
            change_percent.abs()
        ),
        Direction::Down => format!(
            "The stock is predicted to go DOWN. It might reach ${:.2} in {} days (down {:.1}%).",
            predicted,
            forecast_days,
            change_percent.abs()
        ),
    };

    Ok(Forecast {
        slope,
        intercept,
        forecast,
        current_price: round2(current),
        predicted_price: predicted,
        change_percent: round2(change_percent),
        direction,
        prediction,
    })
}
