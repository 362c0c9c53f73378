//! Analysis transforms and the result types they share.
//!
//! Each transform is a pure function over a validated [`Series`] returning
//! `Result<Reading, AnalysisError>`. [`Engine`] is the seam callers use: it
//! runs a [`Transform`] and folds any error into a `failed`
//! [`AnalysisResult`], so nothing escapes as an error or a panic.
//!
//! - `trend`: moving-average BULLISH/BEARISH classification
//! - `risk`: volatility tier and daily-return statistics
//! - `forecast`: least-squares projection of future closes
//! - `levels`: support/resistance levels and BUY/SELL/HOLD
//! - `movement`: ranked explanations for the recent move

pub mod forecast;
pub mod levels;
pub mod movement;
pub mod risk;
pub mod trend;

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use crate::domain::error::{AnalysisError, ErrorKind};
use crate::domain::series::{parse_series, Series};
use crate::domain::thresholds::Thresholds;

use forecast::Forecast;
use levels::LevelReading;
use movement::MovementReport;
use risk::RiskReading;
use trend::TrendReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Trend,
    Risk,
    Forecast,
    Levels,
    Movement,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Trend => write!(f, "TREND"),
            Component::Risk => write!(f, "RISK"),
            Component::Forecast => write!(f, "FORECAST"),
            Component::Levels => write!(f, "LEVELS"),
            Component::Movement => write!(f, "MOVEMENT"),
        }
    }
}

/// A transform request with its numeric parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Trend { window: usize },
    Risk,
    Forecast { forecast_days: usize },
    Levels,
    Movement { days_back: usize },
}

impl Transform {
    pub fn trend_default() -> Self {
        Transform::Trend {
            window: trend::DEFAULT_WINDOW,
        }
    }

    pub fn forecast_default() -> Self {
        Transform::Forecast {
            forecast_days: forecast::DEFAULT_FORECAST_DAYS,
        }
    }

    pub fn movement_default() -> Self {
        Transform::Movement {
            days_back: movement::DEFAULT_DAYS_BACK,
        }
    }

    pub fn component(&self) -> Component {
        match self {
            Transform::Trend { .. } => Component::Trend,
            Transform::Risk => Component::Risk,
            Transform::Forecast { .. } => Component::Forecast,
            Transform::Levels => Component::Levels,
            Transform::Movement { .. } => Component::Movement,
        }
    }
}

/// Payload on success, error description on failure.
///
/// Serializes flat, with a `status` field of `success` or `failed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome<T> {
    Success(T),
    Failed { kind: ErrorKind, error: String },
}

impl<T> Outcome<T> {
    pub fn from_result(result: Result<T, AnalysisError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(err) => Outcome::failed(&err),
        }
    }

    pub fn failed(err: &AnalysisError) -> Self {
        Outcome::Failed {
            kind: err.kind(),
            error: err.to_string(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failed { error, .. } => Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Trend(Outcome<TrendReading>),
    Risk(Outcome<RiskReading>),
    Forecast(Outcome<Forecast>),
    Levels(Outcome<LevelReading>),
    Movement(Outcome<MovementReport>),
}

impl AnalysisResult {
    pub fn failed(component: Component, err: &AnalysisError) -> Self {
        match component {
            Component::Trend => AnalysisResult::Trend(Outcome::failed(err)),
            Component::Risk => AnalysisResult::Risk(Outcome::failed(err)),
            Component::Forecast => AnalysisResult::Forecast(Outcome::failed(err)),
            Component::Levels => AnalysisResult::Levels(Outcome::failed(err)),
            Component::Movement => AnalysisResult::Movement(Outcome::failed(err)),
        }
    }

    pub fn component(&self) -> Component {
        match self {
            AnalysisResult::Trend(_) => Component::Trend,
            AnalysisResult::Risk(_) => Component::Risk,
            AnalysisResult::Forecast(_) => Component::Forecast,
            AnalysisResult::Levels(_) => Component::Levels,
            AnalysisResult::Movement(_) => Component::Movement,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisResult::Trend(o) => o.error(),
            AnalysisResult::Risk(o) => o.error(),
            AnalysisResult::Forecast(o) => o.error(),
            AnalysisResult::Levels(o) => o.error(),
            AnalysisResult::Movement(o) => o.error(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error().is_none()
    }
}

/// One-paragraph plain-text summary, used as report body text.
impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let component = self.component();
        if let Some(error) = self.error() {
            return write!(f, "{}: unavailable ({})", component, error);
        }
        match self {
            AnalysisResult::Trend(Outcome::Success(r)) => {
                write!(f, "{}: {}. {}", component, r.trend, r.explanation)
            }
            AnalysisResult::Risk(Outcome::Success(r)) => write!(
                f,
                "{}: {} (volatility {:.2}). {} Range ${:.2} to ${:.2}, currently ${:.2}.",
                component,
                r.risk_level,
                r.volatility,
                r.risk_explanation,
                r.price_range.lowest,
                r.price_range.highest,
                r.price_range.current
            ),
            AnalysisResult::Forecast(Outcome::Success(r)) => {
                write!(f, "{}: {}. {}", component, r.direction, r.prediction)
            }
            AnalysisResult::Levels(Outcome::Success(r)) => write!(
                f,
                "{}: floor ${:.2}, ceiling ${:.2}, current ${:.2}. {}",
                component, r.floor_price, r.ceiling_price, r.current_price, r.signal_explanation
            ),
            AnalysisResult::Movement(Outcome::Success(r)) => {
                let c = &r.context;
                write!(
                    f,
                    "{}: {:+.2} ({:+.2}%) from ${:.2} to ${:.2} over the last {} days.",
                    component,
                    c.price_change,
                    c.price_change_pct,
                    c.starting_price,
                    c.current_price,
                    c.period_days
                )?;
                for (i, e) in r.explanations.iter().enumerate() {
                    write!(
                        f,
                        "\n  {}. {} ({}% confidence): {}",
                        i + 1,
                        e.title,
                        e.confidence,
                        e.rationale
                    )?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Stateless runner for the analysis transforms.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    thresholds: Thresholds,
}

impl Engine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn run(&self, series: &Series, transform: Transform) -> AnalysisResult {
        debug!(
            component = %transform.component(),
            points = series.len(),
            symbol = series.symbol().unwrap_or("-"),
            "running transform"
        );
        let t = &self.thresholds;
        let result = match transform {
            Transform::Trend { window } => {
                AnalysisResult::Trend(Outcome::from_result(trend::classify(series, window)))
            }
            Transform::Risk => AnalysisResult::Risk(Outcome::from_result(risk::classify(series, t))),
            Transform::Forecast { forecast_days } => AnalysisResult::Forecast(
                Outcome::from_result(forecast::project(series, forecast_days)),
            ),
            Transform::Levels => {
                AnalysisResult::Levels(Outcome::from_result(levels::analyze(series, t)))
            }
            Transform::Movement { days_back } => AnalysisResult::Movement(Outcome::from_result(
                movement::explain(series, days_back, t),
            )),
        };
        if let Some(error) = result.error() {
            warn!(component = %transform.component(), %error, "transform failed");
        }
        result
    }

    /// Validate raw interchange JSON, then run the transform on it.
    pub fn run_raw(&self, raw: &str, transform: Transform) -> AnalysisResult {
        match parse_series(raw) {
            Ok(series) => self.run(&series, transform),
            Err(err) => {
                warn!(component = %transform.component(), error = %err, "series rejected");
                AnalysisResult::failed(transform.component(), &err)
            }
        }
    }

    pub fn run_all(&self, series: &Series, transforms: &[Transform]) -> Vec<AnalysisResult> {
        transforms.iter().map(|t| self.run(series, *t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::PricePoint;
    use chrono::NaiveDate;
    use serde_json::Value;

    fn rising_series() -> Series {
        let points = (0..10)
            .map(|i| {
                let close = 100.0 + i as f64;
                PricePoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, i + 1).unwrap(),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000_000,
                }
            })
            .collect();
        Series::new(Some("ACME".into()), points).unwrap()
    }

    #[test]
    fn success_serializes_flat_with_status() {
        let engine = Engine::default();
        let result = engine.run(&rising_series(), Transform::trend_default());
        let json: Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["trend"], "BULLISH");
        assert_eq!(json["average_price"], 106.0);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failure_serializes_error_and_kind() {
        let engine = Engine::default();
        let result = engine.run(&rising_series(), Transform::Trend { window: 20 });
        assert!(!result.is_success());
        let json: Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "insufficient_data");
        assert_eq!(json["error"], "insufficient data: have 10 points, need 20");
    }

    #[test]
    fn run_raw_reports_validation_failure_for_requested_component() {
        let engine = Engine::default();
        let result = engine.run_raw("{\"data\": \"nope\"}", Transform::Risk);
        assert_eq!(result.component(), Component::Risk);
        let json: Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "malformed_input");
    }

    #[test]
    fn run_all_preserves_request_order() {
        let engine = Engine::default();
        let transforms = [
            Transform::Levels,
            Transform::trend_default(),
            Transform::forecast_default(),
            Transform::Risk,
            Transform::movement_default(),
        ];
        let results = engine.run_all(&rising_series(), &transforms);
        let components: Vec<Component> = results.iter().map(|r| r.component()).collect();
        assert_eq!(
            components,
            vec![
                Component::Levels,
                Component::Trend,
                Component::Forecast,
                Component::Risk,
                Component::Movement
            ]
        );
        assert!(results.iter().all(|r| r.is_success()));
    }

    #[test]
    fn display_summarizes_success_and_failure() {
        let engine = Engine::default();
        let ok = engine.run(&rising_series(), Transform::trend_default());
        assert!(ok.to_string().starts_with("TREND: BULLISH."));

        let failed = engine.run(&rising_series(), Transform::Forecast { forecast_days: 0 });
        assert_eq!(
            failed.to_string(),
            "FORECAST: unavailable (invalid parameter forecast_days: must be at least 1)"
        );
    }

    #[test]
    fn movement_summary_lists_ranked_explanations() {
        let engine = Engine::default();
        let result = engine.run(&rising_series(), Transform::movement_default());
        let text = result.to_string();
        assert!(text.starts_with("MOVEMENT: +4.00 (+3.81%) from $105.00 to $109.00"));
        assert!(text.contains("\n  1. "));
    }
}
