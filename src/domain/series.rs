//! Canonical price series and the validator that produces it.
//!
//! Everything that enters the engine passes through [`parse_series`] or
//! [`Series::new`]. Downstream transforms only ever see a [`Series`], which
//! is non-empty, sorted by ascending date with no duplicates, and made of
//! points that satisfy [`PricePoint::check`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::AnalysisError;
use crate::domain::ohlcv::PricePoint;

/// Interchange envelope: a record sequence plus optional metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesEnvelope {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub period_days: Option<usize>,
    pub data: Vec<PricePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Immutable, validated daily series for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    symbol: Option<String>,
    points: Vec<PricePoint>,
}

impl Series {
    /// Validate and normalize `points` into a series.
    ///
    /// Points are stably sorted by date first; a date that then appears twice
    /// is rejected, as is any point failing [`PricePoint::check`].
    pub fn new(symbol: Option<String>, mut points: Vec<PricePoint>) -> Result<Self, AnalysisError> {
        if points.is_empty() {
            return Err(AnalysisError::InsufficientData { have: 0, need: 1 });
        }

        for point in &points {
            point.check()?;
        }

        points.sort_by_key(|p| p.date);
        if let Some(pair) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(AnalysisError::malformed(format!(
                "duplicate date {}",
                pair[0].date
            )));
        }

        let symbol = symbol
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty());

        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The most recent `n` points, or all of them when the series is shorter.
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Fill in `symbol` when the series carries none; an existing symbol wins.
    pub fn with_default_symbol(mut self, symbol: &str) -> Series {
        if self.symbol.is_none() {
            let symbol = symbol.trim().to_uppercase();
            self.symbol = (!symbol.is_empty()).then_some(symbol);
        }
        self
    }

    /// A new series holding only the most recent `n` points.
    pub fn truncated(&self, n: usize) -> Result<Series, AnalysisError> {
        Series::new(self.symbol.clone(), self.tail(n).to_vec())
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn to_envelope(&self) -> SeriesEnvelope {
        SeriesEnvelope {
            symbol: self.symbol.clone(),
            period_days: Some(self.points.len()),
            data: self.points.clone(),
            status: Some("success".to_string()),
        }
    }
}

/// Parse the interchange format, bare array or envelope, into a [`Series`].
pub fn parse_series(raw: &str) -> Result<Series, AnalysisError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AnalysisError::malformed(format!("invalid JSON: {}", e)))?;

    match value {
        Value::Array(_) => {
            let points: Vec<PricePoint> = serde_json::from_value(value)
                .map_err(|e| AnalysisError::malformed(format!("invalid price record: {}", e)))?;
            Series::new(None, points)
        }
        Value::Object(_) => {
            let envelope: SeriesEnvelope = serde_json::from_value(value)
                .map_err(|e| AnalysisError::malformed(format!("invalid series envelope: {}", e)))?;
            Series::new(envelope.symbol, envelope.data)
        }
        other => Err(AnalysisError::malformed(format!(
            "expected an array of price records or an object with a `data` array, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
