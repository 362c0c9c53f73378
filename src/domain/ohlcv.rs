//! Daily price point representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::AnalysisError;

/// One trading day of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Rejects non-positive or non-finite prices and bars whose high/low do
    /// not bracket the open and close.
    pub fn check(&self) -> Result<(), AnalysisError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnalysisError::malformed(format!(
                    "{}: {} must be a positive number, got {}",
                    self.date, name, value
                )));
            }
        }

        if self.high < self.open.max(self.close) {
            return Err(AnalysisError::malformed(format!(
                "{}: high {} is below max(open, close)",
                self.date, self.high
            )));
        }
        if self.low > self.open.min(self.close) {
            return Err(AnalysisError::malformed(format!(
                "{}: low {} is above min(open, close)",
                self.date, self.low
            )));
        }
        Ok(())
    }
}
