//! Data provider port trait.

use crate::domain::error::AnalysisError;
use crate::domain::series::Series;

/// Supplies a fully materialized daily series for a symbol.
///
/// Implementations return the most recent `days` points when they hold
/// more, and everything they have otherwise. The returned series has
/// already passed the validator.
pub trait DataPort {
    fn fetch_series(&self, symbol: &str, days: usize) -> Result<Series, AnalysisError>;

    fn list_symbols(&self) -> Result<Vec<String>, AnalysisError>;
}
