#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use stockpredictor::domain::error::AnalysisError;
pub use stockpredictor::domain::ohlcv::PricePoint;
use stockpredictor::domain::series::Series;
use stockpredictor::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self, symbol: &str, days: usize) -> Result<Series, AnalysisError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(AnalysisError::malformed(reason.clone()));
        }
        let points = self
            .data
            .get(symbol)
            .cloned()
            .ok_or_else(|| AnalysisError::NoData {
                symbol: symbol.to_string(),
            })?;
        Series::new(Some(symbol.to_string()), points)?.truncated(days)
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalysisError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn start_date() -> NaiveDate {
    date(2024, 1, 1)
}

/// A point `offset` days after [`start_date`], one unit of wick either side.
pub fn make_point(offset: usize, close: f64, volume: u64) -> PricePoint {
    PricePoint {
        date: start_date() + Duration::days(offset as i64),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume,
    }
}

pub fn points_from_closes(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_point(i, c, 1_000_000))
        .collect()
}

pub fn series_from_closes(closes: &[f64]) -> Series {
    Series::new(Some("TEST".to_string()), points_from_closes(closes)).unwrap()
}

pub fn series_with_volumes(closes: &[f64], volumes: &[u64]) -> Series {
    let points = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| make_point(i, c, v))
        .collect();
    Series::new(Some("TEST".to_string()), points).unwrap()
}

/// Closes 100, 101, ..., 109.
pub fn ten_day_ramp() -> Vec<f64> {
    (0..10).map(|i| 100.0 + i as f64).collect()
}

pub fn to_json(points: &[PricePoint]) -> String {
    serde_json::to_string(points).unwrap()
}
