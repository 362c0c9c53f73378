//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row of
//! `date,open,high,low,close,volume`.

use crate::domain::error::AnalysisError;
use crate::domain::ohlcv::PricePoint;
use crate::domain::series::Series;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

fn column<T>(record: &csv::StringRecord, index: usize, name: &str) -> Result<T, AnalysisError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| AnalysisError::malformed(format!("missing {} column", name)))?
        .trim()
        .parse()
        .map_err(|e| AnalysisError::malformed(format!("invalid {} value: {}", name, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, symbol: &str, days: usize) -> Result<Series, AnalysisError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AnalysisError::NoData {
                symbol: symbol.to_uppercase(),
            },
            _ => AnalysisError::Io(e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result
                .map_err(|e| AnalysisError::malformed(format!("CSV parse error: {}", e)))?;

            let date_str: String = column(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .map_err(|e| AnalysisError::malformed(format!("invalid date format: {}", e)))?;

            points.push(PricePoint {
                date,
                open: column(&record, 1, "open")?,
                high: column(&record, 2, "high")?,
                low: column(&record, 3, "low")?,
                close: column(&record, 4, "close")?,
                volume: column(&record, 5, "volume")?,
            });
        }

        if points.is_empty() {
            return Err(AnalysisError::NoData {
                symbol: symbol.to_uppercase(),
            });
        }

        Series::new(Some(symbol.to_string()), points)?.truncated(days)
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalysisError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
