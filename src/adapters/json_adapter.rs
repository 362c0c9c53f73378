//! Interchange-format file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.json`, holding either a bare array
//! of price records or an enveloped series.

use crate::domain::error::AnalysisError;
use crate::domain::series::{parse_series, Series};
use crate::ports::data_port::DataPort;
use std::fs;
use std::io;
use std::path::PathBuf;

pub struct JsonAdapter {
    base_path: PathBuf,
}

impl JsonAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn json_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", symbol.to_uppercase()))
    }
}

impl DataPort for JsonAdapter {
    fn fetch_series(&self, symbol: &str, days: usize) -> Result<Series, AnalysisError> {
        let path = self.json_path(symbol);
        let raw = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AnalysisError::NoData {
                symbol: symbol.to_uppercase(),
            },
            _ => AnalysisError::Io(e),
        })?;

        // A bare array carries no symbol; the file name supplies it.
        parse_series(&raw)?
            .with_default_symbol(symbol)
            .truncated(days)
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalysisError> {
        let mut symbols: Vec<String> = fs::read_dir(&self.base_path)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .strip_suffix(".json")
                    .map(str::to_string)
            })
            .collect();
        symbols.sort();
        Ok(symbols)
    }
}
