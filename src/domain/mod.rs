//! Core domain types and logic.

pub mod ohlcv;
pub mod series;
pub mod stats;
pub mod thresholds;
pub mod config;
pub mod analysis;
pub mod report;
pub mod error;
