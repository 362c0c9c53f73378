//! Seeded random-walk data adapter for demos and tests.

use crate::domain::error::AnalysisError;
use crate::domain::ohlcv::PricePoint;
use crate::domain::series::Series;
use crate::domain::stats::round2;
use crate::ports::data_port::DataPort;
use chrono::{Duration, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BASE_PRICE_MIN: f64 = 50.0;
const BASE_PRICE_MAX: f64 = 500.0;
const DAILY_STEP: f64 = 5.0;
const PRICE_FLOOR: f64 = 10.0;
const OPEN_GAP_MAX: f64 = 2.0;
const WICK_MAX: f64 = 3.0;
const VOLUME_MIN: u64 = 1_000_000;
const VOLUME_MAX: u64 = 10_000_000;

/// Longest series the adapter will generate, about a century of days.
pub const MAX_SIMULATED_DAYS: usize = 36_500;

/// Generates a daily random walk per symbol.
///
/// The same seed, symbol and anchor always yield the same series. Dates run
/// over consecutive calendar days ending the day before the anchor.
pub struct SimulatedAdapter {
    seed: u64,
    anchor: NaiveDate,
}

impl SimulatedAdapter {
    /// Anchored on today's local date.
    pub fn new(seed: u64) -> Self {
        Self::with_anchor(seed, Local::now().date_naive())
    }

    pub fn with_anchor(seed: u64, anchor: NaiveDate) -> Self {
        Self { seed, anchor }
    }

    fn rng_for(&self, symbol: &str) -> StdRng {
        let salt = symbol
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        StdRng::seed_from_u64(self.seed ^ salt)
    }
}

impl DataPort for SimulatedAdapter {
    fn fetch_series(&self, symbol: &str, days: usize) -> Result<Series, AnalysisError> {
        if days == 0 {
            return Err(AnalysisError::invalid_parameter(
                "days",
                "must be at least 1",
            ));
        }
        if days > MAX_SIMULATED_DAYS {
            return Err(AnalysisError::invalid_parameter(
                "days",
                format!("must be at most {}", MAX_SIMULATED_DAYS),
            ));
        }

        let symbol = symbol.trim().to_uppercase();
        let mut rng = self.rng_for(&symbol);
        let mut price = rng.gen_range(BASE_PRICE_MIN..BASE_PRICE_MAX);

        let mut points = Vec::with_capacity(days);
        for i in 0..days {
            let date = self
                .anchor
                .checked_sub_signed(Duration::days((days - i) as i64))
                .ok_or_else(|| {
                    AnalysisError::invalid_parameter("days", "reaches before the earliest date")
                })?;
            price = (price + rng.gen_range(-DAILY_STEP..DAILY_STEP)).max(PRICE_FLOOR);

            let open = price - rng.gen_range(0.0..OPEN_GAP_MAX);
            let high = price + rng.gen_range(0.0..WICK_MAX);
            let low = open - rng.gen_range(0.0..WICK_MAX);

            // open <= close, so the wicks bracket both after rounding.
            points.push(PricePoint {
                date,
                open: round2(open),
                high: round2(high),
                low: round2(low),
                close: round2(price),
                volume: rng.gen_range(VOLUME_MIN..=VOLUME_MAX),
            });
        }

        Series::new(Some(symbol), points)
    }

    /// Any symbol can be simulated, so there is nothing to enumerate.
    fn list_symbols(&self) -> Result<Vec<String>, AnalysisError> {
        Ok(Vec::new())
    }
}
