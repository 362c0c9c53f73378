//! Tunable classification thresholds.
//!
//! The defaults are heuristics carried over unchanged from the first
//! version of the engine. They have no derivation beyond "worked on demo
//! data", so they live here as named values that can be overridden from
//! the INI config instead of being buried in the classifiers.

pub const DEFAULT_LOW_RISK_CEILING: f64 = 5.0;
pub const DEFAULT_MEDIUM_RISK_CEILING: f64 = 15.0;

pub const DEFAULT_LEVEL_LOOKBACK: usize = 10;
pub const DEFAULT_LEVEL_COUNT: usize = 3;

pub const DEFAULT_VOLUME_SPIKE_RATIO: f64 = 1.5;
pub const DEFAULT_VOLUME_CONFIDENCE_PER_RATIO: f64 = 30.0;
pub const DEFAULT_VOLUME_CONFIDENCE_CAP: u8 = 85;
pub const DEFAULT_NEWS_RANGE_MULTIPLE: f64 = 1.5;
pub const DEFAULT_NEWS_CONFIDENCE: u8 = 70;
pub const DEFAULT_REACTION_CONFIDENCE: u8 = 65;
pub const DEFAULT_RANGE_BOUND_CONFIDENCE: u8 = 55;
pub const DEFAULT_REACTION_LOOKBACK: usize = 3;
pub const DEFAULT_GAP_RANGE_FRACTION: f64 = 0.3;
pub const DEFAULT_SUSTAINED_MOVE_PCT: f64 = 2.0;
pub const DEFAULT_VOLUME_CONFIRMATION_RATIO: f64 = 1.2;
pub const DEFAULT_FOLLOW_THROUGH_PCT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Volatility strictly below this is LOW risk.
    pub low_risk_ceiling: f64,
    /// Volatility strictly below this (and not LOW) is MEDIUM risk.
    pub medium_risk_ceiling: f64,

    pub level_lookback: usize,
    pub level_count: usize,

    /// Spike ratio that must be exceeded to emit a volume-driven explanation.
    pub volume_spike_ratio: f64,
    pub volume_confidence_per_ratio: f64,
    pub volume_confidence_cap: u8,
    /// Window range must exceed this multiple of the mean daily range.
    pub news_range_multiple: f64,
    pub news_confidence: u8,
    pub reaction_confidence: u8,
    pub range_bound_confidence: u8,
    /// Trailing closes used for the bounce/rejection reference levels.
    pub reaction_lookback: usize,
    pub gap_range_fraction: f64,
    pub sustained_move_pct: f64,
    pub volume_confirmation_ratio: f64,
    pub follow_through_pct: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_risk_ceiling: DEFAULT_LOW_RISK_CEILING,
            medium_risk_ceiling: DEFAULT_MEDIUM_RISK_CEILING,
            level_lookback: DEFAULT_LEVEL_LOOKBACK,
            level_count: DEFAULT_LEVEL_COUNT,
            volume_spike_ratio: DEFAULT_VOLUME_SPIKE_RATIO,
            volume_confidence_per_ratio: DEFAULT_VOLUME_CONFIDENCE_PER_RATIO,
            volume_confidence_cap: DEFAULT_VOLUME_CONFIDENCE_CAP,
            news_range_multiple: DEFAULT_NEWS_RANGE_MULTIPLE,
            news_confidence: DEFAULT_NEWS_CONFIDENCE,
            reaction_confidence: DEFAULT_REACTION_CONFIDENCE,
            range_bound_confidence: DEFAULT_RANGE_BOUND_CONFIDENCE,
            reaction_lookback: DEFAULT_REACTION_LOOKBACK,
            gap_range_fraction: DEFAULT_GAP_RANGE_FRACTION,
            sustained_move_pct: DEFAULT_SUSTAINED_MOVE_PCT,
            volume_confirmation_ratio: DEFAULT_VOLUME_CONFIRMATION_RATIO,
            follow_through_pct: DEFAULT_FOLLOW_THROUGH_PCT,
        }
    }
}

impl Thresholds {
    /// min(cap, floor(spike_ratio * per_ratio)), clamped to 0..=100.
    pub fn volume_confidence(&self, spike_ratio: f64) -> u8 {
        let raw = (spike_ratio * self.volume_confidence_per_ratio).floor();
        let capped = raw.min(self.volume_confidence_cap as f64).clamp(0.0, 100.0);
        capped as u8
    }
}
