//! Movement explainer: ranked causal hypotheses ("alibis") for a recent move.
//!
//! Up to three candidates are generated over the trailing window, in this
//! order, and then stably sorted by descending confidence:
//!
//! 1. volume-driven move, when the spike ratio exceeds the threshold
//! 2. news / volatility event, when the window range is wide relative to
//!    the mean daily range
//! 3. level reaction (bounce, rejection or range-bound), whenever the
//!    window holds at least two points

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::error::AnalysisError;
use crate::domain::ohlcv::PricePoint;
use crate::domain::series::Series;
use crate::domain::stats::{mean, round2};
use crate::domain::thresholds::Thresholds;

pub const DEFAULT_DAYS_BACK: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationKind {
    BullishVolumeSurge,
    PanicSelling,
    NewsEvent,
    SupportBounce,
    ResistanceRejection,
    RangeBound,
}

impl ExplanationKind {
    pub fn title(&self) -> &'static str {
        match self {
            ExplanationKind::BullishVolumeSurge => "Bullish Volume Surge",
            ExplanationKind::PanicSelling => "Panic Selling / Distribution",
            ExplanationKind::NewsEvent => "News Event / Earnings",
            ExplanationKind::SupportBounce => "Support Bounce",
            ExplanationKind::ResistanceRejection => "Resistance Rejection",
            ExplanationKind::RangeBound => "Range-bound Movement",
        }
    }

    /// Generation slot: 1 volume, 2 news, 3 level reaction.
    pub fn rank(&self) -> u8 {
        match self {
            ExplanationKind::BullishVolumeSurge | ExplanationKind::PanicSelling => 1,
            ExplanationKind::NewsEvent => 2,
            ExplanationKind::SupportBounce
            | ExplanationKind::ResistanceRejection
            | ExplanationKind::RangeBound => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub kind: ExplanationKind,
    pub rank: u8,
    pub title: String,
    pub rationale: String,
    pub signals: BTreeMap<&'static str, bool>,
    pub confidence: u8,
}

impl Explanation {
    fn new(
        kind: ExplanationKind,
        rationale: String,
        signals: &[(&'static str, bool)],
        confidence: u8,
    ) -> Self {
        Self {
            kind,
            rank: kind.rank(),
            title: kind.title().to_string(),
            rationale,
            signals: signals.iter().copied().collect(),
            confidence: confidence.min(100),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementContext {
    pub period_days: usize,
    pub price_change: f64,
    pub price_change_pct: f64,
    pub average_volume: f64,
    pub volume_spike_ratio: f64,
    pub volatility_range: f64,
    pub current_price: f64,
    pub starting_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementReport {
    pub explanations: Vec<Explanation>,
    pub context: MovementContext,
}

/// Raw statistics of the trailing window, before rounding.
struct WindowStats {
    closes: Vec<f64>,
    price_change: f64,
    price_change_pct: f64,
    average_volume: f64,
    spike_ratio: f64,
    range: f64,
    mean_daily_range: f64,
}

impl WindowStats {
    fn compute(window: &[PricePoint]) -> Option<Self> {
        let first = window.first()?;
        let last = window.last()?;

        let closes: Vec<f64> = window.iter().map(|p| p.close).collect();
        let price_change = last.close - first.close;
        let price_change_pct = price_change / first.close * 100.0;

        let volumes: Vec<f64> = window.iter().map(|p| p.volume as f64).collect();
        let average_volume = mean(&volumes);
        let peak_volume = volumes.iter().copied().fold(0.0, f64::max);
        // All-zero volume leaves the ratio undefined; treat it as no spike.
        let spike_ratio = if average_volume > 0.0 {
            peak_volume / average_volume
        } else {
            1.0
        };

        let max_high = window.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
        let min_low = window.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
        let daily_ranges: Vec<f64> = window.iter().map(PricePoint::range).collect();

        Some(Self {
            closes,
            price_change,
            price_change_pct,
            average_volume,
            spike_ratio,
            range: max_high - min_low,
            mean_daily_range: mean(&daily_ranges),
        })
    }

    fn last_move(&self) -> Option<f64> {
        match self.closes.as_slice() {
            [.., prev, last] => Some((last - prev).abs()),
            _ => None,
        }
    }
}

fn volume_explanation(stats: &WindowStats, t: &Thresholds) -> Option<Explanation> {
    if stats.spike_ratio <= t.volume_spike_ratio {
        return None;
    }
    let gap = stats
        .last_move()
        .is_some_and(|m| m > stats.range * t.gap_range_fraction);
    let confidence = t.volume_confidence(stats.spike_ratio);

    let explanation = if stats.price_change > 0.0 {
        Explanation::new(
            ExplanationKind::BullishVolumeSurge,
            format!(
                "Heavy buying pressure: volume spiked {:.1}x normal. Buyers came in strong.",
                stats.spike_ratio
            ),
            &[
                ("high_volume", true),
                ("price_up", true),
                ("gap_up", gap),
                ("sustained_move", stats.price_change_pct > t.sustained_move_pct),
            ],
            confidence,
        )
    } else {
        Explanation::new(
            ExplanationKind::PanicSelling,
            format!(
                "Heavy selling pressure: volume spiked {:.1}x normal. Forced liquidation or profit-taking.",
                stats.spike_ratio
            ),
            &[
                ("high_volume", true),
                ("price_down", true),
                ("gap_down", gap),
                ("sustained_move", stats.price_change_pct < -t.sustained_move_pct),
            ],
            confidence,
        )
    };
    Some(explanation)
}

fn news_explanation(stats: &WindowStats, t: &Thresholds) -> Option<Explanation> {
    if stats.range <= stats.mean_daily_range * t.news_range_multiple {
        return None;
    }
    Some(Explanation::new(
        ExplanationKind::NewsEvent,
        format!(
            "Big price swing ({:.2}) suggests news, earnings, or a major announcement.",
            stats.range
        ),
        &[
            ("high_volatility", true),
            ("wide_range", true),
            ("unusual_movement", true),
            ("potential_catalyst", true),
        ],
        t.news_confidence,
    ))
}

fn reaction_explanation(stats: &WindowStats, t: &Thresholds) -> Option<Explanation> {
    if stats.closes.len() < 2 {
        return None;
    }
    let start = stats.closes.len().saturating_sub(t.reaction_lookback.max(1));
    let recent = &stats.closes[start..];
    let recent_low = recent.iter().copied().fold(f64::INFINITY, f64::min);
    let recent_high = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let close = stats.closes[stats.closes.len() - 1];
    let volume_confirmed = stats.spike_ratio > t.volume_confirmation_ratio;

    let explanation = if stats.price_change > 0.0 && close > recent_low {
        Explanation::new(
            ExplanationKind::SupportBounce,
            format!(
                "Price bounced off support (${:.2}). Buyers stepped in at the floor.",
                recent_low
            ),
            &[
                ("touched_support", true),
                ("bounced_up", true),
                ("volume_on_bounce", volume_confirmed),
                ("recovery_move", stats.price_change_pct > t.follow_through_pct),
            ],
            t.reaction_confidence,
        )
    } else if stats.price_change < 0.0 && close < recent_high {
        Explanation::new(
            ExplanationKind::ResistanceRejection,
            format!(
                "Price hit resistance (${:.2}) and got rejected. Sellers took over.",
                recent_high
            ),
            &[
                ("touched_resistance", true),
                ("rejected_down", true),
                ("volume_on_rejection", volume_confirmed),
                ("breakdown_move", stats.price_change_pct < -t.follow_through_pct),
            ],
            t.reaction_confidence,
        )
    } else {
        Explanation::new(
            ExplanationKind::RangeBound,
            "Price moved within its normal range. No major catalyst detected.".to_string(),
            &[
                ("normal_volatility", true),
                ("within_range", true),
                ("no_catalyst", true),
                ("consolidation", true),
            ],
            t.range_bound_confidence,
        )
    };
    Some(explanation)
}

pub fn explain(
    series: &Series,
    days_back: usize,
    thresholds: &Thresholds,
) -> Result<MovementReport, AnalysisError> {
    if days_back == 0 {
        return Err(AnalysisError::invalid_parameter(
            "days_back",
            "must be at least 1",
        ));
    }
    let window = series.tail(days_back);
    let stats =
        WindowStats::compute(window).ok_or(AnalysisError::InsufficientData { have: 0, need: 1 })?;

    let mut explanations: Vec<Explanation> = [
        volume_explanation(&stats, thresholds),
        news_explanation(&stats, thresholds),
        reaction_explanation(&stats, thresholds),
    ]
    .into_iter()
    .flatten()
    .collect();
    // Stable: equal confidences keep generation order.
    explanations.sort_by(|a, b| b.confidence.cmp(&a.confidence));

    let context = MovementContext {
        period_days: days_back,
        price_change: round2(stats.price_change),
        price_change_pct: round2(stats.price_change_pct),
        average_volume: round2(stats.average_volume),
        volume_spike_ratio: round2(stats.spike_ratio),
        volatility_range: round2(stats.range),
        current_price: round2(stats.closes[stats.closes.len() - 1]),
        starting_price: round2(stats.closes[0]),
    };

    Ok(MovementReport {
        explanations,
        context,
    })
}
