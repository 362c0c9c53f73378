//! Analysis configuration: transform parameters and thresholds.
//!
//! Every key is optional; missing keys take the built-in defaults. Values
//! that are present are validated before any transform runs.

use crate::domain::analysis::{forecast, movement, trend, Transform};
use crate::domain::error::AnalysisError;
use crate::domain::thresholds::Thresholds;
use crate::ports::config_port::ConfigPort;
use tracing::warn;

const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("analysis", &["window", "forecast_days", "days_back"]),
    ("risk", &["low_ceiling", "medium_ceiling"]),
    ("levels", &["lookback", "count"]),
    (
        "movement",
        &[
            "volume_spike_ratio",
            "volume_confidence_per_ratio",
            "volume_confidence_cap",
            "news_range_multiple",
            "news_confidence",
            "reaction_confidence",
            "range_bound_confidence",
            "reaction_lookback",
            "gap_range_fraction",
            "sustained_move_pct",
            "volume_confirmation_ratio",
            "follow_through_pct",
        ],
    ),
];

/// Keys in known sections that no setting reads, as `section.key`.
pub fn unknown_keys(config: &dyn ConfigPort) -> Vec<String> {
    KNOWN_KEYS
        .iter()
        .flat_map(|(section, known)| {
            config
                .keys(section)
                .into_iter()
                .filter(|key| !known.contains(&key.as_str()))
                .map(move |key| format!("{}.{}", section, key))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub window: usize,
    pub forecast_days: usize,
    pub days_back: usize,
    pub thresholds: Thresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: trend::DEFAULT_WINDOW,
            forecast_days: forecast::DEFAULT_FORECAST_DAYS,
            days_back: movement::DEFAULT_DAYS_BACK,
            thresholds: Thresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Every transform, in report order.
    pub fn transforms(&self) -> Vec<Transform> {
        vec![
            Transform::Trend {
                window: self.window,
            },
            Transform::Risk,
            Transform::Forecast {
                forecast_days: self.forecast_days,
            },
            Transform::Levels,
            Transform::Movement {
                days_back: self.days_back,
            },
        ]
    }
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, AnalysisError> {
    for key in unknown_keys(config) {
        warn!(%key, "unrecognized config key");
    }
    let d = Thresholds::default();

    let low_risk_ceiling = read_positive(config, "risk", "low_ceiling", d.low_risk_ceiling)?;
    let medium_risk_ceiling =
        read_positive(config, "risk", "medium_ceiling", d.medium_risk_ceiling)?;
    if low_risk_ceiling >= medium_risk_ceiling {
        return Err(invalid(
            "risk",
            "medium_ceiling",
            "medium_ceiling must be greater than low_ceiling",
        ));
    }

    let thresholds = Thresholds {
        low_risk_ceiling,
        medium_risk_ceiling,
        level_lookback: read_count(config, "levels", "lookback", d.level_lookback)?,
        level_count: read_count(config, "levels", "count", d.level_count)?,
        volume_spike_ratio: read_positive(
            config,
            "movement",
            "volume_spike_ratio",
            d.volume_spike_ratio,
        )?,
        volume_confidence_per_ratio: read_positive(
            config,
            "movement",
            "volume_confidence_per_ratio",
            d.volume_confidence_per_ratio,
        )?,
        volume_confidence_cap: read_confidence(
            config,
            "movement",
            "volume_confidence_cap",
            d.volume_confidence_cap,
        )?,
        news_range_multiple: read_positive(
            config,
            "movement",
            "news_range_multiple",
            d.news_range_multiple,
        )?,
        news_confidence: read_confidence(config, "movement", "news_confidence", d.news_confidence)?,
        reaction_confidence: read_confidence(
            config,
            "movement",
            "reaction_confidence",
            d.reaction_confidence,
        )?,
        range_bound_confidence: read_confidence(
            config,
            "movement",
            "range_bound_confidence",
            d.range_bound_confidence,
        )?,
        reaction_lookback: read_count(config, "movement", "reaction_lookback", d.reaction_lookback)?,
        gap_range_fraction: read_positive(
            config,
            "movement",
            "gap_range_fraction",
            d.gap_range_fraction,
        )?,
        sustained_move_pct: read_positive(
            config,
            "movement",
            "sustained_move_pct",
            d.sustained_move_pct,
        )?,
        volume_confirmation_ratio: read_positive(
            config,
            "movement",
            "volume_confirmation_ratio",
            d.volume_confirmation_ratio,
        )?,
        follow_through_pct: read_positive(
            config,
            "movement",
            "follow_through_pct",
            d.follow_through_pct,
        )?,
    };

    Ok(AnalysisConfig {
        window: read_count(config, "analysis", "window", trend::DEFAULT_WINDOW)?,
        forecast_days: read_count(
            config,
            "analysis",
            "forecast_days",
            forecast::DEFAULT_FORECAST_DAYS,
        )?,
        days_back: read_count(config, "analysis", "days_back", movement::DEFAULT_DAYS_BACK)?,
        thresholds,
    })
}

fn invalid(section: &str, key: &str, reason: &str) -> AnalysisError {
    AnalysisError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn read_count(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, AnalysisError> {
    let value = config.get_int(section, key, default as i64);
    if value < 1 {
        return Err(invalid(section, key, &format!("{} must be at least 1", key)));
    }
    Ok(value as usize)
}

fn read_positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, AnalysisError> {
    let value = config.get_double(section, key, default);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(section, key, &format!("{} must be positive", key)));
    }
    Ok(value)
}

fn read_confidence(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: u8,
) -> Result<u8, AnalysisError> {
    let value = config.get_int(section, key, default as i64);
    if !(0..=100).contains(&value) {
        return Err(invalid(
            section,
            key,
            &format!("{} must be between 0 and 100", key),
        ));
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = build_analysis_config(&make_config("")).unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.window, 7);
        assert_eq!(config.forecast_days, 5);
        assert_eq!(config.days_back, 5);
    }

    #[test]
    fn overrides_are_applied() {
        let config = build_analysis_config(&make_config(
            r#"
[analysis]
window = 20
forecast_days = 10

[risk]
low_ceiling = 2.5
medium_ceiling = 7.5

[movement]
news_confidence = 75
"#,
        ))
        .unwrap();
        assert_eq!(config.window, 20);
        assert_eq!(config.forecast_days, 10);
        assert_eq!(config.days_back, 5);
        assert_eq!(config.thresholds.low_risk_ceiling, 2.5);
        assert_eq!(config.thresholds.medium_risk_ceiling, 7.5);
        assert_eq!(config.thresholds.news_confidence, 75);
    }

    #[test]
    fn zero_window_fails() {
        let err = build_analysis_config(&make_config("[analysis]\nwindow = 0\n")).unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigInvalid { key, .. } if key == "window"));
    }

    #[test]
    fn inverted_risk_ceilings_fail() {
        let err = build_analysis_config(&make_config(
            "[risk]\nlow_ceiling = 20\nmedium_ceiling = 10\n",
        ))
        .unwrap_err();
        assert!(
            matches!(err, AnalysisError::ConfigInvalid { key, .. } if key == "medium_ceiling")
        );
    }

    #[test]
    fn confidence_above_100_fails() {
        let err = build_analysis_config(&make_config(
            "[movement]\nreaction_confidence = 101\n",
        ))
        .unwrap_err();
        assert!(
            matches!(err, AnalysisError::ConfigInvalid { key, .. } if key == "reaction_confidence")
        );
    }

    #[test]
    fn negative_ratio_fails() {
        let err = build_analysis_config(&make_config(
            "[movement]\nvolume_spike_ratio = -1.5\n",
        ))
        .unwrap_err();
        assert!(
            matches!(err, AnalysisError::ConfigInvalid { section, .. } if section == "movement")
        );
    }

    #[test]
    fn unknown_keys_are_reported() {
        let config = make_config("[analysis]\nwindow = 3\nwindw = 4\n[levels]\ncount = 2\ndepth = 1\n[other]\nx = 1\n");
        assert_eq!(unknown_keys(&config), vec!["analysis.windw", "levels.depth"]);
        assert!(build_analysis_config(&config).is_ok());
    }

    #[test]
    fn transforms_follow_config() {
        let config = AnalysisConfig {
            window: 3,
            ..AnalysisConfig::default()
        };
        let transforms = config.transforms();
        assert_eq!(transforms.len(), 5);
        assert_eq!(transforms[0], Transform::Trend { window: 3 });
        assert_eq!(transforms[4], Transform::Movement { days_back: 5 });
    }
}
