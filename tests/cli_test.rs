//! CLI integration tests.
//!
//! Tests cover:
//! - Config loading from INI files on disk
//! - Source resolution for `analyze`
//! - `simulate`, `run`, `analyze` and `list-symbols` end to end through temp files

mod common;

use clap::Parser;
use common::*;
use serde_json::Value;
use std::fs;
use std::io::Write;
use stockpredictor::cli::{self, Cli, DataSource, TransformArg};
use stockpredictor::domain::analysis::Transform;
use stockpredictor::domain::config::AnalysisConfig;
use stockpredictor::domain::error::AnalysisError;
use stockpredictor::domain::series::{parse_series, Series};
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn ramp_envelope(symbol: &str) -> String {
    let series = Series::new(Some(symbol.to_string()), points_from_closes(&ten_day_ramp())).unwrap();
    serde_json::to_string(&series.to_envelope()).unwrap()
}

fn run_args(args: &[&str]) {
    let mut argv = vec!["stockpredictor"];
    argv.extend_from_slice(args);
    cli::run(Cli::try_parse_from(argv).unwrap());
}

mod config_loading {
    use super::*;

    #[test]
    fn no_config_means_defaults() {
        assert_eq!(cli::load_config(None).unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn ini_overrides_apply() {
        let file = write_temp_ini("[analysis]\nwindow = 3\ndays_back = 4\n[levels]\ncount = 2\n");
        let path = file.path().to_path_buf();

        let config = cli::load_config(Some(&path)).unwrap();
        assert_eq!(config.window, 3);
        assert_eq!(config.days_back, 4);
        assert_eq!(config.forecast_days, 5);
        assert_eq!(config.thresholds.level_count, 2);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write_temp_ini("[risk]\nlow_ceiling = 0\n");
        let path = file.path().to_path_buf();

        let err = cli::load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigInvalid { .. }));
    }
}

mod source_resolution {
    use super::*;

    #[test]
    fn data_dir_kind_follows_file_extensions() {
        let csv_dir = TempDir::new().unwrap();
        fs::write(csv_dir.path().join("BHP.csv"), "date,open,high,low,close,volume\n").unwrap();
        let json_dir = TempDir::new().unwrap();
        fs::write(json_dir.path().join("BHP.json"), "[]").unwrap();

        assert_eq!(
            cli::resolve_source(None, Some(csv_dir.path().to_path_buf()), false, None),
            DataSource::CsvDir(csv_dir.path().to_path_buf())
        );
        assert_eq!(
            cli::resolve_source(None, Some(json_dir.path().to_path_buf()), false, None),
            DataSource::JsonDir(json_dir.path().to_path_buf())
        );
    }

    #[test]
    fn simulate_flag_wins_over_data_dir() {
        let source = cli::resolve_source(None, Some("data".into()), true, Some(11));
        assert_eq!(source, DataSource::Simulated { seed: 11 });
    }
}

mod commands {
    use super::*;

    #[test]
    fn simulate_writes_enveloped_series() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("aapl.json");

        run_args(&[
            "simulate",
            "--symbol",
            "aapl",
            "--days",
            "12",
            "--seed",
            "7",
            "--output",
            out.to_str().unwrap(),
        ]);

        let raw = fs::read_to_string(&out).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["period_days"], 12);

        let series = parse_series(&raw).unwrap();
        assert_eq!(series.symbol(), Some("AAPL"));
        assert_eq!(series.len(), 12);
    }

    #[test]
    fn simulate_is_reproducible_for_a_seed() {
        let a = cli::simulate_series("MSFT", 20, 99).unwrap();
        let b = cli::simulate_series("MSFT", 20, 99).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn transform_json_renders_one_result() {
        let raw = ramp_envelope("RAMP");
        let config = AnalysisConfig::default();
        let transform = TransformArg::Forecast.resolve(&config, None, Some(3), None);
        assert_eq!(transform, Transform::Forecast { forecast_days: 3 });

        let json = cli::transform_json(&raw, transform, &config).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["forecast"], serde_json::json!([110.0, 111.0, 112.0]));
    }

    #[test]
    fn transform_json_reports_invalid_input_as_failed() {
        let json =
            cli::transform_json("[]", Transform::Risk, &AnalysisConfig::default()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["kind"], "insufficient_data");
    }

    #[test]
    fn analyze_input_file_writes_report() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("ramp.json");
        let out = dir.path().join("report.txt");
        fs::write(&input, ramp_envelope("ramp")).unwrap();

        run_args(&[
            "analyze",
            "--symbol",
            "ignored",
            "--input",
            input.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ]);

        let report = fs::read_to_string(&out).unwrap();
        assert!(report.contains("Symbol: RAMP"));
        assert!(report.contains("TREND: BULLISH."));
        assert!(report.contains("DISCLAIMER:"));
    }

    #[test]
    fn analyze_csv_dir_uses_symbol_file() {
        let dir = TempDir::new().unwrap();
        let mut csv = String::from("date,open,high,low,close,volume\n");
        for (i, close) in ten_day_ramp().iter().enumerate() {
            csv.push_str(&format!(
                "2024-02-{:02},{close},{},{},{close},1000\n",
                i + 1,
                close + 1.0,
                close - 1.0
            ));
        }
        fs::write(dir.path().join("BHP.csv"), csv).unwrap();
        let out = dir.path().join("bhp.txt");

        run_args(&[
            "analyze",
            "--symbol",
            "bhp",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ]);

        let report = fs::read_to_string(&out).unwrap();
        assert!(report.contains("Symbol: BHP"));
        assert!(report.contains("LEVELS: floor $99.00, ceiling $110.00"));
    }

    #[test]
    fn analyze_simulated_json_lists_all_results() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("results.json");

        run_args(&[
            "analyze",
            "--symbol",
            "demo",
            "--simulate",
            "--seed",
            "3",
            "--json",
            "--output",
            out.to_str().unwrap(),
        ]);

        let value: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        let results = value.as_array().unwrap();
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r["status"] == "success"));
    }

    #[test]
    fn list_symbols_prints_data_dir_stems() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("RIO.json"), ramp_envelope("RIO")).unwrap();
        fs::write(dir.path().join("BHP.json"), ramp_envelope("BHP")).unwrap();
        let out_dir = TempDir::new().unwrap();
        let out = out_dir.path().join("symbols.txt");

        run_args(&[
            "list-symbols",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ]);

        assert_eq!(fs::read_to_string(&out).unwrap(), "BHP\nRIO");
    }

    #[test]
    fn list_symbols_reads_csv_dirs_and_reports_missing_ones() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CBA.csv"), "date,open,high,low,close,volume\n").unwrap();

        assert_eq!(cli::list_symbols(dir.path().to_path_buf()).unwrap(), vec!["CBA"]);

        let err = cli::list_symbols(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }

    #[test]
    fn bad_config_stops_before_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("never.txt");
        let ini = write_temp_ini("[analysis]\nwindow = 0\n");

        run_args(&[
            "analyze",
            "--symbol",
            "demo",
            "--simulate",
            "--config",
            ini.path().to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ]);

        assert!(!out.exists());
    }
}
