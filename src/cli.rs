//! CLI definition and dispatch.
//!
//! The binary is a thin driver: it picks a data source, runs the analysis
//! transforms through [`Engine`], and prints JSON or the text report to
//! stdout. Progress and errors go through `tracing` to stderr.

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_adapter::JsonAdapter;
use crate::adapters::simulated_adapter::SimulatedAdapter;
use crate::domain::analysis::{AnalysisResult, Engine, Transform};
use crate::domain::config::{build_analysis_config, AnalysisConfig};
use crate::domain::error::AnalysisError;
use crate::domain::report;
use crate::domain::series::{parse_series, Series};
use crate::ports::data_port::DataPort;

pub const DEFAULT_DAYS: usize = 30;

#[derive(Parser, Debug)]
#[command(name = "stockpredictor", about = "Daily price series analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a simulated price series in the interchange format
    Simulate {
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long, default_value_t = DEFAULT_DAYS)]
        days: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a single transform over a series file and print it as JSON
    Run {
        #[arg(value_enum)]
        transform: TransformArg,
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        window: Option<usize>,
        #[arg(long)]
        forecast_days: Option<usize>,
        #[arg(long)]
        days_back: Option<usize>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run every transform for a symbol and print the report
    Analyze {
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long, conflicts_with_all = ["data_dir", "simulate"])]
        input: Option<PathBuf>,
        #[arg(long, conflicts_with = "simulate")]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        simulate: bool,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long, default_value_t = DEFAULT_DAYS)]
        days: usize,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the structured results instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// List the symbols available in a data directory
    ListSymbols {
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformArg {
    Trend,
    Risk,
    Forecast,
    Levels,
    Movement,
}

impl TransformArg {
    /// Resolve to a transform, with explicit flags taking precedence over config.
    pub fn resolve(
        self,
        config: &AnalysisConfig,
        window: Option<usize>,
        forecast_days: Option<usize>,
        days_back: Option<usize>,
    ) -> Transform {
        match self {
            TransformArg::Trend => Transform::Trend {
                window: window.unwrap_or(config.window),
            },
            TransformArg::Risk => Transform::Risk,
            TransformArg::Forecast => Transform::Forecast {
                forecast_days: forecast_days.unwrap_or(config.forecast_days),
            },
            TransformArg::Levels => Transform::Levels,
            TransformArg::Movement => Transform::Movement {
                days_back: days_back.unwrap_or(config.days_back),
            },
        }
    }
}

/// Where `analyze` reads its series from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    CsvDir(PathBuf),
    JsonDir(PathBuf),
    Simulated { seed: u64 },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            symbol,
            days,
            seed,
            output,
        } => run_simulate(&symbol, days, seed, output.as_ref()),
        Command::Run {
            transform,
            input,
            window,
            forecast_days,
            days_back,
            config,
        } => run_transform(
            transform,
            &input,
            config.as_ref(),
            window,
            forecast_days,
            days_back,
        ),
        Command::Analyze {
            symbol,
            input,
            data_dir,
            simulate,
            seed,
            days,
            config,
            output,
            json,
        } => {
            let source = resolve_source(input, data_dir, simulate, seed);
            run_analyze(&symbol, source, days, config.as_ref(), output.as_ref(), json)
        }
        Command::ListSymbols { data_dir, output } => run_list_symbols(data_dir, output.as_ref()),
    }
}

fn fail(err: &AnalysisError) -> ExitCode {
    error!("{err}");
    ExitCode::from(err)
}

pub fn load_config(path: Option<&PathBuf>) -> Result<AnalysisConfig, AnalysisError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            let adapter = FileConfigAdapter::from_file(path)?;
            build_analysis_config(&adapter)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

pub fn resolve_source(
    input: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    simulate: bool,
    seed: Option<u64>,
) -> DataSource {
    if let Some(path) = input {
        return DataSource::File(path);
    }
    match data_dir {
        Some(dir) if !simulate => {
            if has_extension(&dir, "csv") {
                DataSource::CsvDir(dir)
            } else {
                DataSource::JsonDir(dir)
            }
        }
        _ => DataSource::Simulated {
            seed: seed.unwrap_or_else(entropy_seed),
        },
    }
}

fn has_extension(dir: &Path, ext: &str) -> bool {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| e.path().extension().is_some_and(|x| x == ext))
        })
        .unwrap_or(false)
}

fn entropy_seed() -> u64 {
    rand::random()
}

fn write_or_print(text: &str, output: Option<&PathBuf>) -> Result<(), AnalysisError> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Serialize a simulated series as an enveloped interchange document.
pub fn simulate_series(symbol: &str, days: usize, seed: u64) -> Result<String, AnalysisError> {
    let series = SimulatedAdapter::new(seed).fetch_series(symbol, days)?;
    serde_json::to_string_pretty(&series.to_envelope()).map_err(|e| {
        AnalysisError::FormattingFault {
            reason: e.to_string(),
        }
    })
}

fn run_simulate(symbol: &str, days: usize, seed: Option<u64>, output: Option<&PathBuf>) -> ExitCode {
    let seed = seed.unwrap_or_else(entropy_seed);
    info!(symbol, days, seed, "generating simulated series");
    match simulate_series(symbol, days, seed).and_then(|json| write_or_print(&json, output)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

/// Run one transform over raw interchange JSON and render it as pretty JSON.
///
/// Validation and transform failures come back as a `failed` document, not
/// an error.
pub fn transform_json(
    raw: &str,
    transform: Transform,
    config: &AnalysisConfig,
) -> Result<String, AnalysisError> {
    let engine = Engine::new(config.thresholds.clone());
    let result = engine.run_raw(raw, transform);
    to_pretty_json(&result)
}

fn to_pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, AnalysisError> {
    serde_json::to_string_pretty(value).map_err(|e| AnalysisError::FormattingFault {
        reason: e.to_string(),
    })
}

fn run_transform(
    transform: TransformArg,
    input: &PathBuf,
    config_path: Option<&PathBuf>,
    window: Option<usize>,
    forecast_days: Option<usize>,
    days_back: Option<usize>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    info!(input = %input.display(), "reading series");
    let raw = match fs::read_to_string(input) {
        Ok(r) => r,
        Err(e) => return fail(&AnalysisError::from(e)),
    };

    let transform = transform.resolve(&config, window, forecast_days, days_back);
    match transform_json(&raw, transform, &config) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Join each result's summary into the report body.
pub fn report_body(results: &[AnalysisResult]) -> String {
    results
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fetch, analyze, and render one symbol.
///
/// With `json` set the output is the array of structured results;
/// otherwise it is the assembled text report.
pub fn analyze_symbol(
    data_port: &dyn DataPort,
    symbol: &str,
    days: usize,
    config: &AnalysisConfig,
    json: bool,
    generated_at: NaiveDateTime,
) -> Result<String, AnalysisError> {
    let series = data_port.fetch_series(symbol, days)?;
    info!(symbol, points = series.len(), "series loaded");

    let engine = Engine::new(config.thresholds.clone());
    let results = engine.run_all(&series, &config.transforms());
    let failed = results.iter().filter(|r| !r.is_success()).count();
    info!(symbol, transforms = results.len(), failed, "analysis complete");

    if json {
        return to_pretty_json(&results);
    }
    let label = series.symbol().unwrap_or(symbol);
    report::assemble(label, &report_body(&results), generated_at)
}

/// Load a single interchange file, keeping only the most recent `days`.
fn load_file(path: &PathBuf, symbol: &str, days: usize) -> Result<Series, AnalysisError> {
    let raw = fs::read_to_string(path)?;
    parse_series(&raw)?
        .with_default_symbol(symbol)
        .truncated(days)
}

struct FileSource {
    path: PathBuf,
}

impl DataPort for FileSource {
    fn fetch_series(&self, symbol: &str, days: usize) -> Result<Series, AnalysisError> {
        load_file(&self.path, symbol, days)
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalysisError> {
        Ok(Vec::new())
    }
}

fn data_port_for(source: DataSource) -> Box<dyn DataPort> {
    match source {
        DataSource::File(path) => Box::new(FileSource { path }),
        DataSource::CsvDir(dir) => Box::new(CsvAdapter::new(dir)),
        DataSource::JsonDir(dir) => Box::new(JsonAdapter::new(dir)),
        DataSource::Simulated { seed } => Box::new(SimulatedAdapter::new(seed)),
    }
}

fn run_analyze(
    symbol: &str,
    source: DataSource,
    days: usize,
    config_path: Option<&PathBuf>,
    output: Option<&PathBuf>,
    json: bool,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    info!(symbol, source = ?source, days, "analyzing");
    let data_port = data_port_for(source);
    let generated_at = Local::now().naive_local();

    match analyze_symbol(data_port.as_ref(), symbol, days, &config, json, generated_at)
        .and_then(|text| write_or_print(&text, output))
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

/// Symbols held in `dir`, read as CSV or JSON files by extension.
pub fn list_symbols(dir: PathBuf) -> Result<Vec<String>, AnalysisError> {
    data_port_for(resolve_source(None, Some(dir), false, None)).list_symbols()
}

fn run_list_symbols(dir: PathBuf, output: Option<&PathBuf>) -> ExitCode {
    info!(dir = %dir.display(), "listing symbols");
    match list_symbols(dir).and_then(|symbols| write_or_print(&symbols.join("\n"), output)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_run_command() {
        let cli = Cli::try_parse_from([
            "stockpredictor",
            "run",
            "trend",
            "--input",
            "prices.json",
            "--window",
            "3",
        ])
        .unwrap();
        match cli.command {
            Command::Run {
                transform, window, ..
            } => {
                assert_eq!(transform, TransformArg::Trend);
                assert_eq!(window, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_conflicting_sources() {
        let result = Cli::try_parse_from([
            "stockpredictor",
            "analyze",
            "--symbol",
            "AAPL",
            "--input",
            "a.json",
            "--simulate",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_config() {
        let config = AnalysisConfig {
            window: 10,
            ..AnalysisConfig::default()
        };
        assert_eq!(
            TransformArg::Trend.resolve(&config, None, None, None),
            Transform::Trend { window: 10 }
        );
        assert_eq!(
            TransformArg::Trend.resolve(&config, Some(4), None, None),
            Transform::Trend { window: 4 }
        );
        assert_eq!(
            TransformArg::Movement.resolve(&config, None, None, Some(2)),
            Transform::Movement { days_back: 2 }
        );
    }

    #[test]
    fn source_defaults_to_simulation() {
        assert_eq!(
            resolve_source(None, None, false, Some(3)),
            DataSource::Simulated { seed: 3 }
        );
        assert_eq!(
            resolve_source(Some("x.json".into()), None, false, None),
            DataSource::File("x.json".into())
        );
    }

    #[test]
    fn missing_config_file_is_a_config_error() {
        let path = PathBuf::from("/nonexistent/stockpredictor.ini");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigParse { .. }));
    }
}
