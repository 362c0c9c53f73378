//! Domain error types.

use serde::Serialize;

/// Top-level error type for stockpredictor.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("insufficient data: have {have} points, need {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("formatting fault: {reason}")]
    FormattingFault { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse error family, carried in serialized `failed` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedInput,
    InsufficientData,
    DegenerateInput,
    InvalidParameter,
    FormattingFault,
    Config,
    NoData,
    Io,
}

impl AnalysisError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        AnalysisError::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::MalformedInput { .. } => ErrorKind::MalformedInput,
            AnalysisError::InsufficientData { .. } => ErrorKind::InsufficientData,
            AnalysisError::DegenerateInput { .. } => ErrorKind::DegenerateInput,
            AnalysisError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            AnalysisError::FormattingFault { .. } => ErrorKind::FormattingFault,
            AnalysisError::ConfigParse { .. } | AnalysisError::ConfigInvalid { .. } => {
                ErrorKind::Config
            }
            AnalysisError::NoData { .. } => ErrorKind::NoData,
            AnalysisError::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<std::fmt::Error> for AnalysisError {
    fn from(err: std::fmt::Error) -> Self {
        AnalysisError::FormattingFault {
            reason: err.to_string(),
        }
    }
}

impl From<&AnalysisError> for std::process::ExitCode {
    fn from(err: &AnalysisError) -> Self {
        let code: u8 = match err.kind() {
            ErrorKind::Io => 1,
            ErrorKind::Config => 2,
            ErrorKind::FormattingFault => 3,
            ErrorKind::MalformedInput | ErrorKind::InvalidParameter => 4,
            ErrorKind::NoData | ErrorKind::InsufficientData | ErrorKind::DegenerateInput => 5,
        };
        std::process::ExitCode::from(code)
    }
}
