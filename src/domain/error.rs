//! Domain error types.

use chrono::NaiveDate;

/// A parse error with position information for rule parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    ///
    /// `position` is a byte offset; the caret column counts characters.
    pub fn display_with_context(&self, input: &str) -> String {
        let col = input
            .get(..self.position)
            .map(|s| s.chars().count())
            .unwrap_or(self.position);
        let caret = " ".repeat(col) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for fuzzysignal.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Malformed fuzzy system definition. Raised while building, never per bar.
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    #[error("invalid input for {variable}: {value} has no membership in any term")]
    InvalidInput { variable: String, value: f64 },

    #[error("no crisp input supplied for {variable}")]
    MissingInput { variable: String },

    #[error("bar {index} ({date}): {reason}")]
    InvalidBar {
        index: usize,
        date: NaiveDate,
        reason: String,
    },

    #[error("series length mismatch: {bars} bars but {rsi} rsi values")]
    SeriesMismatch { bars: usize, rsi: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },


    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("insufficient data for {code}: have {bars} bars, need {minimum}")]
    InsufficientData {
        code: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        SignalError::Configuration {
            reason: reason.into(),
        }
    }
}

impl From<&SignalError> for std::process::ExitCode {
    fn from(err: &SignalError) -> Self {
        let code: u8 = match err {
            SignalError::Io(_) => 1,
            SignalError::ConfigParse { .. }
            | SignalError::ConfigMissing { .. }
            | SignalError::ConfigInvalid { .. } => 2,
            SignalError::Configuration { .. } => 3,
            SignalError::InvalidInput { .. }
            | SignalError::MissingInput { .. }
            | SignalError::InvalidBar { .. }
            | SignalError::SeriesMismatch { .. } => 4,
            SignalError::Data { .. }
            | SignalError::NoData { .. }
            | SignalError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
