use thiserror::Error;

/// Engine error types.
///
/// Data-quality problems (short history, undefined indicators, zero
/// denominators) are not errors: they degrade to NO_DATA or HOLD signals.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid bar series: {0}")]
    InvalidSeries(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
