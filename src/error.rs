use thiserror::Error;

/// Errors that can occur in the Compass library.
///
/// The scoring and projection engines themselves are infallible; these
/// variants come from the boundaries around them (text input, presets,
/// price sources, configuration).
#[derive(Error, Debug)]
pub enum CompassError {
    /// A scenario name did not match any preset.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// A fee model name was not recognized.
    #[error("unknown fee model: {0}")]
    UnknownFeeModel(String),

    /// Numeric text could not be parsed.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// A questionnaire answer token was not recognized.
    #[error("invalid answer: {0:?}")]
    InvalidAnswer(String),

    /// A cached price history was malformed.
    #[error("invalid price history: {0}")]
    InvalidHistory(String),

    /// No usable live price could be obtained.
    #[error("live price unavailable: {0}")]
    PriceUnavailable(String),

    /// Reading a cached response failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A cached response was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("telemetry error: {0}")]
    Telemetry(#[from] crate::telemetry::TelemetryError),
}
