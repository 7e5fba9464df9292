use asterfee::FeeError;
use thiserror::Error;

/// Raw user input that cannot be turned into a clean number or selection.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("empty input")]
    Empty,

    #[error("not a number: {0}")]
    NotANumber(String),

    #[error("value must be finite: {0}")]
    NotFinite(String),

    #[error("volume must not be negative: {0}")]
    Negative(String),

    #[error("unrecognised token: {0}")]
    UnknownToken(String),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("fee schedule error: {0}")]
    Fee(#[from] FeeError),

    #[error("failed to read fee schedule {path}: {source}")]
    ScheduleRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stdin error: {0}")]
    Lines(#[from] tokio_util::codec::LinesCodecError),
}
