use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeeError {
    #[error("tier table for {venue} is empty")]
    EmptyTierTable { venue: String },

    #[error(
        "tier table for {venue} is not strictly increasing: tier {index} threshold {current} \
         follows {previous}"
    )]
    NonMonotonicThresholds {
        venue: String,
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("tier table for {venue} has no zero-threshold base tier (lowest is {lowest})")]
    MissingBaseTier { venue: String, lowest: f64 },

    #[error("invalid volume threshold for {venue} tier {tier}: {value}")]
    InvalidThreshold {
        venue: String,
        tier: String,
        value: f64,
    },

    #[error("invalid {field} for {venue}: {value}")]
    InvalidRate {
        venue: String,
        field: &'static str,
        value: f64,
    },

    #[error("duplicate competitor: {0}")]
    DuplicateCompetitor(String),

    #[error("fee schedule has no competitors")]
    NoCompetitors,

    #[error("unknown trading mode: {0}")]
    UnknownTradingMode(String),

    #[error("unknown timeframe: {0}")]
    UnknownTimeframe(String),

    #[error("unknown baseline mode: {0}")]
    UnknownBaselineMode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FeeError {
    /// Whether the error comes from a malformed fee schedule (fatal at startup).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FeeError::EmptyTierTable { .. }
                | FeeError::NonMonotonicThresholds { .. }
                | FeeError::MissingBaseTier { .. }
                | FeeError::InvalidThreshold { .. }
                | FeeError::InvalidRate { .. }
                | FeeError::DuplicateCompetitor(_)
                | FeeError::NoCompetitors
        )
    }
}

pub type Result<T> = std::result::Result<T, FeeError>;
