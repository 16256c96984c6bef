use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeeError {
    /// A fetch failed or came back empty where data was required.
    #[error("{what} unavailable: {reason}")]
    DataUnavailable { what: String, reason: String },
    /// A mean was requested over zero records or zero total weight.
    #[error("cannot average {what}: no data")]
    EmptyAggregateInput { what: String },
    #[error("invalid {field} {value}: {reason}")]
    InvalidThresholdConfig {
        field: &'static str,
        value: f64,
        reason: String,
    },
    #[error("failed to persist settings: {0}")]
    Persistence(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FeeError {
    pub fn unavailable(what: impl Into<String>, reason: impl ToString) -> Self {
        FeeError::DataUnavailable {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FeeError>;
