use thiserror::Error;

use crate::domain::status::DealStatus;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised before any network activity, by input validation.
#[derive(Error, Debug, Clone)]
pub enum InputError {
    /// Only directory-class sources can be preserved as storage deals.
    #[error("unsupported source kind: {kind} (only directory sources are supported)")]
    UnsupportedSource { kind: &'static str },

    /// The content identifier from a prior pipeline stage is missing.
    #[error("no content identifier published under label '{stage}'")]
    MissingLabel { stage: String },

    /// The node reported no miners to propose a deal to.
    #[error("no miners available on the network")]
    NoMiners,
}

/// Terminal outcomes of a tracking session other than success.
///
/// `Rejected` means the network reached a permanently failed state for the
/// deal; `Cancelled` and `TimedOut` mean the caller gave up. Callers can
/// match on the variant to tell the two apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackingError {
    #[error("deal failed with state: {status}")]
    Rejected { status: DealStatus },

    #[error("deal tracking cancelled")]
    Cancelled,

    #[error("deal tracking deadline exceeded")]
    TimedOut,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Tracking(#[from] TrackingError),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("CID parse error: {0}")]
    Cid(#[from] cid::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}

impl Error {
    /// True when the error is the caller-initiated end of a tracking
    /// session rather than a network rejection.
    pub fn is_abandoned(&self) -> bool {
        matches!(
            self,
            Error::Tracking(TrackingError::Cancelled) | Error::Tracking(TrackingError::TimedOut)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_error_names_terminal_status() {
        let err = Error::from(TrackingError::Rejected {
            status: DealStatus::ProposalRejected,
        });
        assert_eq!(err.to_string(), "deal failed with state: ProposalRejected");
        assert!(!err.is_abandoned());
    }

    #[test]
    fn cancelled_and_timed_out_are_abandonment() {
        assert!(Error::from(TrackingError::Cancelled).is_abandoned());
        assert!(Error::from(TrackingError::TimedOut).is_abandoned());
    }
}
