use thiserror::Error;

/// Failure to retrieve one committee page. Never fatal for a run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// Rate limits and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            FetchError::Transport { source, .. } => source.is_timeout() || source.is_connect(),
        }
    }
}

/// Page text whose structure doesn't match the committee page layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("expected exactly one \"Members\" marker, found {found}")]
    MembersMarker { found: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("delimiter must be a single character, got {0:?}")]
    Delimiter(String),
    #[error("unknown committee type {0:?}")]
    CommitteeType(String),
}
