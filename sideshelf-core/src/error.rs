//! Fetch error types surfaced by the manifest fetcher

use thiserror::Error;

/// Boxed transport error so stub transports do not need a reqwest error
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that end a single catalog load attempt
///
/// None of these are fatal to the process. The session converts them into an
/// [`ErrorAffordance`](crate::session::ErrorAffordance) with a retry bound to
/// the selection that failed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The request never produced a response (offline, DNS, TLS, reset)
    #[error("Network request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The body was not a manifest document
    #[error("Failed to parse manifest from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Both halves of the merged catalog failed
    #[error("Failed to load any source (standard: {standard}; nsfw: {nsfw})")]
    AllSourcesFailed {
        standard: Box<FetchError>,
        nsfw: Box<FetchError>,
    },
}

impl FetchError {
    pub fn network(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        FetchError::Network {
            url: url.into(),
            source: source.into(),
        }
    }

    /// HTTP status for `Status` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short machine-friendly kind, used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Status { .. } => "status",
            FetchError::Network { .. } => "network",
            FetchError::Decode { .. } => "decode",
            FetchError::AllSourcesFailed { .. } => "all_sources_failed",
        }
    }

    /// Log at the level matching how surprising the failure is
    pub fn log(&self) {
        match self {
            FetchError::Decode { .. } => tracing::error!(kind = self.kind(), "{}", self),
            _ => tracing::warn!(kind = self.kind(), "{}", self),
        }
    }
}
