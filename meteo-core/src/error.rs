use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between building a query and handing back a typed result.
#[derive(Debug, Error)]
pub enum MeteoError {
    /// The request could not be formed from the supplied options.
    #[error("invalid request options: {0}")]
    Config(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("failed to send request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request was cancelled before it completed")]
    Cancelled,

    /// The server answered with something other than `200 OK`.
    ///
    /// `body` holds the server's full payload, which usually names the offending parameter.
    #[error("request failed with status {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to decode response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{section} metric '{metric}' has {actual} values but there are {expected} timestamps")]
    SeriesLength {
        section: &'static str,
        metric: String,
        expected: usize,
        actual: usize,
    },

    #[error("unrecognised {section} timestamp '{value}'")]
    Timestamp { section: &'static str, value: String },
}

impl MeteoError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MeteoError::Cancelled)
    }

    /// HTTP status of a rejected request, if that is what this error is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            MeteoError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
