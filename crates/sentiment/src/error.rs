use thiserror::Error;

/// Reasons a document could not be scored.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// The link could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The link does not point at a PDF document.
    #[error("not a document link: {0}")]
    NotADocument(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} after {attempts} attempt(s)")]
    Http {
        /// Last status code received.
        status: u16,
        /// Number of requests made.
        attempts: u32,
    },

    /// The request could not be completed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The document produced no text.
    #[error("document has no extractable text")]
    EmptyText,

    /// HTTP client construction failed.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SentimentError {
    /// Creates an HTTP status error.
    #[must_use]
    pub fn http(status: u16, attempts: u32) -> Self {
        Self::Http { status, attempts }
    }
}

impl From<reqwest::Error> for SentimentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}
