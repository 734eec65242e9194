//! Error taxonomy for provider calls.
//!
//! Providers return typed errors so the retry layer can tell transient
//! network failures (retried) apart from semantic failures like an empty
//! completion or a rejected prompt (not retried, surfaced as fallback text).

/// An error raised by a provider call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The provider answered with a non-success HTTP status.
    #[error("provider returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        message: String,
    },

    /// The provider answered, but the response carried no content.
    #[error("provider response contained no content")]
    Empty,

    /// The operation is not available on this provider.
    #[error("{0} is not supported by this provider")]
    Unsupported(&'static str),

    /// A response body failed to deserialize as the expected shape.
    #[error("malformed provider payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The in-process engine reported a failure.
    #[error("engine failure: {0}")]
    Engine(String),

    /// Transport-level failure from the HTTP client.
    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Whether retrying the same call could plausibly succeed.
    ///
    /// Rate limiting and server-side errors are transient; a rejected or
    /// empty completion would be rejected again.
    pub fn transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Engine(_) => true,
            #[cfg(feature = "http")]
            Self::Http(_) => true,
            Self::Empty | Self::Unsupported(_) | Self::Decode(_) => false,
        }
    }
}

/// Result alias for provider calls.
pub type Result<T, E = Error> = std::result::Result<T, E>;
