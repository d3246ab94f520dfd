use thiserror::Error;

/// The extraction service could not produce a completion.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("extraction service rate limited the request (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("extraction service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("extraction service returned no completion content")]
    EmptyCompletion,
}

/// A completion was returned but its text is not valid JSON.
#[derive(Debug, Error)]
#[error("malformed extraction response: {source}")]
pub struct MalformedResponse {
    #[from]
    source: serde_json::Error,
}
