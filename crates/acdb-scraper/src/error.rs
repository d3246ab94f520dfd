use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited while looking up {code} (retry after {retry_after_secs}s)")]
    RateLimited { code: String, retry_after_secs: u64 },

    #[error("lookup page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("lookup page for {code} had no content")]
    EmptyPage { code: String },

    #[error("invalid lookup URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
