//! Page fetching for the area-code lookup tool.

pub mod body;
pub mod client;
pub mod error;
pub mod fetcher;
mod rate_limit;

pub use body::extract_body;
pub use client::NanpaClient;
pub use error::FetchError;
pub use fetcher::PageFetcher;
