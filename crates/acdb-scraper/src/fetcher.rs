use acdb_core::AreaCode;
use async_trait::async_trait;

use crate::error::FetchError;

/// Resolves one area code to the raw markup of its lookup result.
///
/// Implementations own their transport retry policy; a returned error means
/// the page could not be obtained for this candidate.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, code: AreaCode) -> Result<String, FetchError>;
}
