use async_trait::async_trait;

use crate::error::BackendError;

/// A text-completion backend: prompt in, raw model text out.
///
/// Implementations apply their own transport retry budget. An `Err` means the
/// call failed after that budget was spent.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError>;
}

#[async_trait]
impl<T: ExtractionService + ?Sized> ExtractionService for std::sync::Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        (**self).complete(prompt).await
    }
}
