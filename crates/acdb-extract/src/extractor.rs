use acdb_core::{AreaCode, CodeRecord};

use crate::error::BackendError;
use crate::parse::parse_extraction_response;
use crate::prompt::build_prompt;
use crate::service::ExtractionService;

/// Reason recorded when every attempt returned text that was not JSON.
pub const UNPARSABLE_REASON: &str = "unparsable extraction response";

/// Turns raw lookup pages into [`CodeRecord`]s through an [`ExtractionService`].
///
/// A malformed (non-JSON) reply triggers a fresh service call, up to
/// `max_parse_attempts` calls in total. Fields are always read from a single
/// reply; nothing is merged across attempts.
pub struct RecordExtractor<S> {
    service: S,
    max_parse_attempts: u32,
}

impl<S: ExtractionService> RecordExtractor<S> {
    /// `max_parse_attempts` below 1 is treated as 1.
    #[must_use]
    pub fn new(service: S, max_parse_attempts: u32) -> Self {
        Self {
            service,
            max_parse_attempts: max_parse_attempts.max(1),
        }
    }

    #[must_use]
    pub fn max_parse_attempts(&self) -> u32 {
        self.max_parse_attempts
    }

    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Extracts the record for `code` from `page`.
    ///
    /// Malformed replies never escape: once the attempt budget is spent the
    /// result is an empty record with [`UNPARSABLE_REASON`].
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the service call itself fails.
    pub async fn extract(&self, code: AreaCode, page: &str) -> Result<CodeRecord, BackendError> {
        let prompt = build_prompt(code, page);

        for attempt in 1..=self.max_parse_attempts {
            let raw = self.service.complete(&prompt).await?;
            match parse_extraction_response(code, &raw) {
                Ok(record) => {
                    tracing::debug!(
                        code = %code,
                        attempt,
                        informative = record.is_informative(),
                        "extraction response parsed"
                    );
                    return Ok(record);
                }
                Err(e) => {
                    tracing::warn!(
                        code = %code,
                        attempt,
                        max_attempts = self.max_parse_attempts,
                        error = %e,
                        "malformed extraction response"
                    );
                }
            }
        }

        Ok(CodeRecord::empty(code, UNPARSABLE_REASON))
    }
}
