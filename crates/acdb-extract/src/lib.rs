//! Structured record extraction from lookup pages via a language-model service.

pub mod error;
pub mod extractor;
pub mod openai;
pub mod parse;
pub mod prompt;
mod retry;
pub mod service;

pub use error::{BackendError, MalformedResponse};
pub use extractor::{RecordExtractor, UNPARSABLE_REASON};
pub use openai::OpenAiClient;
pub use parse::parse_extraction_response;
pub use prompt::build_prompt;
pub use service::ExtractionService;
