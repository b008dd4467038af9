//! Turning raw documents into `InstitutionFacts`.
//!
//! Binary formats (PDF, DOCX) need parsers that live outside this crate; they surface as
//! `ExtractionError::ParserUnavailable` so callers can fall back to default facts.

mod document;
mod patterns;
mod translation;

pub use document::{join_blocks, read_text_blocks, DocumentFormat, TextBlock};
pub use patterns::PatternFactExtractor;
pub use translation::{clean_extracted_text, translate_block, PassthroughTranslator, Translator};

use super::domain::InstitutionFacts;

/// Capability converting canonical-language text into structured facts.
pub trait FactExtractor: Send + Sync {
    /// Never fails: anything that cannot be found takes its default value.
    fn extract_facts(&self, text: &str) -> InstitutionFacts;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported document type '{0}'")]
    UnsupportedFormat(String),
    #[error("{} text extraction requires an external parser", .0.label())]
    ParserUnavailable(DocumentFormat),
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV document: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("translation unavailable: {0}")]
    Translation(String),
}
