use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::ExtractionError;

static CID_ARTIFACT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\(cid:\d+\)").ok());

/// Machine translation into the language the fact patterns are written for.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> Result<String, ExtractionError>;
}

/// Used when no translation service is configured; text is assumed to be English already.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate(&self, text: &str) -> Result<String, ExtractionError> {
        Ok(text.to_string())
    }
}

/// Replace PDF `(cid:N)` glyph placeholders with spaces.
pub fn clean_extracted_text(text: &str) -> String {
    match CID_ARTIFACT.as_ref() {
        Some(pattern) => pattern.replace_all(text, " ").into_owned(),
        None => text.to_string(),
    }
}

/// Clean and translate one block, keeping the cleaned source text if translation fails.
pub fn translate_block<T: Translator + ?Sized>(translator: &T, text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let cleaned = clean_extracted_text(text);
    match translator.translate(&cleaned) {
        Ok(translated) => translated,
        Err(err) => {
            warn!(%err, "translation failed; keeping source text");
            cleaned
        }
    }
}
