use std::sync::LazyLock;

use regex::Regex;

use super::super::domain::{
    InstitutionCategory, InstitutionFacts, HEAD_NAME_NOT_FOUND, HEAD_TITLE_NOT_FOUND,
    UNKNOWN_INSTITUTION,
};
use super::FactExtractor;

macro_rules! fact_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// Tried in order; the first that matches names the institution. `|` separates CSV cells.
fact_pattern!(
    RE_NAME_OF_INSTITUTION,
    r"(?i)Name of (?:the )?(?:Institution|University)[ \t]*[:|\-]?[ \t]*(.+)"
);
fact_pattern!(RE_INSTITUTION_NAME, r"(?i)Institution Name[ \t]*[:|\-]?[ \t]*(.+)");
fact_pattern!(RE_NAME, r"(?i)\bName[ \t]*[:|\-]?[ \t]*(.+)");

fact_pattern!(
    RE_VICE_CHANCELLOR,
    r"(?i)(?:Vice[ \t-]*Chancellor|\bVC\b)[:| \t]+([A-Za-z \t\.]+)"
);
fact_pattern!(
    RE_PRINCIPAL,
    r"(?i)\b(?:Principal|Director)[:| \t]+([A-Za-z \t\.]+)"
);

fact_pattern!(
    RE_CORPUS_FUND,
    r"(?i)(?:Corpus|Fund).*?(?:₹|Rs\.?|INR)[ \t]*(\d[\d,]*)"
);
fact_pattern!(RE_STUDENTS, r"(?i)(?:Total|Enrolled)\s+Students.*?(\d+)");
fact_pattern!(RE_FACULTY, r"(?i)(?:Total|Regular)\s+Faculty.*?(\d+)");
fact_pattern!(RE_COMPUTERS, r"(?i)Total\s+(?:Computers|PCs).*?(\d+)");
fact_pattern!(RE_ADMIN_AREA, r"(?i)(?:Administrative|Admin)\s+Area.*?(\d+)");

const VICE_CHANCELLOR: &str = "Vice Chancellor";
const PRINCIPAL: &str = "Principal";

/// Regex-driven extractor for the labelled fields found in accreditation forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternFactExtractor;

impl PatternFactExtractor {
    fn name(text: &str) -> String {
        [&RE_NAME_OF_INSTITUTION, &RE_INSTITUTION_NAME, &RE_NAME]
            .into_iter()
            .filter_map(|pattern| capture(pattern, text))
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_INSTITUTION.to_string())
    }

    fn head(text: &str) -> (String, String) {
        if let Some(name) = capture(&RE_VICE_CHANCELLOR, text).filter(|name| !name.is_empty()) {
            return (VICE_CHANCELLOR.to_string(), name);
        }
        if let Some(name) = capture(&RE_PRINCIPAL, text).filter(|name| !name.is_empty()) {
            return (PRINCIPAL.to_string(), name);
        }
        (
            HEAD_TITLE_NOT_FOUND.to_string(),
            HEAD_NAME_NOT_FOUND.to_string(),
        )
    }

    fn count(pattern: &LazyLock<Option<Regex>>, text: &str) -> u64 {
        capture(pattern, text)
            .map(|raw| raw.replace(',', ""))
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0)
    }
}

impl FactExtractor for PatternFactExtractor {
    fn extract_facts(&self, text: &str) -> InstitutionFacts {
        let name = Self::name(text);
        let (head_title, head_name) = Self::head(text);

        InstitutionFacts {
            category: InstitutionCategory::from_name(&name),
            name,
            head_title,
            head_name,
            corpus_fund: Self::count(&RE_CORPUS_FUND, text),
            students: Self::count(&RE_STUDENTS, text),
            faculty: Self::count(&RE_FACULTY, text),
            computers: Self::count(&RE_COMPUTERS, text),
            admin_area: Self::count(&RE_ADMIN_AREA, text),
        }
    }
}

fn capture(pattern: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    pattern
        .as_ref()?
        .captures(text)?
        .get(1)
        .map(|matched| matched.as_str().trim().to_string())
}
