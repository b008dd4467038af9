use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

pub const UNKNOWN_INSTITUTION: &str = "Unknown Institution";
pub const HEAD_TITLE_NOT_FOUND: &str = "Not Found";
pub const HEAD_NAME_NOT_FOUND: &str = "N/A";

pub const CLASSROOM: &str = "Classroom";
pub const LIBRARY: &str = "Library";
pub const LABORATORY: &str = "Laboratory";
pub const COLLEGE_BUILDING: &str = "College Building";

/// Image categories always present in a report's visual detection map, in report order.
pub const CANONICAL_IMAGE_CATEGORIES: [&str; 4] = [CLASSROOM, LIBRARY, LABORATORY, COLLEGE_BUILDING];

/// Institution class selecting which policy rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstitutionCategory {
    University,
    Institute,
}

impl InstitutionCategory {
    pub const ALL: [InstitutionCategory; 2] = [Self::University, Self::Institute];

    /// Anything whose name mentions a university is scored as one; everything else is an institute.
    pub fn from_name(name: &str) -> Self {
        if name.to_uppercase().contains("UNIVERSITY") {
            Self::University
        } else {
            Self::Institute
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::University => "UNIVERSITY",
            Self::Institute => "INSTITUTE",
        }
    }
}

impl fmt::Display for InstitutionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InstitutionCategory {
    type Err = FactsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "UNIVERSITY" => Ok(Self::University),
            "INSTITUTE" => Ok(Self::Institute),
            _ => Err(FactsError::UnknownCategory(value.to_string())),
        }
    }
}

/// Errors raised while accepting facts from an untyped source.
#[derive(Debug, thiserror::Error)]
pub enum FactsError {
    #[error("unknown institution category '{0}' (expected UNIVERSITY or INSTITUTE)")]
    UnknownCategory(String),
    #[error("malformed facts: {field} must be a non-negative integer (found {value})")]
    MalformedFacts { field: &'static str, value: i64 },
    #[error("invalid facts document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Text-derived facts about an institution.
///
/// Numeric fields use 0 both for "reported as zero" and for "not found in the document";
/// scoring treats the two identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstitutionFacts {
    pub name: String,
    pub category: InstitutionCategory,
    pub head_title: String,
    pub head_name: String,
    pub corpus_fund: u64,
    pub students: u64,
    pub faculty: u64,
    pub computers: u64,
    pub admin_area: u64,
}

impl InstitutionFacts {
    /// Facts for a document nothing could be read from.
    pub fn unidentified() -> Self {
        Self {
            name: UNKNOWN_INSTITUTION.to_string(),
            category: InstitutionCategory::from_name(UNKNOWN_INSTITUTION),
            head_title: HEAD_TITLE_NOT_FOUND.to_string(),
            head_name: HEAD_NAME_NOT_FOUND.to_string(),
            corpus_fund: 0,
            students: 0,
            faculty: 0,
            computers: 0,
            admin_area: 0,
        }
    }

    /// Students per faculty member, undefined when no faculty were reported.
    pub fn student_faculty_ratio(&self) -> Option<f64> {
        if self.faculty == 0 {
            None
        } else {
            Some(self.students as f64 / self.faculty as f64)
        }
    }

    /// Parse a facts document produced by an external extractor.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, FactsError> {
        let record: FactsRecord = serde_json::from_reader(reader)?;
        Self::try_from(record)
    }
}

impl Default for InstitutionFacts {
    fn default() -> Self {
        Self::unidentified()
    }
}

/// Loosely typed facts as handed over by extractors that are not part of this crate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FactsRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub head_title: Option<String>,
    #[serde(default)]
    pub head_name: Option<String>,
    #[serde(default)]
    pub corpus_fund: i64,
    #[serde(default)]
    pub students: i64,
    #[serde(default)]
    pub faculty: i64,
    #[serde(default)]
    pub computers: i64,
    #[serde(default)]
    pub admin_area: i64,
}

fn non_negative(field: &'static str, value: i64) -> Result<u64, FactsError> {
    u64::try_from(value).map_err(|_| FactsError::MalformedFacts { field, value })
}

fn present(value: Option<String>, fallback: &str) -> String {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

impl TryFrom<FactsRecord> for InstitutionFacts {
    type Error = FactsError;

    fn try_from(record: FactsRecord) -> Result<Self, Self::Error> {
        let name = present(record.name, UNKNOWN_INSTITUTION);
        let category = match record.category.as_deref() {
            Some(label) => label.parse()?,
            None => InstitutionCategory::from_name(&name),
        };

        Ok(Self {
            category,
            head_title: present(record.head_title, HEAD_TITLE_NOT_FOUND),
            head_name: present(record.head_name, HEAD_NAME_NOT_FOUND),
            corpus_fund: non_negative("corpus_fund", record.corpus_fund)?,
            students: non_negative("students", record.students)?,
            faculty: non_negative("faculty", record.faculty)?,
            computers: non_negative("computers", record.computers)?,
            admin_area: non_negative("admin_area", record.admin_area)?,
            name,
        })
    }
}

/// A single labelled detection from the image oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFinding {
    #[serde(alias = "type")]
    pub category: String,
    /// Percentage in 0..=100.
    #[serde(deserialize_with = "deserialize_confidence")]
    pub confidence: f64,
}

impl ImageFinding {
    pub fn new(category: impl Into<String>, confidence: f64) -> Self {
        Self {
            category: category.into(),
            confidence: confidence.clamp(0.0, 100.0),
        }
    }
}

// Oracles report either a bare number or a formatted "92.50%" string.
fn deserialize_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawConfidence {
        Number(f64),
        Text(String),
    }

    let value = match RawConfidence::deserialize(deserializer)? {
        RawConfidence::Number(value) => value,
        RawConfidence::Text(raw) => raw
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(|err| serde::de::Error::custom(format!("invalid confidence '{raw}': {err}")))?,
    };

    if !(0.0..=100.0).contains(&value) {
        return Err(serde::de::Error::custom(format!(
            "confidence {value} outside 0-100"
        )));
    }

    Ok(value)
}

/// Ordered detections for one document. Duplicate categories are allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageFindings(Vec<ImageFinding>);

impl ImageFindings {
    pub fn new(findings: Vec<ImageFinding>) -> Self {
        Self(findings)
    }

    pub fn push(&mut self, finding: ImageFinding) {
        self.0.push(finding);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageFinding> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Distinct categories detected at least once.
    pub fn categories(&self) -> BTreeSet<&str> {
        self.0
            .iter()
            .map(|finding| finding.category.as_str())
            .collect()
    }

    /// Highest confidence recorded for the category, if it was detected at all.
    pub fn best_confidence(&self, category: &str) -> Option<f64> {
        self.0
            .iter()
            .filter(|finding| finding.category == category)
            .map(|finding| finding.confidence)
            .fold(None, |best, value| match best {
                Some(current) if current >= value => Some(current),
                _ => Some(value),
            })
    }
}

impl From<Vec<ImageFinding>> for ImageFindings {
    fn from(findings: Vec<ImageFinding>) -> Self {
        Self(findings)
    }
}

impl FromIterator<ImageFinding> for ImageFindings {
    fn from_iter<I: IntoIterator<Item = ImageFinding>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ImageFindings {
    type Item = &'a ImageFinding;
    type IntoIter = std::slice::Iter<'a, ImageFinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_parse_case_insensitively() {
        assert_eq!(
            " university ".parse::<InstitutionCategory>().expect("label parses"),
            InstitutionCategory::University
        );
        assert!(matches!(
            "COLLEGE".parse::<InstitutionCategory>(),
            Err(FactsError::UnknownCategory(label)) if label == "COLLEGE"
        ));
        assert_eq!(
            InstitutionCategory::from_name("Deccan Technical university"),
            InstitutionCategory::University
        );
    }

    #[test]
    fn blank_strings_take_defaults() {
        let record = FactsRecord {
            name: Some("  ".to_string()),
            head_name: Some("Dr. A. Khan".to_string()),
            faculty: 12,
            ..FactsRecord::default()
        };

        let facts = InstitutionFacts::try_from(record).expect("facts convert");

        assert_eq!(facts.name, UNKNOWN_INSTITUTION);
        assert_eq!(facts.category, InstitutionCategory::Institute);
        assert_eq!(facts.head_title, HEAD_TITLE_NOT_FOUND);
        assert_eq!(facts.head_name, "Dr. A. Khan");
        assert_eq!(facts.faculty, 12);
        assert_eq!(facts.student_faculty_ratio(), Some(0.0));
    }

    #[test]
    fn best_confidence_picks_highest_duplicate() {
        let findings: ImageFindings = [
            ImageFinding::new(LIBRARY, 71.5),
            ImageFinding::new(LIBRARY, 88.0),
            ImageFinding::new(CLASSROOM, 140.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(findings.best_confidence(LIBRARY), Some(88.0));
        assert_eq!(findings.best_confidence(CLASSROOM), Some(100.0));
        assert_eq!(findings.best_confidence(LABORATORY), None);
        assert_eq!(findings.categories().len(), 2);
    }
}
