use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::domain::{
    ImageFindings, InstitutionCategory, InstitutionFacts, CLASSROOM, COLLEGE_BUILDING, LABORATORY,
    LIBRARY,
};
use super::evaluation::{round2, RedFlags, ScoreBreakdown};

pub const MISSING: &str = "missing";
pub const NO_ISSUES_REASON: &str = "No issues found";
pub const DEFAULT_REJECT_BELOW: f64 = 50.0;

/// Rule turning scores and flags into a status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionPolicy {
    /// Any red flag rejects, whatever the total.
    #[default]
    Strict,
    /// Totals below `reject_below` reject; flagged documents above it go to manual review.
    ScoreThreshold { reject_below: f64 },
}

impl DecisionPolicy {
    pub fn decide(&self, total: f64, red_flags: &RedFlags) -> DecisionStatus {
        match self {
            Self::Strict => {
                if red_flags.is_empty() {
                    DecisionStatus::Approved
                } else {
                    DecisionStatus::Rejected
                }
            }
            Self::ScoreThreshold { reject_below } => {
                if total < *reject_below {
                    DecisionStatus::Rejected
                } else if !red_flags.is_empty() {
                    DecisionStatus::ManualReview
                } else {
                    DecisionStatus::Approved
                }
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::ScoreThreshold { .. } => "threshold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionStatus {
    Approved,
    Rejected,
    #[serde(rename = "Manual Review")]
    ManualReview,
}

impl DecisionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::ManualReview => "Manual Review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalDecision {
    pub status: DecisionStatus,
    pub reasons: Vec<String>,
}

/// Student:faculty ratio as reported; `"missing"` when there is no faculty to divide by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FacultyRatio {
    Value(f64),
    Missing,
}

impl FacultyRatio {
    pub fn from_facts(facts: &InstitutionFacts) -> Self {
        match facts.student_faculty_ratio() {
            Some(ratio) => Self::Value(round2(ratio)),
            None => Self::Missing,
        }
    }
}

impl Serialize for FacultyRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(ratio) => serializer.serialize_f64(*ratio),
            Self::Missing => serializer.serialize_str(MISSING),
        }
    }
}

impl<'de> Deserialize<'de> for FacultyRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawRatio {
            Number(f64),
            Text(String),
        }

        match RawRatio::deserialize(deserializer)? {
            RawRatio::Number(ratio) => Ok(Self::Value(ratio)),
            RawRatio::Text(text) if text == MISSING => Ok(Self::Missing),
            RawRatio::Text(text) => Err(serde::de::Error::custom(format!(
                "expected a ratio or \"{MISSING}\", found \"{text}\""
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionDetails {
    pub name: String,
    pub category: InstitutionCategory,
    pub head_title: String,
    pub head_name: String,
    pub corpus_fund: u64,
    pub students: u64,
    pub faculty: u64,
    pub faculty_ratio: FacultyRatio,
    pub admin_area: u64,
    pub computers: u64,
}

impl InstitutionDetails {
    fn from_facts(facts: &InstitutionFacts) -> Self {
        Self {
            name: facts.name.clone(),
            category: facts.category,
            head_title: facts.head_title.clone(),
            head_name: facts.head_name.clone(),
            corpus_fund: facts.corpus_fund,
            students: facts.students,
            faculty: facts.faculty,
            faculty_ratio: FacultyRatio::from_facts(facts),
            admin_area: facts.admin_area,
            computers: facts.computers,
        }
    }
}

/// Fixed-shape detection map: every canonical category is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualDetection {
    #[serde(rename = "Classroom")]
    pub classroom: String,
    #[serde(rename = "Library")]
    pub library: String,
    #[serde(rename = "Laboratory")]
    pub laboratory: String,
    #[serde(rename = "College Building")]
    pub college_building: String,
}

impl VisualDetection {
    pub fn from_findings(findings: &ImageFindings) -> Self {
        let entry = |category: &str| {
            findings
                .best_confidence(category)
                .map(|confidence| format!("{confidence:.2}%"))
                .unwrap_or_else(|| MISSING.to_string())
        };

        Self {
            classroom: entry(CLASSROOM),
            library: entry(LIBRARY),
            laboratory: entry(LABORATORY),
            college_building: entry(COLLEGE_BUILDING),
        }
    }

    /// Entries in canonical report order.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (CLASSROOM, self.classroom.as_str()),
            (LIBRARY, self.library.as_str()),
            (LABORATORY, self.laboratory.as_str()),
            (COLLEGE_BUILDING, self.college_building.as_str()),
        ]
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.entries()
            .into_iter()
            .find(|(label, _)| *label == category)
            .map(|(_, value)| value)
    }
}

/// The single JSON artifact emitted per document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub institution_details: InstitutionDetails,
    pub visual_detection: VisualDetection,
    pub scores: ScoreBreakdown,
    pub final_decision: FinalDecision,
}

impl ComplianceReport {
    pub fn status(&self) -> DecisionStatus {
        self.final_decision.status
    }

    pub fn is_approved(&self) -> bool {
        self.final_decision.status == DecisionStatus::Approved
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Assembles reports under a fixed decision policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VerdictBuilder {
    policy: DecisionPolicy,
}

impl VerdictBuilder {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DecisionPolicy {
        self.policy
    }

    pub fn build(
        &self,
        facts: &InstitutionFacts,
        findings: &ImageFindings,
        breakdown: &ScoreBreakdown,
        red_flags: &RedFlags,
    ) -> ComplianceReport {
        // Decide on the reported total so the artifact never contradicts itself.
        let scores = breakdown.rounded();
        let status = self.policy.decide(scores.total, red_flags);
        let reasons = if red_flags.is_empty() {
            vec![NO_ISSUES_REASON.to_string()]
        } else {
            red_flags.messages()
        };

        ComplianceReport {
            institution_details: InstitutionDetails::from_facts(facts),
            visual_detection: VisualDetection::from_findings(findings),
            scores,
            final_decision: FinalDecision { status, reasons },
        }
    }
}
