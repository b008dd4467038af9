mod rules;

pub(crate) use rules::round2;

use std::fmt;

use super::domain::{ImageFindings, InstitutionFacts};
use super::policy::PolicyRule;
use serde::{Deserialize, Serialize};

/// Scoring sections, in the order their red flags are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSection {
    Financial,
    Faculty,
    Infrastructure,
    Visual,
}

impl ScoreSection {
    pub const ALL: [ScoreSection; 4] = [
        Self::Financial,
        Self::Faculty,
        Self::Infrastructure,
        Self::Visual,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Financial => "Financial",
            Self::Faculty => "Faculty",
            Self::Infrastructure => "Infrastructure",
            Self::Visual => "Visuals",
        }
    }
}

/// One deficiency found while scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlag {
    pub section: ScoreSection,
    pub message: String,
}

impl fmt::Display for RedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered deficiencies; empty means nothing blocks approval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedFlags(Vec<RedFlag>);

impl RedFlags {
    pub fn push(&mut self, section: ScoreSection, message: impl Into<String>) {
        self.0.push(RedFlag {
            section,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RedFlag> {
        self.0.iter()
    }

    pub fn in_section(&self, section: ScoreSection) -> impl Iterator<Item = &RedFlag> {
        self.0.iter().filter(move |flag| flag.section == section)
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|flag| flag.message.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a RedFlags {
    type Item = &'a RedFlag;
    type IntoIter = std::slice::Iter<'a, RedFlag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Section scores (each 0..=100) and their weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub financial: f64,
    pub faculty: f64,
    pub infra: f64,
    pub visual: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    pub fn section(&self, section: ScoreSection) -> f64 {
        match section {
            ScoreSection::Financial => self.financial,
            ScoreSection::Faculty => self.faculty,
            ScoreSection::Infrastructure => self.infra,
            ScoreSection::Visual => self.visual,
        }
    }

    /// Copy with every value rounded to two decimals, as reported.
    pub fn rounded(&self) -> Self {
        Self {
            financial: round2(self.financial),
            faculty: round2(self.faculty),
            infra: round2(self.infra),
            visual: round2(self.visual),
            total: round2(self.total),
        }
    }
}

/// Coarse grade shown next to each section in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SectionGrade {
    Pass,
    Good,
    Fair,
    Fail,
}

impl SectionGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 100.0 {
            Self::Pass
        } else if score >= 75.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Fair
        } else {
            Self::Fail
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Good => "GOOD",
            Self::Fair => "FAIR",
            Self::Fail => "FAIL",
        }
    }
}

/// Score a document's facts and image findings against the category rule.
///
/// Deterministic: identical inputs always yield identical breakdowns and flags. Missing data
/// lowers the affected section and adds a flag; it never aborts scoring.
pub fn score(
    facts: &InstitutionFacts,
    findings: &ImageFindings,
    rule: &PolicyRule,
) -> (ScoreBreakdown, RedFlags) {
    let mut red_flags = RedFlags::default();

    let financial = rules::financial(facts, rule);
    let faculty = rules::faculty(facts, rule);
    let infra = rules::infrastructure(facts, rule);
    let visual = rules::visual(findings, rule);

    for (section, outcome) in [
        (ScoreSection::Financial, &financial),
        (ScoreSection::Faculty, &faculty),
        (ScoreSection::Infrastructure, &infra),
        (ScoreSection::Visual, &visual),
    ] {
        for flag in &outcome.flags {
            red_flags.push(section, flag.clone());
        }
    }

    let total = rules::weighted_total(
        financial.score,
        faculty.score,
        infra.score,
        visual.score,
        &rule.weights,
    );

    let breakdown = ScoreBreakdown {
        financial: financial.score,
        faculty: faculty.score,
        infra: infra.score,
        visual: visual.score,
        total,
    };

    (breakdown, red_flags)
}
