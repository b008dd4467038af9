use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{InstitutionCategory, CLASSROOM, LABORATORY, LIBRARY};

/// Per-section weights; a valid rule's weights sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub financial: u32,
    pub faculty: u32,
    pub infra: u32,
    pub visual: u32,
}

impl ScoreWeights {
    pub const AICTE: ScoreWeights = ScoreWeights {
        financial: 30,
        faculty: 25,
        infra: 20,
        visual: 25,
    };

    pub fn total(&self) -> u32 {
        self.financial + self.faculty + self.infra + self.visual
    }
}

/// Thresholds and weights applied to one institution category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub head_title_label: String,
    pub corpus_fund_min: u64,
    /// Largest acceptable number of students per faculty member.
    pub faculty_ratio_max: f64,
    pub min_admin_area: u64,
    pub required_image_categories: BTreeSet<String>,
    pub weights: ScoreWeights,
}

impl PolicyRule {
    fn validate(&self, category: InstitutionCategory) -> Result<(), PolicyError> {
        let total = self.weights.total();
        if total != 100 {
            return Err(PolicyError::InvalidWeights { category, total });
        }
        if !self.faculty_ratio_max.is_finite() || self.faculty_ratio_max < 0.0 {
            return Err(PolicyError::InvalidRatio {
                category,
                value: self.faculty_ratio_max,
            });
        }
        if self.required_image_categories.is_empty() {
            return Err(PolicyError::NoRequiredImages(category));
        }
        Ok(())
    }
}

/// Validation and lookup failures for the policy table.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("unknown institution category '{0}' (expected UNIVERSITY or INSTITUTE)")]
    UnknownCategory(String),
    #[error("policy table has no rule for {0}")]
    MissingRule(InstitutionCategory),
    #[error("weights for {category} sum to {total}, expected 100")]
    InvalidWeights {
        category: InstitutionCategory,
        total: u32,
    },
    #[error("faculty ratio limit for {category} must be a finite, non-negative number (found {value})")]
    InvalidRatio {
        category: InstitutionCategory,
        value: f64,
    },
    #[error("rule for {0} must require at least one image category")]
    NoRequiredImages(InstitutionCategory),
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid policy file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable category → rule table, built once and shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PolicyTable {
    rules: BTreeMap<InstitutionCategory, PolicyRule>,
}

impl PolicyTable {
    /// Validate a complete table: every category needs a rule and every rule must be scoreable.
    pub fn new(rules: BTreeMap<InstitutionCategory, PolicyRule>) -> Result<Self, PolicyError> {
        for category in InstitutionCategory::ALL {
            rules
                .get(&category)
                .ok_or(PolicyError::MissingRule(category))?
                .validate(category)?;
        }
        Ok(Self { rules })
    }

    /// The AICTE rule set.
    pub fn aicte() -> Self {
        let required = |labels: &[&str]| -> BTreeSet<String> {
            labels.iter().map(|label| label.to_string()).collect()
        };

        let mut rules = BTreeMap::new();
        rules.insert(
            InstitutionCategory::University,
            PolicyRule {
                head_title_label: "Vice Chancellor".to_string(),
                corpus_fund_min: 100_000_000,
                faculty_ratio_max: 15.0,
                min_admin_area: 1000,
                required_image_categories: required(&[CLASSROOM, LIBRARY, LABORATORY]),
                weights: ScoreWeights::AICTE,
            },
        );
        rules.insert(
            InstitutionCategory::Institute,
            PolicyRule {
                head_title_label: "Principal".to_string(),
                corpus_fund_min: 1_500_000,
                faculty_ratio_max: 20.0,
                min_admin_area: 750,
                required_image_categories: required(&[CLASSROOM, LABORATORY]),
                weights: ScoreWeights::AICTE,
            },
        );

        Self { rules }
    }

    /// Load a table from JSON shaped as `{ "UNIVERSITY": { ..rule.. }, "INSTITUTE": { .. } }`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PolicyError> {
        let raw: BTreeMap<String, PolicyRule> = serde_json::from_reader(reader)?;
        let mut rules = BTreeMap::new();
        for (label, rule) in raw {
            let category = label
                .parse::<InstitutionCategory>()
                .map_err(|_| PolicyError::UnknownCategory(label.clone()))?;
            rules.insert(category, rule);
        }
        Self::new(rules)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn rule_for(&self, category: InstitutionCategory) -> Result<&PolicyRule, PolicyError> {
        self.rules
            .get(&category)
            .ok_or(PolicyError::MissingRule(category))
    }

    /// Resolve a category label such as `"UNIVERSITY"` to its rule.
    pub fn lookup(&self, label: &str) -> Result<&PolicyRule, PolicyError> {
        let category = label
            .parse::<InstitutionCategory>()
            .map_err(|_| PolicyError::UnknownCategory(label.to_string()))?;
        self.rule_for(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InstitutionCategory, &PolicyRule)> {
        self.rules.iter()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::aicte()
    }
}
