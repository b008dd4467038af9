use super::super::domain::{ImageFindings, InstitutionFacts};
use super::super::policy::{PolicyRule, ScoreWeights};

pub(crate) const FULL_SCORE: f64 = 100.0;
const FACULTY_RATIO_PENALTY: f64 = 5.0;
const INFRA_CHECK_POINTS: f64 = 50.0;

pub(crate) struct SectionOutcome {
    pub score: f64,
    pub flags: Vec<String>,
}

impl SectionOutcome {
    fn full() -> Self {
        Self {
            score: FULL_SCORE,
            flags: Vec::new(),
        }
    }

    fn flagged(score: f64, flag: String) -> Self {
        Self {
            score,
            flags: vec![flag],
        }
    }
}

pub(crate) fn financial(facts: &InstitutionFacts, rule: &PolicyRule) -> SectionOutcome {
    if facts.corpus_fund >= rule.corpus_fund_min {
        return SectionOutcome::full();
    }

    let deficit = rule.corpus_fund_min - facts.corpus_fund;
    SectionOutcome::flagged(
        0.0,
        format!("Corpus fund short by ₹{}", group_thousands(deficit)),
    )
}

pub(crate) fn faculty(facts: &InstitutionFacts, rule: &PolicyRule) -> SectionOutcome {
    // Zero faculty is its own deficiency, not an infinitely high ratio.
    let Some(ratio) = facts.student_faculty_ratio() else {
        return SectionOutcome::flagged(0.0, "No faculty record found".to_string());
    };

    if ratio <= rule.faculty_ratio_max {
        return SectionOutcome::full();
    }

    let penalty = (ratio - rule.faculty_ratio_max) * FACULTY_RATIO_PENALTY;
    SectionOutcome::flagged(
        (FULL_SCORE - penalty).max(0.0),
        format!("Faculty ratio high: 1:{}", format_ratio(ratio)),
    )
}

pub(crate) fn infrastructure(facts: &InstitutionFacts, rule: &PolicyRule) -> SectionOutcome {
    let mut score = 0.0;
    let mut flags = Vec::new();

    if facts.admin_area >= rule.min_admin_area {
        score += INFRA_CHECK_POINTS;
    } else {
        flags.push(format!(
            "Admin area short by {} sq ft",
            rule.min_admin_area - facts.admin_area
        ));
    }

    if facts.computers > 0 {
        score += INFRA_CHECK_POINTS;
    } else {
        flags.push("Computers count missing".to_string());
    }

    SectionOutcome { score, flags }
}

pub(crate) fn visual(findings: &ImageFindings, rule: &PolicyRule) -> SectionOutcome {
    let required = &rule.required_image_categories;
    if required.is_empty() {
        return SectionOutcome::full();
    }

    let found = findings.categories();
    let (matched, missing): (Vec<&String>, Vec<&String>) = required
        .iter()
        .partition(|category| found.contains(category.as_str()));

    let score = matched.len() as f64 / required.len() as f64 * FULL_SCORE;
    if missing.is_empty() {
        return SectionOutcome {
            score,
            flags: Vec::new(),
        };
    }

    // BTreeSet iteration keeps the missing list sorted.
    let missing = missing
        .iter()
        .map(|category| category.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    SectionOutcome::flagged(score, format!("Missing required images: {missing}"))
}

pub(crate) fn weighted_total(
    financial: f64,
    faculty: f64,
    infra: f64,
    visual: f64,
    weights: &ScoreWeights,
) -> f64 {
    let weighted = financial * f64::from(weights.financial)
        + faculty * f64::from(weights.faculty)
        + infra * f64::from(weights.infra)
        + visual * f64::from(weights.visual);
    (weighted / 100.0).clamp(0.0, FULL_SCORE)
}

/// Two decimals, ties to even (`30.125` → `30.12`).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Ratio rounded to two decimals, always showing at least one (`30.0`, `33.33`).
pub(crate) fn format_ratio(ratio: f64) -> String {
    let rounded = round2(ratio);
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
