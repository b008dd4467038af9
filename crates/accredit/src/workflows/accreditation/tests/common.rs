use std::sync::Arc;

use crate::workflows::accreditation::domain::{
    ImageFinding, ImageFindings, InstitutionCategory, InstitutionFacts,
};
use crate::workflows::accreditation::policy::{PolicyRule, PolicyTable};
use crate::workflows::accreditation::service::AccreditationService;
use crate::workflows::accreditation::verdict::DecisionPolicy;

/// University whose only gaps are a high student:faculty ratio and a missing lab photo.
pub(super) fn university_facts() -> InstitutionFacts {
    InstitutionFacts {
        name: "Deccan Technical University".to_string(),
        category: InstitutionCategory::University,
        head_title: "Vice Chancellor".to_string(),
        head_name: "Prof. Meera Rao".to_string(),
        corpus_fund: 200_000_000,
        students: 1500,
        faculty: 50,
        computers: 10,
        admin_area: 1200,
    }
}

/// Institute meeting every AICTE threshold.
pub(super) fn compliant_institute_facts() -> InstitutionFacts {
    InstitutionFacts {
        name: "Lakeside Institute of Technology".to_string(),
        category: InstitutionCategory::Institute,
        head_title: "Principal".to_string(),
        head_name: "Dr. A. Khan".to_string(),
        corpus_fund: 2_000_000,
        students: 600,
        faculty: 40,
        computers: 120,
        admin_area: 800,
    }
}

pub(super) fn findings(entries: &[(&str, f64)]) -> ImageFindings {
    entries
        .iter()
        .map(|(category, confidence)| ImageFinding::new(*category, *confidence))
        .collect()
}

pub(super) fn partial_university_findings() -> ImageFindings {
    findings(&[("Classroom", 90.0), ("Library", 88.0)])
}

pub(super) fn complete_institute_findings() -> ImageFindings {
    findings(&[
        ("Classroom", 93.4),
        ("Laboratory", 95.12),
        ("College Building", 89.0),
    ])
}

pub(super) fn rule(category: InstitutionCategory) -> PolicyRule {
    PolicyTable::aicte()
        .rule_for(category)
        .expect("aicte rule")
        .clone()
}

pub(super) fn service(decision: DecisionPolicy) -> AccreditationService {
    AccreditationService::new(Arc::new(PolicyTable::aicte()), decision)
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}
