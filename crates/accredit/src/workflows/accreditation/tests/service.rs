use std::io::Cursor;
use std::sync::Arc;

use super::common::*;
use crate::workflows::accreditation::domain::{ImageFindings, InstitutionCategory};
use crate::workflows::accreditation::extraction::{
    DocumentFormat, ExtractionError, PatternFactExtractor, Translator,
};
use crate::workflows::accreditation::policy::PolicyTable;
use crate::workflows::accreditation::service::AccreditationService;
use crate::workflows::accreditation::verdict::{DecisionPolicy, DecisionStatus};

const INSTITUTE_FORM: &str = "\
Institution Name: Lakeside Institute of Technology
Principal: Dr. A. Khan
Corpus Fund (INR): ₹ 2,000,000
Total Students: 600
Total Faculty: 40
Total Computers: 120
Admin Area in sq ft: 800
";

/// Maps a handful of transliterated labels to English.
struct GlossaryTranslator;

impl Translator for GlossaryTranslator {
    fn translate(&self, text: &str) -> Result<String, ExtractionError> {
        Ok(text
            .replace("Sansthan Naam", "Institution Name")
            .replace("Pradhanacharya", "Principal"))
    }
}

#[test]
fn evaluate_scores_with_the_category_rule() {
    let service = service(DecisionPolicy::Strict);

    let report = service
        .evaluate(&compliant_institute_facts(), &complete_institute_findings())
        .expect("institute rule exists");

    assert!(report.is_approved());
    assert_eq!(report.scores.total, 100.0);
    assert_eq!(report.visual_detection.laboratory, "95.12%");
    assert_eq!(report.visual_detection.library, "missing");
}

#[test]
fn text_documents_run_the_full_pipeline() {
    let service = service(DecisionPolicy::Strict);

    let report = service
        .process_reader(
            DocumentFormat::Txt,
            Cursor::new(INSTITUTE_FORM),
            &complete_institute_findings(),
        )
        .expect("pipeline succeeds");

    let details = &report.institution_details;
    assert_eq!(details.name, "Lakeside Institute of Technology");
    assert_eq!(details.category, InstitutionCategory::Institute);
    assert_eq!(details.head_title, "Principal");
    assert_eq!(details.corpus_fund, 2_000_000);
    assert_eq!(details.students, 600);
    assert_eq!(details.faculty, 40);
    assert_eq!(details.computers, 120);
    assert_eq!(details.admin_area, 800);
    assert_eq!(report.status(), DecisionStatus::Approved);
}

#[test]
fn csv_with_a_stray_latin1_byte_keeps_its_good_rows() {
    let service = service(DecisionPolicy::Strict);
    let csv: &[u8] =
        b"Institution Name,Lakeside Institute\nTotal Faculty,40\nTotal Students,600\nRemarks,caf\xe9\n";

    let report = service
        .process_reader(DocumentFormat::Csv, csv, &complete_institute_findings())
        .expect("pipeline succeeds");

    assert_eq!(report.institution_details.name, "Lakeside Institute");
    assert_eq!(report.institution_details.faculty, 40);
    assert_eq!(report.institution_details.students, 600);
}

#[test]
fn documents_without_a_parser_are_scored_from_default_facts() {
    let service = service(DecisionPolicy::Strict);

    let report = service
        .process_reader(
            DocumentFormat::Pdf,
            Cursor::new(b"%PDF-1.7".to_vec()),
            &ImageFindings::default(),
        )
        .expect("missing parser degrades instead of failing");

    assert_eq!(report.institution_details.name, "Unknown Institution");
    assert_eq!(report.institution_details.head_title, "Not Found");
    assert_eq!(report.institution_details.head_name, "N/A");
    assert_eq!(report.status(), DecisionStatus::Rejected);
    assert_eq!(report.scores.total, 0.0);
}

#[test]
fn translator_runs_before_extraction() {
    let service = AccreditationService::with_components(
        Arc::new(PolicyTable::aicte()),
        DecisionPolicy::Strict,
        PatternFactExtractor,
        GlossaryTranslator,
    );

    let facts = service.facts_from_text(
        "Sansthan Naam: Riverside Institute of Pharmacy\nPradhanacharya: S. Iyer (cid:12)\n",
    );

    assert_eq!(facts.name, "Riverside Institute of Pharmacy");
    assert_eq!(facts.head_title, "Principal");
    assert_eq!(facts.head_name, "S. Iyer");
}

#[test]
fn exposes_configured_policy() {
    let service = service(DecisionPolicy::ScoreThreshold { reject_below: 40.0 });

    assert_eq!(
        service.decision_policy(),
        DecisionPolicy::ScoreThreshold { reject_below: 40.0 }
    );
    assert_eq!(service.policies(), &PolicyTable::aicte());
}
