//! Accreditation compliance: facts and image findings in, an auditable verdict out.
//!
//! Scoring and verdict assembly are pure and deterministic. Extraction and detection sit at the
//! edges and degrade to default facts or empty findings rather than failing a document.

pub mod detection;
pub mod domain;
pub mod evaluation;
pub mod extraction;
pub mod policy;
pub mod service;
pub mod verdict;

#[cfg(test)]
mod tests;

pub use detection::{detect_images, findings_from_path, findings_from_reader, ImageClassifier};
pub use domain::{
    FactsError, FactsRecord, ImageFinding, ImageFindings, InstitutionCategory, InstitutionFacts,
    CANONICAL_IMAGE_CATEGORIES,
};
pub use evaluation::{score, RedFlag, RedFlags, ScoreBreakdown, ScoreSection, SectionGrade};
pub use extraction::{
    DocumentFormat, ExtractionError, FactExtractor, PassthroughTranslator, PatternFactExtractor,
    TextBlock, Translator,
};
pub use policy::{PolicyError, PolicyRule, PolicyTable, ScoreWeights};
pub use service::{AccreditationError, AccreditationService};
pub use verdict::{
    ComplianceReport, DecisionPolicy, DecisionStatus, FacultyRatio, FinalDecision,
    InstitutionDetails, VerdictBuilder, VisualDetection,
};
