use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{FactsError, ImageFindings, InstitutionFacts};
use super::evaluation::{score, ScoreSection};
use super::extraction::{
    join_blocks, read_text_blocks, translate_block, DocumentFormat, ExtractionError, FactExtractor,
    PassthroughTranslator, PatternFactExtractor, TextBlock, Translator,
};
use super::policy::{PolicyError, PolicyTable};
use super::verdict::{ComplianceReport, DecisionPolicy, VerdictBuilder};

/// Pipeline composing extraction, the policy table, scoring, and the verdict builder.
pub struct AccreditationService<E = PatternFactExtractor, T = PassthroughTranslator> {
    policies: Arc<PolicyTable>,
    verdicts: VerdictBuilder,
    extractor: E,
    translator: T,
}

impl AccreditationService {
    pub fn new(policies: Arc<PolicyTable>, decision: DecisionPolicy) -> Self {
        Self::with_components(
            policies,
            decision,
            PatternFactExtractor,
            PassthroughTranslator,
        )
    }
}

impl<E, T> AccreditationService<E, T>
where
    E: FactExtractor,
    T: Translator,
{
    pub fn with_components(
        policies: Arc<PolicyTable>,
        decision: DecisionPolicy,
        extractor: E,
        translator: T,
    ) -> Self {
        Self {
            policies,
            verdicts: VerdictBuilder::new(decision),
            extractor,
            translator,
        }
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    pub fn decision_policy(&self) -> DecisionPolicy {
        self.verdicts.policy()
    }

    /// Score already-extracted facts and findings and assemble the report.
    pub fn evaluate(
        &self,
        facts: &InstitutionFacts,
        findings: &ImageFindings,
    ) -> Result<ComplianceReport, AccreditationError> {
        let rule = self.policies.rule_for(facts.category)?;
        let (breakdown, red_flags) = score(facts, findings, rule);

        for section in ScoreSection::ALL {
            debug!(
                section = section.label(),
                score = breakdown.section(section),
                flags = red_flags.in_section(section).count(),
                "section scored"
            );
        }

        let report = self.verdicts.build(facts, findings, &breakdown, &red_flags);
        info!(
            institution = %facts.name,
            category = %facts.category,
            total = report.scores.total,
            status = report.status().label(),
            red_flags = red_flags.len(),
            "compliance verdict issued"
        );

        Ok(report)
    }

    /// Translate text blocks, join them, and run the fact extractor over the result.
    pub fn facts_from_blocks(&self, blocks: &[TextBlock]) -> InstitutionFacts {
        let translated = blocks
            .iter()
            .map(|block| TextBlock {
                index: block.index,
                text: translate_block(&self.translator, &block.text),
            })
            .collect::<Vec<_>>();
        self.extractor.extract_facts(&join_blocks(&translated))
    }

    pub fn facts_from_text(&self, text: &str) -> InstitutionFacts {
        self.extractor
            .extract_facts(&translate_block(&self.translator, text))
    }

    /// Run the full pipeline over a document stream.
    ///
    /// Unreadable text degrades to default facts so the document is still scored (and rejected
    /// with explanatory flags) instead of failing.
    pub fn process_reader<R: Read>(
        &self,
        format: DocumentFormat,
        reader: R,
        findings: &ImageFindings,
    ) -> Result<ComplianceReport, AccreditationError> {
        let facts = match read_text_blocks(format, reader) {
            Ok(blocks) => {
                debug!(format = format.label(), blocks = blocks.len(), "text extracted");
                self.facts_from_blocks(&blocks)
            }
            Err(err) => {
                warn!(%err, format = format.label(), "text extraction failed; scoring default facts");
                InstitutionFacts::unidentified()
            }
        };

        self.evaluate(&facts, findings)
    }

    pub fn process_document(
        &self,
        path: &Path,
        findings: &ImageFindings,
    ) -> Result<ComplianceReport, AccreditationError> {
        let file = std::fs::File::open(path)?;

        match DocumentFormat::from_path(path) {
            Ok(format) => self.process_reader(format, std::io::BufReader::new(file), findings),
            Err(err) => {
                warn!(%err, path = %path.display(), "unrecognised document; scoring default facts");
                self.evaluate(&InstitutionFacts::unidentified(), findings)
            }
        }
    }
}

/// Error raised by the accreditation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AccreditationError {
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Facts(#[from] FactsError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("failed to open document: {0}")]
    Io(#[from] std::io::Error),
}
