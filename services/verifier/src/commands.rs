use crate::cli::ScoringArgs;
use crate::infra::{bootstrap, build_service, load_findings, write_json, write_report};
use crate::render::render_summary;
use accredit::error::AppError;
use accredit::workflows::accreditation::InstitutionFacts;
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct VerifyArgs {
    /// Accreditation document (txt, csv, json; pdf and docx degrade to default facts)
    pub(crate) document: PathBuf,
    /// JSON array of image findings ({"type"|"category", "confidence"})
    #[arg(long)]
    pub(crate) findings: Option<PathBuf>,
    /// Write the JSON report here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Print a per-section summary table to stderr
    #[arg(long)]
    pub(crate) summary: bool,
    #[command(flatten)]
    pub(crate) scoring: ScoringArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Facts JSON produced by an external extractor
    pub(crate) facts: PathBuf,
    /// JSON array of image findings
    #[arg(long)]
    pub(crate) findings: Option<PathBuf>,
    /// Write the JSON report here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Print a per-section summary table to stderr
    #[arg(long)]
    pub(crate) summary: bool,
    #[command(flatten)]
    pub(crate) scoring: ScoringArgs,
}

pub(crate) fn run_verify(args: VerifyArgs) -> Result<(), AppError> {
    let VerifyArgs {
        document,
        findings,
        output,
        summary,
        scoring,
    } = args;

    let config = bootstrap(&scoring)?;
    let service = build_service(&config)?;
    let findings = load_findings(findings.as_deref())?;

    info!(document = %document.display(), findings = findings.len(), "verifying document");
    let report = service.process_document(&document, &findings)?;

    if summary {
        render_summary(&report);
    }
    write_report(&report, output.as_deref())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        facts,
        findings,
        output,
        summary,
        scoring,
    } = args;

    let config = bootstrap(&scoring)?;
    let service = build_service(&config)?;
    let findings = load_findings(findings.as_deref())?;
    let facts = InstitutionFacts::from_json_reader(BufReader::new(File::open(&facts)?))?;

    let report = service.evaluate(&facts, &findings)?;

    if summary {
        render_summary(&report);
    }
    write_report(&report, output.as_deref())
}

pub(crate) fn run_policy(args: ScoringArgs) -> Result<(), AppError> {
    let config = bootstrap(&args)?;
    let table = config.scoring.policy_table()?;
    let json = serde_json::to_string_pretty(&table)?;
    write_json(&json, None)
}
