use crate::commands::{run_policy, run_score, run_verify, ScoreArgs, VerifyArgs};
use accredit::error::AppError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "accredit-verifier",
    about = "Score accreditation documents against the AICTE policy and issue a verdict",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract facts from a document, score them, and emit the compliance report
    Verify(VerifyArgs),
    /// Score facts that were extracted elsewhere (JSON)
    Score(ScoreArgs),
    /// Print the active policy table as JSON
    Policy(ScoringArgs),
}

/// Decision rule selectable from the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PolicyMode {
    /// Any red flag rejects
    Strict,
    /// Reject below the threshold, otherwise send flagged documents to manual review
    Threshold,
}

/// Overrides applied on top of the environment configuration.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ScoringArgs {
    /// Decision rule (defaults to ACCREDIT_DECISION_POLICY, then strict)
    #[arg(long, value_enum)]
    pub(crate) policy: Option<PolicyMode>,
    /// Total below which the threshold rule rejects outright
    #[arg(long)]
    pub(crate) reject_below: Option<f64>,
    /// JSON policy table replacing the built-in AICTE rules
    #[arg(long)]
    pub(crate) policy_file: Option<PathBuf>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify(args) => run_verify(args),
        Command::Score(args) => run_score(args),
        Command::Policy(args) => run_policy(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "accredit-verifier",
            "verify",
            "forms/deccan.txt",
            "--findings",
            "forms/deccan-images.json",
            "--output",
            "out/report.json",
            "--policy",
            "threshold",
            "--reject-below",
            "60",
            "--summary",
        ])
        .expect("verify parses");

        let Command::Verify(args) = cli.command else {
            panic!("expected verify command");
        };
        assert_eq!(args.document, PathBuf::from("forms/deccan.txt"));
        assert_eq!(
            args.findings,
            Some(PathBuf::from("forms/deccan-images.json"))
        );
        assert_eq!(args.output, Some(PathBuf::from("out/report.json")));
        assert_eq!(args.scoring.policy, Some(PolicyMode::Threshold));
        assert_eq!(args.scoring.reject_below, Some(60.0));
        assert!(args.summary);
    }

    #[test]
    fn verify_requires_a_document() {
        assert!(Cli::try_parse_from(["accredit-verifier", "verify"]).is_err());
    }

    #[test]
    fn rejects_unknown_policy_mode() {
        let result = Cli::try_parse_from([
            "accredit-verifier",
            "verify",
            "form.txt",
            "--policy",
            "lenient",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn score_and_policy_commands_parse() {
        let cli = Cli::try_parse_from(["accredit-verifier", "score", "facts.json"])
            .expect("score parses");
        let Command::Score(args) = cli.command else {
            panic!("expected score command");
        };
        assert_eq!(args.facts, PathBuf::from("facts.json"));
        assert!(args.findings.is_none());
        assert!(args.scoring.policy.is_none());

        let cli = Cli::try_parse_from([
            "accredit-verifier",
            "policy",
            "--policy-file",
            "rules.json",
        ])
        .expect("policy parses");
        let Command::Policy(args) = cli.command else {
            panic!("expected policy command");
        };
        assert_eq!(args.policy_file, Some(PathBuf::from("rules.json")));
    }
}
