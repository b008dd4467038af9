use crate::cli::{PolicyMode, ScoringArgs};
use accredit::config::{AppConfig, ConfigError, DecisionMode, ScoringConfig};
use accredit::error::AppError;
use accredit::telemetry;
use accredit::workflows::accreditation::{
    findings_from_path, AccreditationService, ComplianceReport, ImageFindings,
};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Load configuration, apply command-line overrides, and install the subscriber.
pub(crate) fn bootstrap(args: &ScoringArgs) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    apply_overrides(&mut config.scoring, args)?;
    telemetry::init(&config.telemetry)?;
    info!(
        ?config.environment,
        mode = ?config.scoring.mode,
        policy_file = ?config.scoring.policy_file,
        "verifier configured"
    );
    Ok(config)
}

pub(crate) fn apply_overrides(
    scoring: &mut ScoringConfig,
    args: &ScoringArgs,
) -> Result<(), ConfigError> {
    if let Some(mode) = args.policy {
        scoring.mode = match mode {
            PolicyMode::Strict => DecisionMode::Strict,
            PolicyMode::Threshold => DecisionMode::Threshold,
        };
    }
    if let Some(reject_below) = args.reject_below {
        if !(0.0..=100.0).contains(&reject_below) {
            return Err(ConfigError::InvalidThreshold(reject_below.to_string()));
        }
        if scoring.mode == DecisionMode::Strict {
            return Err(ConfigError::ThresholdUnderStrictPolicy(reject_below));
        }
        scoring.reject_below = reject_below;
    }
    if let Some(path) = &args.policy_file {
        scoring.policy_file = Some(path.clone());
    }
    Ok(())
}

pub(crate) fn build_service(config: &AppConfig) -> Result<AccreditationService, AppError> {
    let policies = config.scoring.policy_table()?;
    Ok(AccreditationService::new(
        Arc::new(policies),
        config.scoring.decision_policy(),
    ))
}

/// Findings file when given; no findings otherwise.
pub(crate) fn load_findings(path: Option<&Path>) -> Result<ImageFindings, AppError> {
    match path {
        Some(path) => Ok(findings_from_path(path)?),
        None => Ok(ImageFindings::default()),
    }
}

/// Write the report to `output`, or to stdout when no file was requested.
pub(crate) fn write_report(
    report: &ComplianceReport,
    output: Option<&Path>,
) -> Result<(), AppError> {
    let json = report.to_json_pretty()?;
    write_json(&json, output)
}

pub(crate) fn write_json(json: &str, output: Option<&Path>) -> Result<(), AppError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, format!("{json}\n"))?;
            info!(path = %path.display(), "report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
