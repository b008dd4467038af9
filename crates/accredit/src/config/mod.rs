use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::workflows::accreditation::policy::{PolicyError, PolicyTable};
use crate::workflows::accreditation::verdict::{DecisionPolicy, DEFAULT_REJECT_BELOW};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the verifier.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let reject_below = match env::var("ACCREDIT_REJECT_BELOW") {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_REJECT_BELOW,
        };
        let mode = env::var("ACCREDIT_DECISION_POLICY")
            .unwrap_or_else(|_| "strict".to_string())
            .parse::<DecisionMode>()?;
        let policy_file = env::var("ACCREDIT_POLICY_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig {
                mode,
                reject_below,
                policy_file,
            },
        })
    }
}

fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| (0.0..=100.0).contains(value))
        .ok_or_else(|| ConfigError::InvalidThreshold(raw.to_string()))
}

/// Which decision rule turns scores into a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionMode {
    #[default]
    Strict,
    Threshold,
}

impl std::str::FromStr for DecisionMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "threshold" | "score_threshold" => Ok(Self::Threshold),
            other => Err(ConfigError::InvalidDecisionPolicy(other.to_string())),
        }
    }
}

/// Policy table source and decision rule.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub mode: DecisionMode,
    /// Total below which the threshold rule rejects outright.
    pub reject_below: f64,
    /// JSON policy table replacing the built-in AICTE rules.
    pub policy_file: Option<PathBuf>,
}

impl ScoringConfig {
    pub fn decision_policy(&self) -> DecisionPolicy {
        match self.mode {
            DecisionMode::Strict => DecisionPolicy::Strict,
            DecisionMode::Threshold => DecisionPolicy::ScoreThreshold {
                reject_below: self.reject_below,
            },
        }
    }

    pub fn policy_table(&self) -> Result<PolicyTable, PolicyError> {
        match &self.policy_file {
            Some(path) => PolicyTable::from_path(path),
            None => Ok(PolicyTable::aicte()),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDecisionPolicy(String),
    InvalidThreshold(String),
    ThresholdUnderStrictPolicy(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDecisionPolicy(value) => write!(
                f,
                "ACCREDIT_DECISION_POLICY must be 'strict' or 'threshold' (found '{value}')"
            ),
            ConfigError::InvalidThreshold(value) => write!(
                f,
                "ACCREDIT_REJECT_BELOW must be a number between 0 and 100 (found '{value}')"
            ),
            ConfigError::ThresholdUnderStrictPolicy(value) => write!(
                f,
                "reject-below {value} has no effect under the strict decision policy; select the threshold policy"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("ACCREDIT_DECISION_POLICY");
        env::remove_var("ACCREDIT_REJECT_BELOW");
        env::remove_var("ACCREDIT_POLICY_FILE");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring.mode, DecisionMode::Strict);
        assert_eq!(config.scoring.decision_policy(), DecisionPolicy::Strict);
        assert!(config.scoring.policy_file.is_none());
        assert_eq!(
            config.scoring.policy_table().expect("built-in table"),
            PolicyTable::aicte()
        );
    }

    #[test]
    fn threshold_policy_reads_reject_below() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ACCREDIT_DECISION_POLICY", "Threshold");
        env::set_var("ACCREDIT_REJECT_BELOW", "65");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.scoring.decision_policy(),
            DecisionPolicy::ScoreThreshold { reject_below: 65.0 }
        );
        reset_env();
    }

    #[test]
    fn rejects_invalid_policy_and_threshold() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ACCREDIT_DECISION_POLICY", "lenient");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidDecisionPolicy(value)) if value == "lenient"
        ));

        reset_env();
        env::set_var("ACCREDIT_REJECT_BELOW", "140");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidThreshold(value)) if value == "140"
        ));
        reset_env();
    }
}
