use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Crates whose events follow the configured level; everything else stays at `warn`.
const VERIFIER_TARGETS: [&str; 2] = ["accredit", "accredit_verifier"];

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid APP_LOG_LEVEL '{}': unable to build the verifier log filter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Install the global subscriber. Logs go to stderr; stdout is reserved for reports.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(rust_log.as_deref(), config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

/// A parseable `RUST_LOG` wins; otherwise the configured level is scoped to the verifier crates.
fn build_filter(
    rust_log: Option<&str>,
    config: &TelemetryConfig,
) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = rust_log.and_then(|raw| EnvFilter::try_new(raw).ok()) {
        return Ok(filter);
    }

    EnvFilter::try_new(filter_directives(&config.log_level)).map_err(|source| {
        TelemetryError::EnvFilter {
            value: config.log_level.clone(),
            source,
        }
    })
}

/// Bare levels become per-crate directives; full directive strings pass through untouched.
fn filter_directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    let mut directives = vec!["warn".to_string()];
    directives.extend(
        VERIFIER_TARGETS
            .iter()
            .map(|target| format!("{target}={level}")),
    );
    directives.join(",")
}
