use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::accreditation::{AccreditationError, ExtractionError, FactsError, PolicyError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Accreditation(AccreditationError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Serialization(err) => write!(f, "serialization error: {}", err),
            AppError::Accreditation(err) => write!(f, "accreditation error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Serialization(err) => Some(err),
            AppError::Accreditation(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<AccreditationError> for AppError {
    fn from(value: AccreditationError) -> Self {
        Self::Accreditation(value)
    }
}

impl From<PolicyError> for AppError {
    fn from(value: PolicyError) -> Self {
        Self::Accreditation(value.into())
    }
}

impl From<FactsError> for AppError {
    fn from(value: FactsError) -> Self {
        Self::Accreditation(value.into())
    }
}

impl From<ExtractionError> for AppError {
    fn from(value: ExtractionError) -> Self {
        Self::Accreditation(value.into())
    }
}
