use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for capture, matching and pointer operations.
pub type AutomationResult<T> = Result<T, AutomationError>;

/// Broad classification of an [`AutomationError`], used when reporting faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Capture,
    TemplateLoad,
    Match,
    Actuation,
}

/// The error type for everything the automation core can fail at.
///
/// None of these escape the core: the locator turns them into an absent
/// result and the actuator swallows them after reporting.
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("No display found to capture")]
    NoDisplay,

    #[error("Screen capture failed: {description}")]
    Capture { description: String },

    #[error("Failed to load template {path:?}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Template matching fault: {description}")]
    MatchFault { description: String },

    #[error("Pointer {operation} failed: {description}")]
    Actuation {
        operation: &'static str,
        description: String,
    },
}

impl AutomationError {
    pub fn kind(&self) -> FaultKind {
        match self {
            AutomationError::NoDisplay | AutomationError::Capture { .. } => FaultKind::Capture,
            AutomationError::TemplateLoad { .. } => FaultKind::TemplateLoad,
            AutomationError::MatchFault { .. } => FaultKind::Match,
            AutomationError::Actuation { .. } => FaultKind::Actuation,
        }
    }

    pub(crate) fn capture(err: impl std::fmt::Display) -> Self {
        AutomationError::Capture {
            description: err.to_string(),
        }
    }

    pub(crate) fn actuation(operation: &'static str, err: impl std::fmt::Display) -> Self {
        AutomationError::Actuation {
            operation,
            description: err.to_string(),
        }
    }
}

/// Invalid retry, click or settle values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Threshold {value} is outside the correlation range [-1.0, 1.0]")]
    ThresholdOutOfRange { value: f32 },

    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    InvalidSeconds { field: &'static str, value: f64 },

    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("No match threshold given; set `threshold` in [defaults] or on the step")]
    MissingThreshold,
}

/// Failure to load or validate a workflow file.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to read workflow {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse workflow {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown keys in step '{step}': {keys}")]
    UnknownKeys { step: String, keys: String },

    #[error("Invalid settings in step '{step}': {source}")]
    InvalidStep {
        step: String,
        #[source]
        source: ConfigError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_kinds() {
        assert_eq!(AutomationError::NoDisplay.kind(), FaultKind::Capture);
        assert_eq!(AutomationError::capture("denied").kind(), FaultKind::Capture);
        assert_eq!(
            AutomationError::actuation("click", "no seat").kind(),
            FaultKind::Actuation
        );
        assert_eq!(
            AutomationError::MatchFault {
                description: "empty".to_string()
            }
            .kind(),
            FaultKind::Match
        );
    }

    #[test]
    fn test_actuation_message() {
        let err = AutomationError::actuation("move", "display closed");
        assert_eq!(err.to_string(), "Pointer move failed: display closed");
    }
}
