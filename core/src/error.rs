//! Error types and failure-reason mapping

use thiserror::Error;

use crate::ims::validate::Violation;

/// Result type alias for action operations
pub type Result<T> = std::result::Result<T, ActionError>;

/// Action error. `Display` is the failure reason reported to the runner.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("{message}")]
    Configuration { message: String },

    #[error("[{flow}] Validation errors: {}", render_violations(.violations))]
    Validation {
        flow: &'static str,
        violations: Vec<Violation>,
    },

    #[error("{message}")]
    ScopeFormat { message: String },

    #[error("{message}")]
    Acquisition { message: String },

    #[error("failed to publish {key}: {message}")]
    Publish { key: String, message: String },

    #[error("{message}")]
    CommandFailed { message: String },
}

impl ActionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(flow: &'static str, violations: Vec<Violation>) -> Self {
        Self::Validation { flow, violations }
    }

    pub fn scope_format(message: impl Into<String>) -> Self {
        Self::ScopeFormat {
            message: message.into(),
        }
    }

    pub fn acquisition(message: impl Into<String>) -> Self {
        Self::Acquisition {
            message: message.into(),
        }
    }

    pub fn publish(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn command_failed(message: impl Into<String>) -> Self {
        Self::CommandFailed {
            message: message.into(),
        }
    }

    /// Get the error key for this error
    pub fn error_key(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration_error",
            Self::Validation { .. } => "validation_error",
            Self::ScopeFormat { .. } => "scope_format_error",
            Self::Acquisition { .. } => "acquisition_error",
            Self::Publish { .. } => "publish_error",
            Self::CommandFailed { .. } => "command_failed",
        }
    }
}

fn render_violations(violations: &[Violation]) -> String {
    serde_json::to_string_pretty(violations).unwrap_or_else(|_| format!("{:?}", violations))
}
