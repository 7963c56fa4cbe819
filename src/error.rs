use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmokeError {
    #[error("Missing prerequisite: {what}\n   Fix: {remediation}")]
    PrerequisiteMissing { what: String, remediation: String },

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("{tool} is not available: {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("Interrupted by user")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SmokeError>;
