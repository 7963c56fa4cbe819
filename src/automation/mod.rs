//! OS automation backend
//!
//! Everything the smoke test does to the desktop goes through [`Automation`]:
//! AppleScript for window and accessibility queries, synthetic input, and
//! screen capture. [`MacAutomation`] shells out to the macOS tools; tests
//! substitute a scripted fake.

pub mod applescript;
pub mod macos;

pub use macos::MacAutomation;

use crate::calibration::IconPosition;
use crate::error::Result;
use std::path::Path;

/// Captured result of one AppleScript invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ScriptOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the script printed `true` (AppleScript booleans print lowercase)
    pub fn is_true(&self) -> bool {
        self.success && self.stdout.to_lowercase().contains("true")
    }

    /// Best description of what went wrong
    pub fn error_text(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Desktop automation primitives.
///
/// `run_applescript` only returns `Err` when the script could not be run at
/// all; a script that ran and failed comes back as `ScriptOutput { success: false, .. }`.
#[allow(async_fn_in_trait)]
pub trait Automation {
    async fn run_applescript(&self, script: &str) -> Result<ScriptOutput>;

    /// Synthetic left click at screen coordinates
    async fn click(&self, position: IconPosition) -> Result<()>;

    /// Type text into whatever has keyboard focus
    async fn type_text(&self, text: &str) -> Result<()>;

    /// Capture the whole screen to `path`
    async fn capture_screen(&self, path: &Path) -> Result<()>;

    /// Version string of the synthetic input tool, used as an availability probe
    async fn input_tool_version(&self) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_true_requires_success() {
        assert!(ScriptOutput::ok("true").is_true());
        assert!(ScriptOutput::ok("TRUE\n").is_true());
        assert!(!ScriptOutput::ok("false").is_true());
        assert!(!ScriptOutput {
            success: false,
            stdout: "true".to_string(),
            stderr: String::new(),
        }
        .is_true());
    }

    #[test]
    fn test_error_text_prefers_stderr() {
        let output = ScriptOutput {
            success: false,
            stdout: "Error: nope".to_string(),
            stderr: "execution error: -1719\n".to_string(),
        };
        assert_eq!(output.error_text(), "execution error: -1719");
        assert_eq!(ScriptOutput::ok(" Error: x ").error_text(), "Error: x");
    }
}
