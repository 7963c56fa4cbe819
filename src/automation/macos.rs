use super::{Automation, ScriptOutput};
use crate::calibration::IconPosition;
use crate::error::{Result, SmokeError};
use std::path::Path;
use std::process::Output;
use tokio::process::Command;

/// [`Automation`] backed by `osascript`, `cliclick` and `screencapture`
#[derive(Debug, Clone)]
pub struct MacAutomation {
    osascript: String,
    cliclick: String,
    screencapture: String,
}

impl Default for MacAutomation {
    fn default() -> Self {
        Self {
            osascript: "osascript".to_string(),
            cliclick: "cliclick".to_string(),
            screencapture: "screencapture".to_string(),
        }
    }
}

impl MacAutomation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `cliclick` binary instead of the one on `PATH`
    pub fn with_cliclick(mut self, path: impl Into<String>) -> Self {
        self.cliclick = path.into();
        self
    }

    async fn output(tool: &str, args: &[&str]) -> Result<Output> {
        Command::new(tool)
            .args(args)
            .output()
            .await
            .map_err(|source| SmokeError::ToolUnavailable {
                tool: tool.to_string(),
                source,
            })
    }

    /// Run a tool and require a zero exit status
    async fn run_checked(tool: &str, args: &[&str]) -> Result<Output> {
        let output = Self::output(tool, args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SmokeError::ToolFailed {
                tool: tool.to_string(),
                message: format!("{} ({})", stderr.trim(), output.status),
            });
        }
        Ok(output)
    }
}

impl Automation for MacAutomation {
    async fn run_applescript(&self, script: &str) -> Result<ScriptOutput> {
        let output = Self::output(&self.osascript, &["-e", script]).await?;
        let result = ScriptOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout)
                .trim_end_matches(|c: char| c == '\n' || c == '\r')
                .to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };
        log::debug!(
            "osascript exited ok={} stdout={:?} stderr={:?}",
            result.success,
            result.stdout,
            result.stderr
        );
        Ok(result)
    }

    async fn click(&self, position: IconPosition) -> Result<()> {
        let command = format!("c:{},{}", position.x, position.y);
        Self::run_checked(&self.cliclick, &[command.as_str()]).await?;
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        let command = format!("t:{}", text);
        Self::run_checked(&self.cliclick, &[command.as_str()]).await?;
        Ok(())
    }

    async fn capture_screen(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        // -x: no shutter sound
        Self::run_checked(&self.screencapture, &["-x", &*path]).await?;
        Ok(())
    }

    async fn input_tool_version(&self) -> Result<String> {
        let output = Self::run_checked(&self.cliclick, &["-V"]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tool_is_unavailable() {
        let automation = MacAutomation::new().with_cliclick("/nonexistent/cliclick-for-test");

        let err = automation
            .input_tool_version()
            .await
            .expect_err("tool should not exist");

        assert!(matches!(err, SmokeError::ToolUnavailable { .. }));
        assert!(err.to_string().contains("cliclick-for-test"));
    }
}
