//! Screenshot capture
//!
//! Screenshots are evidence for a human looking at a failed run, so they are
//! written to a fixed location and never cleaned up by the tool.

use crate::automation::Automation;
use std::path::{Path, PathBuf};

/// `<dir>/extension-test-<name>-<unix_ts>.png`
pub fn screenshot_path(dir: &Path, name: &str, unix_ts: i64) -> PathBuf {
    dir.join(format!("extension-test-{}-{}.png", name, unix_ts))
}

/// Capture the screen, returning the path only if the file was written.
///
/// Failures are logged and swallowed; a missing screenshot never fails a run.
pub async fn capture<A: Automation>(automation: &A, dir: &Path, name: &str) -> Option<PathBuf> {
    let path = screenshot_path(dir, name, chrono::Utc::now().timestamp());

    match automation.capture_screen(&path).await {
        Ok(()) => {
            log::info!("Screenshot saved: {}", path.display());
            Some(path)
        }
        Err(e) => {
            log::warn!("Screenshot '{}' failed: {}", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_path_pattern() {
        let path = screenshot_path(Path::new("/tmp"), "popup-open", 1_700_000_000);
        assert_eq!(
            path,
            PathBuf::from("/tmp/extension-test-popup-open-1700000000.png")
        );
    }
}
