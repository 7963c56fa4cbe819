use super::{BrowserLauncher, BrowserSession};
use crate::config::HarnessConfig;
use crate::error::{Result, SmokeError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};

/// Launches the configured Chrome binary as a plain child process.
///
/// DevTools automation cannot reach extension popups, so Chrome is started
/// without a debugging connection and driven through the OS instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeLauncher;

/// A Chrome process and the throwaway profile it runs in
pub struct ChromeSession {
    child: Option<Child>,
    profile_dir: Option<PathBuf>,
    shutdown_timeout: Duration,
}

/// Command-line flags for a test launch, URL last
pub fn chrome_args(profile_dir: &Path, extension_path: &Path, url: &str) -> Vec<String> {
    vec![
        format!("--user-data-dir={}", profile_dir.display()),
        format!("--load-extension={}", extension_path.display()),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        url.to_string(),
    ]
}

/// Fresh, unique profile directory under the system temp dir
fn create_profile_dir() -> Result<PathBuf> {
    // Nanosecond timestamp keeps concurrent runs apart
    let unique_id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let profile_dir = std::env::temp_dir().join(format!("chrome-ext-test-{}", unique_id));
    std::fs::create_dir_all(&profile_dir).map_err(|e| {
        SmokeError::LaunchFailed(format!("Failed to create temp directory: {}", e))
    })?;
    Ok(profile_dir)
}

impl BrowserLauncher for ChromeLauncher {
    type Session = ChromeSession;

    async fn launch(&self, config: &HarnessConfig) -> Result<ChromeSession> {
        log::info!("Launching Chrome with extension...");

        let profile_dir = create_profile_dir()?;
        let mut command = Command::new(&config.chrome_path);
        command
            .args(chrome_args(
                &profile_dir,
                &config.extension_path,
                &config.test_url,
            ))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                let _ = std::fs::remove_dir_all(&profile_dir);
                return Err(SmokeError::LaunchFailed(format!(
                    "{}: {}",
                    config.chrome_path.display(),
                    e
                )));
            }
        };

        let session = ChromeSession::new(child, profile_dir, config.timings.shutdown);
        if let Some(pid) = session.pid() {
            log::info!("Chrome PID: {}", pid);
        }
        Ok(session)
    }
}

impl ChromeSession {
    pub fn new(child: Child, profile_dir: PathBuf, shutdown_timeout: Duration) -> Self {
        Self {
            child: Some(child),
            profile_dir: Some(profile_dir),
            shutdown_timeout,
        }
    }

    pub fn profile_dir(&self) -> Option<&Path> {
        self.profile_dir.as_deref()
    }

    /// SIGTERM gives Chrome the chance to exit cleanly; fall back to a kill.
    async fn terminate(child: &mut Child) {
        let Some(pid) = child.id() else {
            return;
        };

        let pid_arg = pid.to_string();
        let sent = Command::new("kill")
            .args(["-TERM", pid_arg.as_str()])
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false);

        if !sent {
            if let Err(e) = child.start_kill() {
                log::debug!("Kill of pid {} failed: {}", pid, e);
            }
        }
    }
}

impl BrowserSession for ChromeSession {
    fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(|child| child.id())
    }

    async fn shutdown(&mut self) {
        if let Some(mut child) = self.child.take() {
            Self::terminate(&mut child).await;

            match tokio::time::timeout(self.shutdown_timeout, child.wait()).await {
                Ok(Ok(status)) => log::info!("Chrome closed ({})", status),
                Ok(Err(e)) => log::warn!("Failed waiting for Chrome: {}", e),
                Err(_) => {
                    log::warn!(
                        "Chrome did not exit within {:?}, killing",
                        self.shutdown_timeout
                    );
                    if let Err(e) = child.kill().await {
                        log::warn!("Failed to kill Chrome: {}", e);
                    }
                }
            }
        }

        if let Some(profile_dir) = self.profile_dir.take() {
            match tokio::fs::remove_dir_all(&profile_dir).await {
                Ok(()) => log::info!("Temp directory removed"),
                Err(e) => log::debug!(
                    "Ignoring failure to remove {}: {}",
                    profile_dir.display(),
                    e
                ),
            }
        }
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        // Only reached when shutdown() never ran
        if let Some(child) = self.child.as_mut() {
            let _ = child.start_kill();
        }
        if let Some(profile_dir) = &self.profile_dir {
            if profile_dir.exists() {
                let _ = std::fs::remove_dir_all(profile_dir);
            }
        }
    }
}
