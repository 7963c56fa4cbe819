//! End-to-end popup smoke run
//!
//! ```text
//! Idle -> PrerequisitesChecked -> Launched -> IconLocated -> Clicked
//!      -> { Verified | MenuFallback -> Verified | Failed } -> CleanedUp
//! ```
//!
//! Every path ends in `CleanedUp`: once a browser session exists it is shut
//! down exactly once, whether the run passed, failed, errored or was
//! interrupted. Everything the run observed is returned in a [`TestOutcome`].

use crate::automation::{applescript, Automation};
use crate::browser::{BrowserLauncher, BrowserSession};
use crate::calibration::{locate_icon, IconPosition, LocatedIcon};
use crate::config::HarnessConfig;
use crate::error::{Result, SmokeError};
use crate::popup::controls::{self, FieldReading};
use crate::popup::{self, CheckResult, NavigationOutcome, PopupState, VerificationReport};
use crate::prerequisites::check_prerequisites;
use crate::{poll, screenshot};
use serde::Serialize;
use std::future::Future;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    PrerequisitesChecked,
    Launched,
    IconLocated,
    Clicked,
    MenuFallback,
    Verified,
    Failed,
    CleanedUp,
}

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    pub passed: bool,
    /// Stages in the order they were reached, starting at `Idle`
    pub stages: Vec<Stage>,
    pub screenshots: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<LocatedIcon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_state: Option<PopupState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<NavigationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub control_checks: Vec<CheckResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    /// ISO 8601
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

impl TestOutcome {
    fn new() -> Self {
        Self {
            passed: false,
            stages: vec![Stage::Idle],
            screenshots: Vec::new(),
            icon: None,
            popup_state: None,
            fallback: None,
            verification: None,
            control_checks: Vec::new(),
            fields: Vec::new(),
            failure: None,
            started_at: chrono::Utc::now().to_rfc3339(),
            finished_at: None,
        }
    }

    fn advance(&mut self, stage: Stage) {
        log::debug!("Stage: {:?}", stage);
        self.stages.push(stage);
    }

    /// Most recent stage
    pub fn stage(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Idle)
    }

    pub fn reached(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    pub fn icon_position(&self) -> Option<IconPosition> {
        self.icon.as_ref().map(|icon| icon.position)
    }

    fn fail(&mut self, error: &SmokeError) {
        self.passed = false;
        self.failure = Some(error.to_string());
        if self.stage() != Stage::Failed {
            self.advance(Stage::Failed);
        }
    }

    fn finish(&mut self) {
        self.advance(Stage::CleanedUp);
        self.finished_at = Some(chrono::Utc::now().to_rfc3339());
    }
}

/// Resolves on the first Ctrl-C.
///
/// The SIGINT handler is installed when this is called, not when the future
/// is first polled, so a Ctrl-C during prerequisite checks or browser launch
/// is held for [`Harness::run_until`] instead of killing the process.
pub fn ctrl_c_interrupt() -> impl Future<Output = ()> {
    #[cfg(unix)]
    let listener = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt());

    async move {
        #[cfg(unix)]
        match listener {
            Ok(mut signal) => {
                if signal.recv().await.is_some() {
                    return;
                }
            }
            Err(e) => log::warn!("Ctrl-C handling unavailable: {}", e),
        }

        #[cfg(not(unix))]
        match tokio::signal::ctrl_c().await {
            Ok(()) => return,
            Err(e) => log::warn!("Ctrl-C handling unavailable: {}", e),
        }

        std::future::pending::<()>().await
    }
}

pub struct Harness<'a, A, L> {
    config: &'a HarnessConfig,
    automation: &'a A,
    launcher: &'a L,
}

impl<'a, A, L> Harness<'a, A, L>
where
    A: Automation,
    L: BrowserLauncher,
{
    pub fn new(config: &'a HarnessConfig, automation: &'a A, launcher: &'a L) -> Self {
        Self {
            config,
            automation,
            launcher,
        }
    }

    /// Run to completion with no interrupt source
    pub async fn run(&self) -> TestOutcome {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run until done or until `interrupt` resolves, then clean up.
    pub async fn run_until<I>(&self, interrupt: I) -> TestOutcome
    where
        I: Future<Output = ()>,
    {
        let mut outcome = TestOutcome::new();
        tokio::pin!(interrupt);

        let prerequisites = tokio::select! {
            biased;
            _ = &mut interrupt => Err(SmokeError::Interrupted),
            result = check_prerequisites(self.config, self.automation) => result,
        };
        if let Err(e) = prerequisites {
            log::error!("{}", e);
            outcome.fail(&e);
            outcome.finish();
            return outcome;
        }
        outcome.advance(Stage::PrerequisitesChecked);

        let mut session = match self.launcher.launch(self.config).await {
            Ok(session) => session,
            Err(e) => {
                log::error!("{}", e);
                outcome.fail(&e);
                outcome.finish();
                return outcome;
            }
        };

        // An interrupt that arrived during launch is seen here, after the
        // session exists, so it still gets shut down.
        let result = tokio::select! {
            biased;
            _ = &mut interrupt => Err(SmokeError::Interrupted),
            result = self.drive(&mut outcome) => result,
        };

        if let Err(e) = result {
            match &e {
                SmokeError::Interrupted => log::warn!("Test interrupted by user"),
                other => {
                    log::error!("Test failed with error: {}", other);
                    log::debug!("{:?}", other);
                }
            }
            outcome.fail(&e);
        }

        log::info!("Cleaning up...");
        session.shutdown().await;
        outcome.finish();
        outcome
    }

    async fn drive(&self, outcome: &mut TestOutcome) -> Result<()> {
        self.wait_for_browser().await?;
        outcome.advance(Stage::Launched);

        let icon = locate_icon(self.config.calibration_file.as_deref());
        let position = icon.position;
        outcome.icon = Some(icon);
        outcome.advance(Stage::IconLocated);

        log::info!("Clicking extension icon at {}...", position);
        self.automation.click(position).await?;
        outcome.advance(Stage::Clicked);

        let state = self.await_popup().await;
        outcome.popup_state = Some(state);

        if state.is_popup() {
            log::info!("Popup is open");
        } else {
            log::info!("Extensions menu opened (extension not pinned), trying fallback...");
            outcome.advance(Stage::MenuFallback);
            self.capture(outcome, "menu-check").await;
            let navigation = popup::navigate_extensions_menu(self.automation, self.config).await;
            outcome.fallback = Some(navigation);
        }

        self.capture(outcome, "popup-open").await;

        let report = popup::verify_popup_content(
            self.automation,
            &self.config.app_name,
            &self.config.product_name,
        )
        .await;
        let mut passed = report.passed();
        outcome.verification = Some(report);

        passed &= self.run_control_checks(outcome).await;

        if self.config.controls.capture_empty_state {
            self.capture_empty_state(outcome).await;
        }

        outcome.passed = passed;
        outcome.advance(if passed { Stage::Verified } else { Stage::Failed });
        Ok(())
    }

    /// Wait for Chrome to show a window, then bring it to the front.
    async fn wait_for_browser(&self) -> Result<()> {
        log::info!("Waiting for Chrome to load...");
        let timings = &self.config.timings;
        let automation = self.automation;
        let count_script = applescript::window_count(&self.config.app_name);
        let count_script = count_script.as_str();

        let polled = poll::poll_until(
            timings.launch,
            timings.poll_interval,
            || async move {
                automation
                    .run_applescript(count_script)
                    .await
                    .ok()
                    .filter(|output| output.success)
                    .and_then(|output| output.stdout.trim().parse::<u32>().ok())
                    .unwrap_or(0)
            },
            |windows| *windows > 0,
        )
        .await;

        if !polled.satisfied {
            log::warn!(
                "Chrome showed no window within {:?}, continuing anyway",
                timings.launch
            );
        }

        let activated = self
            .automation
            .run_applescript(&applescript::activate(&self.config.app_name))
            .await?;
        if !activated.success {
            log::warn!("Could not activate Chrome: {}", activated.error_text());
        }
        poll::settle(timings.after_activation).await;

        log::info!("Chrome launched and activated");
        Ok(())
    }

    /// Poll the classifier until the popup shows or the wait runs out.
    async fn await_popup(&self) -> PopupState {
        log::info!("Waiting for popup to open...");
        let timings = &self.config.timings;
        let automation = self.automation;
        let app = self.config.app_name.as_str();
        let product = self.config.product_name.as_str();

        let polled = poll::poll_until(
            timings.popup_open,
            timings.poll_interval,
            || popup::detect_popup(automation, app, product),
            |state| state.is_popup(),
        )
        .await;

        polled.value
    }

    async fn capture(&self, outcome: &mut TestOutcome, name: &str) {
        if let Some(path) =
            screenshot::capture(self.automation, &self.config.screenshot_dir, name).await
        {
            outcome.screenshots.push(path);
        }
    }

    /// Optional popup control checks; false only when a required check failed
    async fn run_control_checks(&self, outcome: &mut TestOutcome) -> bool {
        let checks = &self.config.controls;
        let app = self.config.app_name.as_str();
        let label = checks.fill_button_label.as_str();
        let mut passed = true;

        if checks.check_fill_button || checks.require_fill_button || checks.click_fill_button {
            let exists = controls::button_exists(self.automation, app, label).await;
            outcome
                .control_checks
                .push(CheckResult::new(format!("Button '{}' exists", label), exists));
            if checks.require_fill_button && !exists {
                passed = false;
            }

            if checks.click_fill_button && exists {
                let clicked = controls::click_button(
                    self.automation,
                    app,
                    label,
                    self.config.timings.after_button_click,
                )
                .await;
                outcome
                    .control_checks
                    .push(CheckResult::new(format!("Clicked '{}'", label), clicked));
                if checks.require_fill_button && !clicked {
                    passed = false;
                }
            }
        }

        for field_id in &checks.read_fields {
            let reading = controls::read_form_field(self.automation, app, field_id).await;
            outcome.fields.push(reading);
        }

        passed
    }

    async fn capture_empty_state(&self, outcome: &mut TestOutcome) {
        log::info!("Capturing empty vault state...");
        let before = outcome.screenshots.len();
        self.capture(outcome, "empty-vault").await;

        log::info!("Manual verification needed:");
        log::info!("   - Check screenshot for empty state message");
        log::info!("   - Verify no crashes or errors");
        if let Some(path) = outcome.screenshots.get(before) {
            log::info!("   - Screenshot: {}", path.display());
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_ctrl_c_is_caught_before_first_poll() {
        let interrupt = ctrl_c_interrupt();

        // Deliver SIGINT before the future has been polled even once
        let pid = std::process::id().to_string();
        let status = tokio::process::Command::new("kill")
            .args(["-INT", pid.as_str()])
            .status()
            .await
            .expect("run kill");
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), interrupt)
            .await
            .expect("interrupt should resolve");
    }
}
