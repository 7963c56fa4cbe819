//! Run configuration
//!
//! Every path, name and wait used by a smoke run. `HarnessConfig::default()`
//! reproduces the zero-flag invocation; the binary overlays CLI flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// System-wide Chrome install on macOS
pub const DEFAULT_CHROME_PATH: &str = "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";

/// Page opened in the launched browser
pub const DEFAULT_TEST_URL: &str = "http://127.0.0.1:8765/test-llm-form.html";

/// Name the popup, its window title and its menu entry are matched against
pub const DEFAULT_PRODUCT_NAME: &str = "Asterisk";

/// Process / application name used in AppleScript `tell` blocks
pub const DEFAULT_APP_NAME: &str = "Google Chrome";

pub const DEFAULT_FILL_BUTTON_LABEL: &str = "Fill All Matched Fields";

const CHROME_APP_SUFFIX: &str = "Applications/Google Chrome.app/Contents/MacOS/Google Chrome";

/// Waits and timeouts between automation steps
#[derive(Debug, Clone)]
pub struct Timings {
    /// How long to wait for Chrome to show a window after spawning
    pub launch: Duration,
    /// How long to wait for the popup title after clicking the icon
    pub popup_open: Duration,
    /// Interval between readiness probes
    pub poll_interval: Duration,
    /// Pause after typing into the extensions menu
    pub after_keystroke: Duration,
    /// Pause after activating a window or a menu entry
    pub after_activation: Duration,
    /// Pause after clicking a button inside the popup
    pub after_button_click: Duration,
    /// Bounded wait for Chrome to exit during cleanup
    pub shutdown: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            launch: Duration::from_secs(5),
            popup_open: Duration::from_secs(3),
            poll_interval: Duration::from_millis(250),
            after_keystroke: Duration::from_millis(500),
            after_activation: Duration::from_secs(2),
            after_button_click: Duration::from_secs(1),
            shutdown: Duration::from_secs(5),
        }
    }
}

/// Optional checks on controls inside the popup
#[derive(Debug, Clone)]
pub struct ControlChecks {
    pub check_fill_button: bool,
    pub click_fill_button: bool,
    /// Count a missing fill button as a failed run
    pub require_fill_button: bool,
    pub fill_button_label: String,
    /// Form field ids to read from the page after the popup checks
    pub read_fields: Vec<String>,
    /// Capture an `empty-vault` screenshot for manual review
    pub capture_empty_state: bool,
}

impl Default for ControlChecks {
    fn default() -> Self {
        Self {
            check_fill_button: false,
            click_fill_button: false,
            require_fill_button: false,
            fill_button_label: DEFAULT_FILL_BUTTON_LABEL.to_string(),
            read_fields: Vec::new(),
            capture_empty_state: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub chrome_path: PathBuf,
    pub extension_path: PathBuf,
    /// `None` skips calibration entirely and uses the fallback position
    pub calibration_file: Option<PathBuf>,
    pub test_url: String,
    pub product_name: String,
    pub app_name: String,
    pub screenshot_dir: PathBuf,
    pub timings: Timings,
    pub controls: ControlChecks,
}

impl HarnessConfig {
    /// Default layout relative to a project checkout
    pub fn for_project_root(root: &Path) -> Self {
        Self {
            chrome_path: default_chrome_path(),
            extension_path: root.join("apps").join("extension").join("dist"),
            calibration_file: Some(
                root.join("apps")
                    .join("qa")
                    .join("scripts")
                    .join(".extension-coords"),
            ),
            test_url: DEFAULT_TEST_URL.to_string(),
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            screenshot_dir: PathBuf::from("/tmp"),
            timings: Timings::default(),
            controls: ControlChecks::default(),
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::for_project_root(&project_root())
    }
}

/// `PROJECT_ROOT` if set, otherwise the current directory
pub fn project_root() -> PathBuf {
    std::env::var_os("PROJECT_ROOT")
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// System Chrome, or a per-user install under `~/Applications` when only that exists
pub fn default_chrome_path() -> PathBuf {
    let system = PathBuf::from(DEFAULT_CHROME_PATH);
    if system.exists() {
        return system;
    }

    if let Some(user_install) = dirs::home_dir().map(|home| home.join(CHROME_APP_SUFFIX)) {
        if user_install.exists() {
            return user_install;
        }
    }

    system
}
