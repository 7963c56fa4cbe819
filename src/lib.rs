pub mod automation;
pub mod browser;
pub mod calibration;
pub mod config;
pub mod error;
pub mod harness;
pub mod poll;
pub mod popup;
pub mod prerequisites;
pub mod screenshot;

//  Re-export commonly used items
pub use automation::{Automation, MacAutomation, ScriptOutput};
pub use browser::{BrowserLauncher, BrowserSession, ChromeLauncher, ChromeSession};
pub use calibration::{
    locate_icon, Calibration, IconPosition, IconSource, LocatedIcon, FALLBACK_ICON_POSITION,
};
pub use config::{ControlChecks, HarnessConfig, Timings};
pub use error::{Result, SmokeError};
pub use harness::{ctrl_c_interrupt, Harness, Stage, TestOutcome};
pub use popup::{
    classify_front_window, find_matching_element, CheckResult, NavigationOutcome, PopupState,
    VerificationReport,
};
