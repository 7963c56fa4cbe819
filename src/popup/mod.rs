//! Extension popup interaction: click outcome classification, the
//! extensions-menu fallback, content verification and popup controls.

pub mod classifier;
pub mod controls;
pub mod navigator;
pub mod verifier;

pub use classifier::{classify_front_window, detect_popup, PopupState};
pub use navigator::{find_matching_element, navigate_extensions_menu, NavigationOutcome};
pub use verifier::{verify_popup_content, CheckResult, VerificationReport};
