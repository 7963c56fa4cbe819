//! Decide what a click on the toolbar opened.
//!
//! The only signal available is the front window title: an extension popup
//! carries the product name, Chrome's extensions menu does not. This is a
//! heuristic and may misclassify if the popup title changes.

use crate::automation::{applescript, Automation, ScriptOutput};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupState {
    /// Front window title names the product
    PopupOpened,
    /// Some other surface is in front, usually the extensions menu
    MenuOpened,
    /// The title could not be queried at all
    Unknown,
}

impl PopupState {
    pub fn is_popup(self) -> bool {
        self == PopupState::PopupOpened
    }
}

/// Classify the output of the front-window title probe.
///
/// The title match ignores case, like AppleScript's `contains`. An empty
/// product name never matches. A script that ran but failed (no front window,
/// no accessibility access) counts as `MenuOpened`; only a probe that could
/// not run is `Unknown`.
pub fn classify_front_window<E>(
    probe: &std::result::Result<ScriptOutput, E>,
    product_name: &str,
) -> PopupState {
    match probe {
        Ok(output) if output.success && title_names_product(&output.stdout, product_name) => {
            PopupState::PopupOpened
        }
        Ok(_) => PopupState::MenuOpened,
        Err(_) => PopupState::Unknown,
    }
}

fn title_names_product(title: &str, product_name: &str) -> bool {
    let product = product_name.trim().to_lowercase();
    !product.is_empty() && title.to_lowercase().contains(&product)
}

/// Query the front window title and classify it.
pub async fn detect_popup<A: Automation>(
    automation: &A,
    app_name: &str,
    product_name: &str,
) -> PopupState {
    let probe = automation
        .run_applescript(&applescript::front_window_title(app_name))
        .await;

    if let Err(e) = &probe {
        log::warn!("Could not query front window: {}", e);
    }

    classify_front_window(&probe, product_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmokeError;

    fn probe(output: ScriptOutput) -> Result<ScriptOutput, SmokeError> {
        Ok(output)
    }

    #[test]
    fn test_title_with_product_is_popup() {
        let state = classify_front_window(&probe(ScriptOutput::ok("Asterisk - Autofill")), "Asterisk");
        assert_eq!(state, PopupState::PopupOpened);
        assert!(state.is_popup());
    }

    #[test]
    fn test_other_title_is_menu() {
        let state = classify_front_window(&probe(ScriptOutput::ok("Test LLM Form")), "Asterisk");
        assert_eq!(state, PopupState::MenuOpened);
    }

    #[test]
    fn test_empty_title_is_menu() {
        assert_eq!(
            classify_front_window(&probe(ScriptOutput::ok("")), "Asterisk"),
            PopupState::MenuOpened
        );
    }

    #[test]
    fn test_script_error_is_menu() {
        // Even if the error text happens to mention the product
        let output = ScriptOutput {
            success: false,
            stdout: "Asterisk".to_string(),
            stderr: "execution error: Can't get front window (-1719)".to_string(),
        };
        assert_eq!(
            classify_front_window(&probe(output), "Asterisk"),
            PopupState::MenuOpened
        );
    }

    #[test]
    fn test_unrunnable_probe_is_unknown() {
        let probe: Result<ScriptOutput, SmokeError> = Err(SmokeError::ToolUnavailable {
            tool: "osascript".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert_eq!(
            classify_front_window(&probe, "Asterisk"),
            PopupState::Unknown
        );
    }

    #[test]
    fn test_title_match_ignores_case() {
        assert_eq!(
            classify_front_window(&probe(ScriptOutput::ok("asterisk")), "Asterisk"),
            PopupState::PopupOpened
        );
        assert_eq!(
            classify_front_window(&probe(ScriptOutput::ok("ASTERISK - Vault")), "Asterisk"),
            PopupState::PopupOpened
        );
    }

    #[test]
    fn test_empty_product_name_never_matches() {
        assert_eq!(
            classify_front_window(&probe(ScriptOutput::ok("Asterisk")), ""),
            PopupState::MenuOpened
        );
        assert_eq!(
            classify_front_window(&probe(ScriptOutput::ok("Asterisk")), "  "),
            PopupState::MenuOpened
        );
    }
}
