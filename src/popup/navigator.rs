//! Extensions-menu fallback
//!
//! When the extension is not pinned, clicking its estimated toolbar position
//! opens Chrome's extensions menu instead of the popup. The fallback makes a
//! single attempt to find the extension in that menu by accessible
//! description and click it. It never retries.

use crate::automation::{applescript, Automation};
use crate::config::HarnessConfig;
use crate::poll;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum NavigationOutcome {
    /// Clicked the element at `index` (0-based) whose description matched
    Activated { index: usize, description: String },
    /// No element description contained the target name
    NotFound,
    /// The menu could not be inspected or the click was rejected
    Failed { reason: String },
}

impl NavigationOutcome {
    pub fn is_activated(&self) -> bool {
        matches!(self, NavigationOutcome::Activated { .. })
    }
}

/// Index of the first description containing `target`, ignoring case.
pub fn find_matching_element<S: AsRef<str>>(descriptions: &[S], target: &str) -> Option<usize> {
    let target = target.to_lowercase();
    if target.is_empty() {
        return None;
    }
    descriptions
        .iter()
        .position(|description| description.as_ref().to_lowercase().contains(&target))
}

/// Try once to open the popup from the extensions menu.
pub async fn navigate_extensions_menu<A: Automation>(
    automation: &A,
    config: &HarnessConfig,
) -> NavigationOutcome {
    let target = config.product_name.as_str();
    log::info!("Looking for '{}' in extensions menu...", target);

    // Typing the first letter moves the menu's keyboard focus toward the entry
    if let Some(initial) = target.chars().next() {
        let initial = initial.to_lowercase().to_string();
        if let Err(e) = automation.type_text(&initial).await {
            log::debug!("Menu keystroke failed: {}", e);
        }
        poll::settle(config.timings.after_keystroke).await;
    }

    let outcome = activate_matching_element(automation, &config.app_name, target).await;

    match &outcome {
        NavigationOutcome::Activated { index, description } => {
            log::info!(
                "Found and clicked '{}' in menu (element {})",
                description,
                index + 1
            );
            poll::settle(config.timings.after_activation).await;
        }
        NavigationOutcome::NotFound => {
            log::warn!("Could not find '{}' in menu", target);
            log_pin_suggestion();
        }
        NavigationOutcome::Failed { reason } => {
            log::warn!("Extensions menu navigation failed: {}", reason);
            log_pin_suggestion();
        }
    }

    outcome
}

async fn activate_matching_element<A: Automation>(
    automation: &A,
    app_name: &str,
    target: &str,
) -> NavigationOutcome {
    let listing = match automation
        .run_applescript(&applescript::element_descriptions(app_name))
        .await
    {
        Ok(output) if output.success => output,
        Ok(output) => {
            return NavigationOutcome::Failed {
                reason: output.error_text().to_string(),
            }
        }
        Err(e) => {
            return NavigationOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    let descriptions = applescript::split_records(&listing.stdout);
    log::debug!("Front window element descriptions: {:?}", descriptions);

    let Some(index) = find_matching_element(&descriptions, target) else {
        return NavigationOutcome::NotFound;
    };

    // AppleScript element indices are 1-based
    match automation
        .run_applescript(&applescript::click_element(app_name, index + 1))
        .await
    {
        Ok(output) if output.is_true() => NavigationOutcome::Activated {
            index,
            description: descriptions[index].clone(),
        },
        Ok(output) => NavigationOutcome::Failed {
            reason: output.error_text().to_string(),
        },
        Err(e) => NavigationOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

fn log_pin_suggestion() {
    log::warn!("Suggestion: pin the extension to the toolbar");
    log::warn!("   Run: cd apps/qa/scripts && ./pin-extension.sh");
}
