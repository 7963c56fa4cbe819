//! Buttons inside the popup and form fields on the test page

use crate::automation::{applescript, Automation};
use serde::Serialize;
use std::time::Duration;

/// Value read from a form field on the test page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReading {
    pub field_id: String,
    pub value: Option<String>,
}

pub async fn button_exists<A: Automation>(automation: &A, app_name: &str, label: &str) -> bool {
    log::info!("Checking for button '{}'...", label);

    let exists = match automation
        .run_applescript(&applescript::button_exists(app_name, label))
        .await
    {
        Ok(output) => output.is_true(),
        Err(e) => {
            log::warn!("Button query failed: {}", e);
            false
        }
    };

    if exists {
        log::info!("   Button '{}' exists", label);
    } else {
        log::warn!("   Button '{}' not found", label);
    }
    exists
}

/// Click a button by label, pausing for `settle` after a successful click.
pub async fn click_button<A: Automation>(
    automation: &A,
    app_name: &str,
    label: &str,
    settle: Duration,
) -> bool {
    log::info!("Clicking element: {}", label);

    match automation
        .run_applescript(&applescript::click_button(app_name, label))
        .await
    {
        Ok(output) if output.is_true() => {
            log::info!("   Click successful");
            crate::poll::settle(settle).await;
            true
        }
        Ok(output) => {
            log::warn!("   Click may have failed: {}", output.error_text());
            false
        }
        Err(e) => {
            log::warn!("   Click failed: {}", e);
            false
        }
    }
}

/// Read a form field's value, `None` if the field is missing or unreadable.
pub async fn read_form_field<A: Automation>(
    automation: &A,
    app_name: &str,
    field_id: &str,
) -> FieldReading {
    log::info!("Reading form field: {}", field_id);

    let value = match automation
        .run_applescript(&applescript::read_form_field(app_name, field_id))
        .await
    {
        Ok(output) if !output.success => {
            log::error!("   Error reading field: {}", output.error_text());
            None
        }
        Ok(output) => {
            let value = output.stdout.trim();
            if value.contains(applescript::FIELD_NOT_FOUND) {
                log::warn!("   Field '{}' not found", field_id);
                None
            } else if value.contains(applescript::FIELD_READ_ERROR) {
                log::error!("   Error reading field: {}", value);
                None
            } else {
                log::info!("   Value: {}", value);
                Some(value.to_string())
            }
        }
        Err(e) => {
            log::error!("   Error reading field: {}", e);
            None
        }
    };

    FieldReading {
        field_id: field_id.to_string(),
        value,
    }
}
