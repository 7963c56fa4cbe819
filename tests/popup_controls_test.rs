//! Optional popup control checks and form field reads


use fake_desktop::{test_config, FakeDesktop, FakeLauncher, Reply, ScriptKind};
use popup_smoke::popup::{controls, navigate_extensions_menu, verify_popup_content};
use popup_smoke::{Harness, NavigationOutcome};
use tempfile::TempDir;

#[tokio::test(start_paused = true)]
async fn test_fill_button_check_is_informational_by_default() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.controls.check_fill_button = true;
    let mut desktop = FakeDesktop::popup_opens();
    desktop.fill_button = false;
    let launcher = FakeLauncher::default();

    let outcome = Harness::new(&config, &desktop, &launcher).run().await;

    assert!(outcome.passed);
    assert_eq!(outcome.control_checks.len(), 1);
    assert!(!outcome.control_checks[0].passed);
}

#[tokio::test(start_paused = true)]
async fn test_required_fill_button_fails_run() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.controls.require_fill_button = true;
    let mut desktop = FakeDesktop::popup_opens();
    desktop.fill_button = false;
    let launcher = FakeLauncher::default();

    let outcome = Harness::new(&config, &desktop, &launcher).run().await;

    assert!(!outcome.passed);
    assert_eq!(launcher.shutdown_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_click_fill_button_then_read_fields() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.controls.click_fill_button = true;
    config.controls.read_fields = vec!["email".to_string(), "phone".to_string()];
    let mut desktop = FakeDesktop::popup_opens();
    desktop
        .fields
        .insert("email".to_string(), "ada@example.com".to_string());
    let launcher = FakeLauncher::default();

    let outcome = Harness::new(&config, &desktop, &launcher).run().await;

    assert!(outcome.passed);
    assert_eq!(desktop.script_count(ScriptKind::ButtonExists), 1);
    assert_eq!(desktop.script_count(ScriptKind::ClickButton), 1);
    assert!(outcome.control_checks.iter().all(|check| check.passed));

    assert_eq!(outcome.fields.len(), 2);
    assert_eq!(outcome.fields[0].field_id, "email");
    assert_eq!(outcome.fields[0].value.as_deref(), Some("ada@example.com"));
    assert_eq!(outcome.fields[1].value, None);
}

#[tokio::test(start_paused = true)]
async fn test_empty_state_capture_adds_screenshot() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.controls.capture_empty_state = true;
    let desktop = FakeDesktop::popup_opens();
    let launcher = FakeLauncher::default();

    let outcome = Harness::new(&config, &desktop, &launcher).run().await;

    assert!(outcome.passed);
    let last = outcome.screenshots.last().expect("screenshot");
    assert!(last
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("extension-test-empty-vault-"));
}

#[tokio::test]
async fn test_read_missing_field_is_none() {
    let desktop = FakeDesktop::popup_opens();
    // No fields configured: fake answers FIELD_NOT_FOUND
    let reading = controls::read_form_field(&desktop, "Google Chrome", "missing").await;
    assert_eq!(reading.value, None);
}

#[tokio::test(start_paused = true)]
async fn test_navigator_reports_listing_failure() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let mut desktop = FakeDesktop::menu_opens();
    desktop.descriptions = Reply::ScriptError("Can't get front window".to_string());

    let outcome = navigate_extensions_menu(&desktop, &config).await;

    assert_eq!(
        outcome,
        NavigationOutcome::Failed {
            reason: "Can't get front window".to_string()
        }
    );
    assert_eq!(desktop.script_count(ScriptKind::ClickElement), 0);
}

#[tokio::test(start_paused = true)]
async fn test_navigator_rejected_click_fails() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let mut desktop = FakeDesktop::menu_opens();
    desktop.click_element = Reply::text("Error: UI element 2 is not clickable");

    let outcome = navigate_extensions_menu(&desktop, &config).await;

    assert!(!outcome.is_activated());
    assert_eq!(desktop.script_count(ScriptKind::ClickElement), 1);
}

#[tokio::test]
async fn test_verifier_unavailable_osascript() {
    let mut desktop = FakeDesktop::popup_opens();
    desktop.popup_text = Reply::Unavailable;

    let report = verify_popup_content(&desktop, "Google Chrome", "Asterisk").await;

    assert!(!report.passed());
    assert!(report
        .query_error
        .as_deref()
        .unwrap()
        .contains("osascript"));
}
