//! Popup content verification through the accessibility tree

use crate::automation::{applescript, Automation};
use serde::Serialize;

/// Outcome of a single named check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, passed: bool) -> Self {
        Self {
            name: name.into(),
            passed,
        }
    }

    pub fn log(&self) {
        if self.passed {
            log::info!("   PASS {}", self.name);
        } else {
            log::warn!("   FAIL {}", self.name);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub checks: Vec<CheckResult>,
    /// Front window title followed by static text values
    pub texts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_error: Option<String>,
}

impl VerificationReport {
    /// Run the checklist against the raw accessibility query output.
    pub fn evaluate(raw_output: &str, product_name: &str) -> Self {
        let texts = applescript::split_records(raw_output);
        let flattened = texts.join(" ").to_lowercase();

        let checks = vec![
            CheckResult::new(
                format!("Has '{}' in title or text", product_name),
                !product_name.is_empty() && flattened.contains(&product_name.to_lowercase()),
            ),
            CheckResult::new(
                "Popup window exists",
                texts.iter().any(|text| !text.trim().is_empty()),
            ),
        ];

        Self {
            checks,
            texts,
            query_error: None,
        }
    }

    pub fn query_failed(error: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            texts: Vec::new(),
            query_error: Some(error.into()),
        }
    }

    /// True only if the query worked and every check passed
    pub fn passed(&self) -> bool {
        self.query_error.is_none()
            && !self.checks.is_empty()
            && self.checks.iter().all(|check| check.passed)
    }
}

/// Query the front window and evaluate the popup checklist.
///
/// Query failures produce a failed report rather than an error.
pub async fn verify_popup_content<A: Automation>(
    automation: &A,
    app_name: &str,
    product_name: &str,
) -> VerificationReport {
    log::info!("Verifying popup content...");

    let report = match automation
        .run_applescript(&applescript::popup_text(app_name))
        .await
    {
        Ok(output) if output.success => {
            log::debug!("Raw output: {:?}", output.stdout);
            VerificationReport::evaluate(&output.stdout, product_name)
        }
        Ok(output) => VerificationReport::query_failed(output.error_text()),
        Err(e) => VerificationReport::query_failed(e.to_string()),
    };

    match &report.query_error {
        Some(error) => log::error!("Failed to verify: {}", error),
        None => {
            log::info!("Verification results:");
            for check in &report.checks {
                check.log();
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_text_passes() {
        let report = VerificationReport::evaluate(
            "Asterisk\u{1e}3 fields matched\u{1e}Fill All Matched Fields\u{1e}",
            "Asterisk",
        );
        assert!(report.passed());
        assert_eq!(report.texts.len(), 3);
    }

    #[test]
    fn test_product_in_static_text_matches_ignoring_case() {
        let report = VerificationReport::evaluate("Extensions\u{1e}asterisk vault\u{1e}", "Asterisk");
        assert!(report.checks[0].passed);
        assert!(report.passed());
    }

    #[test]
    fn test_missing_product_fails_one_check() {
        let report = VerificationReport::evaluate("Test LLM Form\u{1e}", "Asterisk");
        assert!(!report.checks[0].passed);
        assert!(report.checks[1].passed);
        assert!(!report.passed());
    }

    #[test]
    fn test_empty_output_fails_both_checks() {
        let report = VerificationReport::evaluate("", "Asterisk");
        assert!(report.checks.iter().all(|check| !check.passed));
        assert!(!report.passed());
    }

    #[test]
    fn test_query_failure_never_passes() {
        let report = VerificationReport::query_failed("execution error");
        assert!(!report.passed());
        assert_eq!(report.query_error.as_deref(), Some("execution error"));
    }
}
