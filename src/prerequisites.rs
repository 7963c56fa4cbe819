//! Checks that run before any side effect
//!
//! A missing Chrome, an unbuilt extension or a missing input tool makes the
//! rest of the run meaningless, so these halt early with a remediation hint.

use crate::automation::Automation;
use crate::config::HarnessConfig;
use crate::error::{Result, SmokeError};
use std::path::Path;

async fn exists(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok()
}

pub async fn check_prerequisites<A: Automation>(
    config: &HarnessConfig,
    automation: &A,
) -> Result<()> {
    log::info!("Checking prerequisites...");

    if !exists(&config.chrome_path).await {
        return Err(SmokeError::PrerequisiteMissing {
            what: format!("Chrome not found at {}", config.chrome_path.display()),
            remediation: "Install Chrome (brew install --cask google-chrome) or pass --chrome-path"
                .to_string(),
        });
    }

    if !exists(&config.extension_path).await {
        return Err(SmokeError::PrerequisiteMissing {
            what: format!(
                "Extension not built at {}",
                config.extension_path.display()
            ),
            remediation: "cd apps/extension && pnpm build".to_string(),
        });
    }

    match automation.input_tool_version().await {
        Ok(version) => log::debug!("cliclick {}", version),
        Err(e) => {
            return Err(SmokeError::PrerequisiteMissing {
                what: format!("cliclick is not usable ({})", e),
                remediation: "brew install cliclick".to_string(),
            });
        }
    }

    log::info!("All prerequisites met");
    Ok(())
}
