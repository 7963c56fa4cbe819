use anyhow::Context;
use clap::Parser;
use popup_smoke::{
    ctrl_c_interrupt, ChromeLauncher, Harness, HarnessConfig, MacAutomation, TestOutcome,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// Smoke-test a Chrome extension popup through macOS UI automation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chrome executable
    #[arg(long)]
    chrome_path: Option<PathBuf>,

    /// Unpacked extension build directory
    #[arg(long)]
    extension_path: Option<PathBuf>,

    /// KEY=VALUE file with EXTENSION_ICON_X / EXTENSION_ICON_Y
    #[arg(long)]
    calibration_file: Option<PathBuf>,

    /// Page to open in the test browser
    #[arg(long)]
    url: Option<String>,

    /// Name expected in the popup title and extensions menu
    #[arg(long)]
    product_name: Option<String>,

    /// Where screenshots are written
    #[arg(long)]
    screenshot_dir: Option<PathBuf>,

    /// Write the run outcome as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// How long to wait for Chrome's first window
    #[arg(long)]
    launch_timeout_ms: Option<u64>,

    /// How long to wait for the popup after clicking
    #[arg(long)]
    popup_timeout_ms: Option<u64>,

    /// Check that the fill button exists in the popup
    #[arg(long)]
    check_fill_button: bool,

    /// Click the fill button if it exists
    #[arg(long)]
    click_fill_button: bool,

    /// Fail the run when the fill button is missing
    #[arg(long)]
    require_fill_button: bool,

    /// Read a form field value from the test page (repeatable)
    #[arg(long = "read-field", value_name = "ID")]
    read_fields: Vec<String>,

    /// Capture an extra screenshot of the popup's empty state
    #[arg(long)]
    capture_empty_state: bool,
}

impl Args {
    fn into_config(self) -> HarnessConfig {
        let mut config = HarnessConfig::default();

        if let Some(path) = self.chrome_path {
            config.chrome_path = path;
        }
        if let Some(path) = self.extension_path {
            config.extension_path = path;
        }
        if let Some(path) = self.calibration_file {
            config.calibration_file = Some(path);
        }
        if let Some(url) = self.url {
            config.test_url = url;
        }
        if let Some(name) = self.product_name {
            config.product_name = name;
        }
        if let Some(dir) = self.screenshot_dir {
            config.screenshot_dir = dir;
        }
        if let Some(ms) = self.launch_timeout_ms {
            config.timings.launch = Duration::from_millis(ms);
        }
        if let Some(ms) = self.popup_timeout_ms {
            config.timings.popup_open = Duration::from_millis(ms);
        }

        config.controls.check_fill_button = self.check_fill_button;
        config.controls.click_fill_button = self.click_fill_button;
        config.controls.require_fill_button = self.require_fill_button;
        config.controls.read_fields = self.read_fields;
        config.controls.capture_empty_state = self.capture_empty_state;

        config
    }
}

fn write_report(outcome: &TestOutcome, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(outcome).context("Failed to serialize outcome")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}

fn print_summary(outcome: &TestOutcome) {
    let rule = "=".repeat(50);
    println!();
    println!("{}", rule);
    if outcome.passed {
        println!("TEST PASSED");
    } else {
        println!("TEST COMPLETED WITH WARNINGS");
        if let Some(failure) = &outcome.failure {
            println!("{}", failure);
        }
    }
    println!("{}", rule);

    if !outcome.screenshots.is_empty() {
        println!();
        println!("Screenshots saved:");
        for path in &outcome.screenshots {
            println!("   {}", path.display());
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let interrupt = ctrl_c_interrupt();
    let mut args = Args::parse();
    let report_path = args.report.take();
    let config = args.into_config();

    log::debug!("Config: {:?}", config);

    let automation = MacAutomation::new();
    let launcher = ChromeLauncher;
    let harness = Harness::new(&config, &automation, &launcher);

    let outcome = harness.run_until(interrupt).await;
    print_summary(&outcome);

    if let Some(path) = report_path {
        match write_report(&outcome, &path) {
            Ok(()) => log::info!("Report written to {}", path.display()),
            Err(e) => log::error!("{:#}", e),
        }
    }

    if outcome.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
