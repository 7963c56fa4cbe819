pub mod chrome;

pub use chrome::{ChromeLauncher, ChromeSession};

use crate::config::HarnessConfig;
use crate::error::Result;

/// Starts a browser with the extension under test loaded
#[allow(async_fn_in_trait)]
pub trait BrowserLauncher {
    type Session: BrowserSession;

    async fn launch(&self, config: &HarnessConfig) -> Result<Self::Session>;
}

/// A running browser owned by one smoke run
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    fn pid(&self) -> Option<u32>;

    /// Stop the browser and release its profile directory.
    ///
    /// Must be safe to call more than once; later calls do nothing.
    async fn shutdown(&mut self);
}
