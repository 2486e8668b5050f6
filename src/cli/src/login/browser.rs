//! Opening the wallet in the user's browser.

use crate::errors::LoginError;

/// Opens URLs in a browser.
pub trait BrowserLauncher: Send + Sync {
    /// Opens `url`. Failing is not fatal to the caller.
    fn open(&self, url: &str) -> Result<(), LoginError>;
}

/// The operating system's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), LoginError> {
        open::that(url).map_err(|e| LoginError::BrowserLaunchFailed(e.to_string()))
    }
}
