//! BrowserManager core: connect, chrome management, page lifecycle.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{BrowserError, BrowserManagerConfig};
use crate::cdp::{CdpClient, PageSession};

const LAUNCH_POLL: Duration = Duration::from_millis(200);
const LAUNCH_ATTEMPTS: u32 = 30;

/// Manages the browser process and its CDP connection.
pub struct BrowserManager {
    config: BrowserManagerConfig,
    client: RwLock<Option<Arc<CdpClient>>>,
    /// Chrome process handle (if we launched it).
    chrome_process: RwLock<Option<Child>>,
}

impl BrowserManager {
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            chrome_process: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &BrowserManagerConfig {
        &self.config
    }

    /// Find Chrome executable path in the usual install locations.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Configured binary if it exists, otherwise a discovered one.
    pub fn resolve_chrome(&self) -> Option<PathBuf> {
        match &self.config.chrome_path {
            Some(path) if path.exists() => Some(path.clone()),
            Some(path) => {
                warn!("Configured Chrome path {} does not exist", path.display());
                Self::find_chrome()
            }
            None => Self::find_chrome(),
        }
    }

    /// Check if Chrome is already running on the debug port.
    async fn is_chrome_running(&self) -> bool {
        reqwest::get(&format!("{}/json/version", self.config.endpoint()))
            .await
            .is_ok()
    }

    /// Launch Chrome with remote debugging enabled.
    async fn launch_chrome(&self) -> Result<Child, BrowserError> {
        let chrome_path = self.resolve_chrome().ok_or(BrowserError::ChromeNotFound)?;
        let profile_dir = self.config.get_profile_dir();

        if let Err(e) = std::fs::create_dir_all(&profile_dir) {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let mut cmd = Command::new(&chrome_path);
        cmd.args(Self::launch_args(&self.config))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }

    pub(super) fn launch_args(config: &BrowserManagerConfig) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", config.debug_port),
            format!("--user-data-dir={}", config.get_profile_dir().display()),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
        ];
        if config.headless {
            args.push("--headless=new".to_string());
        }
        args
    }

    /// Connect to the browser, launching it if necessary.
    pub async fn connect(&self) -> Result<(), BrowserError> {
        if self.client.read().await.is_some() {
            return Ok(());
        }

        if !self.is_chrome_running().await {
            info!(
                "Chrome not running on port {}, launching...",
                self.config.debug_port
            );

            let child = self.launch_chrome().await?;
            *self.chrome_process.write().await = Some(child);

            let mut ready = false;
            for _ in 0..LAUNCH_ATTEMPTS {
                tokio::time::sleep(LAUNCH_POLL).await;
                if self.is_chrome_running().await {
                    ready = true;
                    break;
                }
            }

            if !ready {
                return Err(BrowserError::LaunchFailed(
                    "Chrome failed to start within timeout".to_string(),
                ));
            }
        } else {
            info!(
                "Chrome already running on port {}; headless setting ignored",
                self.config.debug_port
            );
        }

        let client = CdpClient::connect(&self.config.endpoint()).await?;
        *self.client.write().await = Some(Arc::new(client));

        info!("Connected to Chrome at {}", self.config.endpoint());
        Ok(())
    }

    async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotConnected)
    }

    /// Open a new tab on `url` and wait until it has loaded.
    pub async fn open_page(&self, url: &str, timeout: Duration) -> Result<PageSession, BrowserError> {
        self.connect().await?;
        let client = self.client().await?;
        let page = client.new_page(Some(url)).await?;
        page.wait_for_load(timeout).await?;
        info!("Opened {} in page {}", url, page.target_id());
        Ok(page)
    }

    pub async fn close_page(&self, target_id: &str) -> Result<(), BrowserError> {
        let client = self.client().await?;
        client.close_page(target_id).await?;
        Ok(())
    }

    /// Close the browser connection.
    pub async fn close(&self) -> Result<(), BrowserError> {
        if let Some(client) = self.client.write().await.take() {
            client.disconnect().await;
            info!("Browser connection closed");
        }
        Ok(())
    }

    /// Close the connection and kill Chrome if we launched it.
    pub async fn shutdown_chrome(&self) -> Result<(), BrowserError> {
        self.close().await?;
        if let Some(mut child) = self.chrome_process.write().await.take() {
            info!("Shutting down Chrome...");
            let _ = child.kill().await;
        }
        Ok(())
    }
}
