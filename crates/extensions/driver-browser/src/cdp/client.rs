//! Browser-level CDP connection.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use super::error::CdpError;
use super::protocol::{BrowserVersion, PageInfo};
use super::session::PageSession;
use super::transport::CdpTransport;

/// CDP client for one browser.
///
/// Discovers the browser WebSocket through the HTTP endpoint, then creates and
/// closes pages over that socket.
pub struct CdpClient {
    /// HTTP endpoint for page discovery.
    http_endpoint: String,
    browser_ws_url: String,
    transport: Arc<CdpTransport>,
    _recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given endpoint (e.g. `http://localhost:9222`).
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();

        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let version: BrowserVersion = reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?;

        debug!(
            "Connected to browser: {} (protocol {})",
            version.browser, version.protocol_version
        );

        let browser_ws_url = version.web_socket_debugger_url;
        let (ws_stream, _) = tokio_tungstenite::connect_async(&browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (transport, recv_task) = CdpTransport::start(ws_stream);
        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            http_endpoint,
            browser_ws_url,
            transport,
            _recv_task: recv_task,
        })
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.call(method, params, None).await
    }

    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    /// Open a new tab on `url` and attach a session to it.
    pub async fn new_page(&self, url: Option<&str>) -> Result<PageSession, CdpError> {
        let create_url = match url {
            Some(u) => format!("{}/json/new?{}", self.http_endpoint, url::Url::parse(u)?),
            None => format!("{}/json/new", self.http_endpoint),
        };

        // Chrome requires PUT for /json/new
        let page_info: PageInfo = reqwest::Client::new()
            .put(&create_url)
            .send()
            .await?
            .json()
            .await?;
        debug!("Created new page: {} - {}", page_info.id, page_info.url);

        self.attach_page(&page_info.id).await
    }

    /// Attach a flattened session to an existing target.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let session = PageSession::new(target_id.to_string(), session_id, self.transport.clone());
        session.enable_domains().await?;
        Ok(session)
    }

    /// Close a page/target.
    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }

    /// Close the socket. Pending calls fail with [`CdpError::SessionClosed`].
    pub async fn disconnect(&self) {
        self.transport.close().await;
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}
