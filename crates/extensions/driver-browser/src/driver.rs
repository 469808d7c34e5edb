//! [`SubmissionDriver`] implementation over a Chrome page.

use std::sync::Arc;

use async_trait::async_trait;
use coderelay_protocols::{DriverError, SessionOptions, SubmissionDriver, SubmitPath};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cdp::CdpError;
use crate::manager::{BrowserManager, BrowserManagerConfig};
use crate::page::PageControl;

struct OpenSession {
    page: Arc<dyn PageControl>,
    options: SessionOptions,
    /// Absent when the page was attached directly.
    manager: Option<BrowserManager>,
    target_id: Option<String>,
}

/// Drives a single Chrome tab opened on the target address.
pub struct BrowserDriver {
    config: BrowserManagerConfig,
    session: RwLock<Option<OpenSession>>,
}

impl BrowserDriver {
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            session: RwLock::new(None),
        }
    }

    #[cfg(test)]
    pub(crate) fn attached(page: Arc<dyn PageControl>, options: SessionOptions) -> Self {
        Self {
            config: BrowserManagerConfig::default(),
            session: RwLock::new(Some(OpenSession {
                page,
                options,
                manager: None,
                target_id: None,
            })),
        }
    }

    pub async fn is_open(&self) -> bool {
        self.session.read().await.is_some()
    }

    async fn current(&self) -> Result<(Arc<dyn PageControl>, SessionOptions), DriverError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(DriverError::NotOpen)?;
        Ok((session.page.clone(), session.options.clone()))
    }

    async fn teardown(session: OpenSession) {
        let Some(manager) = session.manager else {
            return;
        };
        if let Some(target_id) = &session.target_id {
            if let Err(e) = manager.close_page(target_id).await {
                debug!("Ignoring page close error: {}", e);
            }
        }
        if let Err(e) = manager.shutdown_chrome().await {
            debug!("Ignoring browser shutdown error: {}", e);
        }
    }
}

#[async_trait]
impl SubmissionDriver for BrowserDriver {
    async fn open(&self, options: &SessionOptions) -> Result<(), DriverError> {
        url::Url::parse(&options.address).map_err(|e| {
            DriverError::Session(format!("Invalid address '{}': {}", options.address, e))
        })?;

        if let Some(previous) = self.session.write().await.take() {
            warn!("Session already open, replacing it");
            Self::teardown(previous).await;
        }

        let manager = BrowserManager::new(BrowserManagerConfig {
            headless: !options.visible,
            ..self.config.clone()
        });

        let page = match manager
            .open_page(&options.address, options.element_timeout)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                let _ = manager.shutdown_chrome().await;
                return Err(e.into());
            }
        };

        let target_id = page.target_id().to_string();
        info!("Session open on {} (page {})", options.address, target_id);

        *self.session.write().await = Some(OpenSession {
            page: Arc::new(page),
            options: options.clone(),
            manager: Some(manager),
            target_id: Some(target_id),
        });
        Ok(())
    }

    async fn submit_text(&self, value: &str, also_press_enter: bool) -> Result<(), DriverError> {
        let (page, options) = self.current().await?;
        let selector = options.input_selector.as_str();

        let node_id = page
            .wait_for_selector(selector, options.element_timeout)
            .await
            .map_err(|e| match e {
                CdpError::Timeout(_) | CdpError::ElementNotFound(_) => {
                    DriverError::SelectorNotFound(selector.to_string())
                }
                e => e.into(),
            })?;

        page.set_input_value(node_id, value)
            .await
            .map_err(|e| match e {
                e if e.is_connection_lost() => DriverError::Session(e.to_string()),
                e => DriverError::InjectionRejected(e.to_string()),
            })?;

        if also_press_enter {
            page.press_enter_on(node_id).await?;
        }
        debug!("Injected {} characters into {}", value.chars().count(), selector);
        Ok(())
    }

    async fn press_submit(&self) -> Result<SubmitPath, DriverError> {
        let (page, options) = self.current().await?;
        let selector = options.input_selector.as_str();

        let primary = match page.query_selector(selector).await {
            Ok(Some(node_id)) => match page.press_enter_on(node_id).await {
                Ok(()) => return Ok(SubmitPath::Primary),
                Err(e) if e.is_connection_lost() => return Err(e.into()),
                Err(e) => e.to_string(),
            },
            Ok(None) => format!("selector '{}' not found", selector),
            Err(e) if e.is_connection_lost() => return Err(e.into()),
            Err(e) => e.to_string(),
        };

        debug!("Primary submit unavailable ({}), trying focused element", primary);
        match page.press_enter_on_active().await {
            Ok(()) => Ok(SubmitPath::ActiveElement),
            Err(e) if e.is_connection_lost() => Err(e.into()),
            Err(e) => Err(DriverError::SubmitUnavailable {
                primary,
                fallback: e.to_string(),
            }),
        }
    }

    /// Any reload failure, including a load timeout, is a session failure.
    async fn refresh(&self) -> Result<(), DriverError> {
        let (page, options) = self.current().await?;
        page.reload(options.element_timeout)
            .await
            .map_err(|e| DriverError::Session(format!("Reload failed: {}", e)))?;
        Ok(())
    }

    async fn close(&self) {
        let session = self.session.write().await.take();
        if let Some(session) = session {
            Self::teardown(session).await;
            info!("Session closed");
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
