//! Page operations the driver relies on.

use std::time::Duration;

use async_trait::async_trait;

use crate::cdp::{CdpError, PageSession};

/// Narrow view of a page session, implemented by [`PageSession`].
#[async_trait]
pub trait PageControl: Send + Sync {
    /// Poll until `selector` resolves to a node or `timeout` elapses.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<i64, CdpError>;

    async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError>;

    /// Clear the node's value, then type `value` into it.
    async fn set_input_value(&self, node_id: i64, value: &str) -> Result<(), CdpError>;

    async fn press_enter_on(&self, node_id: i64) -> Result<(), CdpError>;

    /// Send Enter to whatever element holds focus.
    ///
    /// Fails with [`CdpError::ElementNotFound`] when focus rests on the body.
    async fn press_enter_on_active(&self) -> Result<(), CdpError>;

    async fn reload(&self, timeout: Duration) -> Result<(), CdpError>;
}

#[async_trait]
impl PageControl for PageSession {
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<i64, CdpError> {
        PageSession::wait_for_selector(self, selector, timeout).await
    }

    async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        PageSession::query_selector(self, selector).await
    }

    async fn set_input_value(&self, node_id: i64, value: &str) -> Result<(), CdpError> {
        PageSession::set_input_value(self, node_id, value).await
    }

    async fn press_enter_on(&self, node_id: i64) -> Result<(), CdpError> {
        self.focus(node_id).await?;
        self.press_enter().await
    }

    async fn press_enter_on_active(&self) -> Result<(), CdpError> {
        if !self.has_focused_element().await? {
            return Err(CdpError::ElementNotFound("no focused element".to_string()));
        }
        self.press_enter().await
    }

    async fn reload(&self, timeout: Duration) -> Result<(), CdpError> {
        PageSession::reload(self, timeout).await
    }
}
