//! Keyboard input for CDP page session.

use serde_json::{Value, json};
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::KeyEventType;

use super::core::PageSession;

impl PageSession {
    /// Insert text at the caret, as an IME commit would.
    pub async fn type_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        debug!("Typed {} characters", text.chars().count());
        Ok(())
    }

    /// Press and release Enter on whatever holds focus.
    pub async fn press_enter(&self) -> Result<(), CdpError> {
        self.call("Input.dispatchKeyEvent", Some(Self::enter_event(KeyEventType::KeyDown)))
            .await?;
        self.call("Input.dispatchKeyEvent", Some(Self::enter_event(KeyEventType::KeyUp)))
            .await?;
        Ok(())
    }

    /// Parameters for an Enter key event. Only the key-down carries text so
    /// that forms see exactly one submit.
    pub(super) fn enter_event(event_type: KeyEventType) -> Value {
        let mut params = json!({
            "type": event_type,
            "key": "Enter",
            "code": "Enter",
            "windowsVirtualKeyCode": 13,
            "nativeVirtualKeyCode": 13,
        });
        if matches!(event_type, KeyEventType::KeyDown) {
            params["text"] = json!("\r");
        }
        params
    }
}
