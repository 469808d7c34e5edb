//! DOM operations for CDP page session.

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{DomNode, RemoteObject};

use super::core::PageSession;

/// Empties an input and lets frameworks listening for `input` see it.
pub(super) const CLEAR_VALUE_FN: &str = "function() { \
    this.value = ''; \
    this.dispatchEvent(new Event('input', { bubbles: true })); \
}";

impl PageSession {
    /// Get document root node.
    pub async fn get_document(&self) -> Result<DomNode, CdpError> {
        let result = self
            .call("DOM.getDocument", Some(json!({"depth": 0})))
            .await?;

        let root: DomNode = serde_json::from_value(result["root"].clone())?;
        Ok(root)
    }

    /// First element matching `selector`, if any.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let doc = self.get_document().await?;

        let result = self
            .call(
                "DOM.querySelector",
                Some(json!({
                    "nodeId": doc.node_id,
                    "selector": selector,
                })),
            )
            .await?;

        let node_id = result["nodeId"].as_i64().unwrap_or(0);
        if node_id == 0 {
            Ok(None)
        } else {
            Ok(Some(node_id))
        }
    }

    /// Resolve node to runtime object.
    pub async fn resolve_node(&self, node_id: i64) -> Result<RemoteObject, CdpError> {
        let result = self
            .call("DOM.resolveNode", Some(json!({"nodeId": node_id})))
            .await?;

        let obj: RemoteObject = serde_json::from_value(result["object"].clone())?;
        Ok(obj)
    }

    pub async fn focus(&self, node_id: i64) -> Result<(), CdpError> {
        self.call("DOM.focus", Some(json!({"nodeId": node_id})))
            .await?;
        Ok(())
    }

    /// Replace the value of an input element: focus, clear, insert.
    pub async fn set_input_value(&self, node_id: i64, value: &str) -> Result<(), CdpError> {
        self.focus(node_id).await?;

        let object = self.resolve_node(node_id).await?;
        let object_id = object
            .object_id
            .ok_or_else(|| CdpError::InvalidResponse("Node has no objectId".to_string()))?;
        self.call_function_on(&object_id, CLEAR_VALUE_FN, None)
            .await?;

        self.type_text(value).await?;
        debug!("Set value of node {}", node_id);
        Ok(())
    }

    /// Whether some element other than `<body>` holds focus.
    pub async fn has_focused_element(&self) -> Result<bool, CdpError> {
        let result = self
            .evaluate(
                "document.activeElement !== null && document.activeElement !== document.body",
            )
            .await?;
        Ok(result.as_bool().unwrap_or(false))
    }
}
