//! JavaScript execution operations for CDP page session.

use serde_json::{Value, json};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        Self::unwrap_evaluation(result)
    }

    /// Call a function with `this` bound to a remote object.
    pub async fn call_function_on(
        &self,
        object_id: &str,
        function: &str,
        args: Option<Vec<Value>>,
    ) -> Result<Value, CdpError> {
        let mut params = json!({
            "objectId": object_id,
            "functionDeclaration": function,
            "returnByValue": true,
            "awaitPromise": true,
        });

        if let Some(a) = args {
            params["arguments"] =
                json!(a.into_iter().map(|v| json!({"value": v})).collect::<Vec<_>>());
        }

        let result = self
            .call("Runtime.callFunctionOn", Some(params))
            .await?;
        Self::unwrap_evaluation(result)
    }

    /// Turn `exceptionDetails` into an error, otherwise return the value.
    pub(super) fn unwrap_evaluation(result: Value) -> Result<Value, CdpError> {
        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }
        Ok(result["result"]["value"].clone())
    }
}
