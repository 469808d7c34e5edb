//! CDP error types.

use coderelay_protocols::DriverError;
use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not found or not running with remote debugging.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Error object returned by the browser for a command.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CdpError {
    /// Whether the error means the connection itself is gone.
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            CdpError::SessionClosed
                | CdpError::WebSocket(_)
                | CdpError::ConnectionFailed(_)
                | CdpError::ChromeNotAvailable(_)
        )
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

impl From<CdpError> for DriverError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ElementNotFound(selector) => DriverError::SelectorNotFound(selector),
            CdpError::Timeout(msg) => DriverError::Timeout(msg),
            e if e.is_connection_lost() => DriverError::Session(e.to_string()),
            CdpError::Http(msg) | CdpError::NavigationFailed(msg) => DriverError::Session(msg),
            e => DriverError::InjectionRejected(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "Could not find node with given id".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "CDP error: Could not find node with given id (code: -32000)"
        );
    }

    #[test]
    fn test_connection_lost() {
        assert!(CdpError::SessionClosed.is_connection_lost());
        assert!(CdpError::WebSocket("reset".to_string()).is_connection_lost());
        assert!(!CdpError::Timeout("load".to_string()).is_connection_lost());
    }

    #[test]
    fn test_driver_error_mapping() {
        assert_eq!(
            DriverError::from(CdpError::ElementNotFound("#code".to_string())),
            DriverError::SelectorNotFound("#code".to_string())
        );
        assert!(matches!(
            DriverError::from(CdpError::Timeout("selector".to_string())),
            DriverError::Timeout(_)
        ));
        assert!(matches!(
            DriverError::from(CdpError::SessionClosed),
            DriverError::Session(_)
        ));
        assert!(matches!(
            DriverError::from(CdpError::JavaScript("readonly".to_string())),
            DriverError::InjectionRejected(_)
        ));
    }

    #[test]
    fn test_url_error_from() {
        let err = CdpError::from(url::Url::parse("not a url").unwrap_err());
        assert!(err.to_string().contains("Invalid URL"));
    }
}
