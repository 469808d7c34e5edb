//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to Chrome via WebSocket and speaks the CDP JSON-RPC protocol.
//! A [`CdpClient`] owns the browser-level connection; every page attached
//! through it gets a [`PageSession`] that shares the same socket and routes
//! its commands with a flattened `sessionId`.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let page = client.new_page(Some("https://example.com")).await?;
//! page.wait_for_load(Duration::from_secs(5)).await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;
mod transport;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
