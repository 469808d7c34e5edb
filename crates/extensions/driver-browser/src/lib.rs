//! Submission driver for CodeRelay backed by Chrome.
//!
//! Talks to Chrome/Chromium over the DevTools Protocol (CDP): the browser is
//! launched with remote debugging (or an already running instance on the
//! debug port is reused), one page is opened on the target address, and the
//! input field is driven through DOM, Runtime and Input commands.
//!
//! ```text
//! ┌──────────────────┐    WebSocket     ┌──────────────────┐
//! │  BrowserDriver   │ ◄──────────────► │   Chrome/Edge    │
//! │  (this crate)    │       CDP        │  (target page)   │
//! └──────────────────┘                  └──────────────────┘
//! ```
//!
//! To attach to your own browser instead of a launched one, start it with:
//!
//! ```bash
//! google-chrome --remote-debugging-port=9222
//! ```

pub mod cdp;
mod driver;
pub mod manager;
mod page;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use driver::BrowserDriver;
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
pub use page::PageControl;
