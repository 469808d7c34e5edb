//! Shared request/response plumbing over one CDP WebSocket.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{CdpRequest, CdpResponse};

pub(super) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

type PendingMap = HashMap<u64, oneshot::Sender<Result<Value, CdpError>>>;

const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Sender half of the socket plus the table of requests awaiting replies.
///
/// Shared by the browser-level client and every page session.
pub(crate) struct CdpTransport {
    ws_tx: tokio::sync::Mutex<WsSink>,
    pending: Arc<Mutex<PendingMap>>,
    request_id: AtomicU64,
}

/// What the receive loop did with one incoming frame.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Dispatch {
    /// Delivered to the caller waiting on this id.
    Reply(u64),
    /// Reply for an id nobody waits on any more (timed out).
    Orphan(u64),
    Event(String),
    Malformed,
}

impl CdpTransport {
    /// Wrap a freshly connected socket and spawn its receive loop.
    pub(super) fn start(stream: WsStream) -> (Arc<Self>, tokio::task::JoinHandle<()>) {
        let (ws_sink, ws_source) = stream.split();
        let pending: Arc<Mutex<PendingMap>> = Arc::new(Mutex::new(HashMap::new()));
        let recv_task = tokio::spawn(receive_loop(ws_source, pending.clone()));
        let transport = Arc::new(Self {
            ws_tx: tokio::sync::Mutex::new(ws_sink),
            pending,
            request_id: AtomicU64::new(1),
        });
        (transport, recv_task)
    }

    /// Send a CDP command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(str::to_string),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(CALL_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }

    /// Send a close frame and fail every pending call. Errors are ignored;
    /// the socket may already be gone.
    pub(crate) async fn close(&self) {
        let mut ws = self.ws_tx.lock().await;
        let _ = ws.close().await;
        self.pending.lock().clear();
    }
}

async fn receive_loop(mut ws_source: WsSource, pending: Arc<Mutex<PendingMap>>) {
    while let Some(msg) = ws_source.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                trace!("CDP recv: {}", text);
                if let Dispatch::Orphan(id) = dispatch(&text, &pending) {
                    debug!("Dropping late reply for request {}", id);
                }
            }
            Ok(Message::Close(_)) => {
                debug!("WebSocket closed");
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }
    // Dropping the senders wakes every waiter with SessionClosed.
    pending.lock().clear();
}

/// Route one text frame to the request waiting for it.
pub(crate) fn dispatch(text: &str, pending: &Mutex<PendingMap>) -> Dispatch {
    let resp = match serde_json::from_str::<CdpResponse>(text) {
        Ok(resp) => resp,
        Err(e) => {
            warn!("Failed to parse CDP message: {}", e);
            return Dispatch::Malformed;
        }
    };

    if let Some(id) = resp.id {
        let Some(tx) = pending.lock().remove(&id) else {
            return Dispatch::Orphan(id);
        };
        let result = match resp.error {
            Some(error) => Err(CdpError::Protocol {
                code: error.code,
                message: error.message,
            }),
            None => Ok(resp.result.unwrap_or(Value::Null)),
        };
        let _ = tx.send(result);
        return Dispatch::Reply(id);
    }

    match resp.method {
        Some(method) => Dispatch::Event(method),
        None => Dispatch::Malformed,
    }
}
