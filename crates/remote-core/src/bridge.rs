//! Event bridge and reply correlation
//!
//! The controller never echoes a correlation id. A reply is matched to its
//! query purely by event name, which only works if:
//!
//! - the waiter is registered before the query event is sent,
//! - at most one waiter exists per event name,
//! - the waiter is removed on first delivery, on timeout, or when the caller
//!   goes away.
//!
//! `ReplyRegistry` enforces those rules; `EventBridge` pairs it with a
//! `ControllerLink` and pumps incoming events into it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{BridgeError, BridgeResult};
use crate::link::{ControllerEvent, ControllerLink};

// =============================================================================
// Reply registry
// =============================================================================

struct Waiter {
    id: u64,
    tx: oneshot::Sender<Value>,
}

/// Correlation table: reply event name -> the single pending waiter
#[derive(Default)]
pub struct ReplyRegistry {
    waiters: Mutex<HashMap<String, Waiter>>,
    next_id: AtomicU64,
}

impl ReplyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the one waiter for `event`
    ///
    /// Fails with `AlreadyPending` if another waiter is outstanding; callers
    /// that may race on the same event must queue before registering.
    pub fn register(self: &Arc<Self>, event: &str) -> BridgeResult<PendingReply> {
        let mut waiters = self.waiters.lock();
        if waiters.contains_key(event) {
            return Err(BridgeError::AlreadyPending(event.to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        waiters.insert(event.to_string(), Waiter { id, tx });
        debug!(%event, id, "Registered reply waiter");

        Ok(PendingReply {
            event: event.to_string(),
            id,
            rx,
            registry: Arc::clone(self),
        })
    }

    /// Hand `payload` to the waiter for `event`, removing it
    ///
    /// Returns false when nobody was waiting (late or unsolicited event);
    /// the payload is dropped in that case.
    pub fn deliver(&self, event: &str, payload: Value) -> bool {
        let waiter = self.waiters.lock().remove(event);
        match waiter {
            Some(waiter) => {
                let delivered = waiter.tx.send(payload).is_ok();
                debug!(%event, id = waiter.id, delivered, "Delivered reply");
                delivered
            }
            None => false,
        }
    }

    pub fn is_pending(&self, event: &str) -> bool {
        self.waiters.lock().contains_key(event)
    }

    /// Number of outstanding waiters
    pub fn len(&self) -> usize {
        self.waiters.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove the waiter for `event` only if it is still registration `id`
    fn release(&self, event: &str, id: u64) {
        let mut waiters = self.waiters.lock();
        if waiters.get(event).is_some_and(|w| w.id == id) {
            waiters.remove(event);
            debug!(%event, id, "Released reply waiter");
        }
    }
}

/// Handle on a registered waiter
///
/// Dropping it deregisters the waiter, which covers timeouts as well as
/// callers that disconnect mid-wait.
pub struct PendingReply {
    event: String,
    id: u64,
    rx: oneshot::Receiver<Value>,
    registry: Arc<ReplyRegistry>,
}

impl PendingReply {
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Wait for the reply, giving up after `timeout`
    pub async fn wait(mut self, timeout: Duration) -> BridgeResult<Value> {
        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(_)) => Err(BridgeError::Closed(self.event.clone())),
            Err(_) => {
                warn!(event = %self.event, ?timeout, "Timed out waiting for reply");
                Err(BridgeError::Timeout {
                    event: self.event.clone(),
                    timeout,
                })
            }
        }
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.registry.release(&self.event, self.id);
    }
}

// =============================================================================
// Event bridge
// =============================================================================

/// The gateway's only channel to the controller
pub struct EventBridge {
    link: Arc<dyn ControllerLink>,
    registry: Arc<ReplyRegistry>,
    listener_handle: Mutex<Option<JoinHandle<()>>>,
}

impl EventBridge {
    /// Create a bridge over `link` and start routing incoming events
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(link: Arc<dyn ControllerLink>) -> Self {
        let bridge = Self {
            link,
            registry: Arc::new(ReplyRegistry::new()),
            listener_handle: Mutex::new(None),
        };
        bridge.start_listener();
        bridge
    }

    fn start_listener(&self) {
        let rx = self.link.subscribe();
        let registry = self.registry.clone();
        let handle = tokio::spawn(Self::listen(rx, registry));
        *self.listener_handle.lock() = Some(handle);
    }

    async fn listen(mut rx: broadcast::Receiver<ControllerEvent>, registry: Arc<ReplyRegistry>) {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let name = event.event;
                    if !registry.deliver(&name, event.payload.unwrap_or(Value::Null)) {
                        debug!(event = %name, "No waiter for event, dropped");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event listener lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Controller event stream closed");
                    break;
                }
            }
        }
    }

    /// Send a one-way event; returns once it is queued on the link
    pub async fn send(&self, event: &str, payload: Option<Value>) -> BridgeResult<()> {
        let event = ControllerEvent::new(event, payload);
        self.link.send(&event).await?;
        Ok(())
    }

    /// Register the single waiter for `event`
    ///
    /// Call this before sending the event that triggers the reply.
    pub fn register_once(&self, event: &str) -> BridgeResult<PendingReply> {
        self.registry.register(event)
    }

    /// Wait for the next delivery on `event`
    pub async fn await_once(&self, event: &str, timeout: Duration) -> BridgeResult<Value> {
        self.register_once(event)?.wait(timeout).await
    }

    /// Register for `reply_event`, send `event`, then wait for the reply
    pub async fn request(
        &self,
        event: &str,
        payload: Option<Value>,
        reply_event: &str,
        timeout: Duration,
    ) -> BridgeResult<Value> {
        let pending = self.register_once(reply_event)?;
        self.send(event, payload).await?;
        pending.wait(timeout).await
    }

    pub fn registry(&self) -> &Arc<ReplyRegistry> {
        &self.registry
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }
}

impl Drop for EventBridge {
    fn drop(&mut self) {
        if let Some(handle) = self.listener_handle.lock().take() {
            handle.abort();
        }
    }
}
