//! Mock controller link for testing

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{json, Value};
use tokio::sync::{broadcast, watch};

use super::{ControllerEvent, ControllerLink, LinkError};
use crate::command::NOW_PLAYING_EVENT;
use crate::config::MockConfig;

/// In-process stand-in for the controller
///
/// Records every event it is sent, and answers events that have a configured
/// reply by emitting an event of the same name.
pub struct MockLink {
    reply_delay: Duration,
    connected: watch::Sender<bool>,
    incoming_tx: broadcast::Sender<ControllerEvent>,
    sent: RwLock<Vec<ControllerEvent>>,
    /// Event name -> payload emitted back under the same name
    replies: RwLock<HashMap<String, Value>>,
}

impl MockLink {
    pub fn new(config: &MockConfig) -> Self {
        let link = Self::silent();
        *link.replies.write() = Self::default_replies();
        Self {
            reply_delay: Duration::from_millis(config.reply_delay_ms),
            ..link
        }
    }

    /// Mock that never replies to anything
    pub fn silent() -> Self {
        let (incoming_tx, _) = broadcast::channel(256);
        let (connected, _) = watch::channel(true);
        Self {
            reply_delay: Duration::ZERO,
            connected,
            incoming_tx,
            sent: RwLock::new(Vec::new()),
            replies: RwLock::new(HashMap::new()),
        }
    }

    /// Reply to `event` with `payload` whenever it is sent
    pub fn with_reply(self, event: impl Into<String>, payload: Value) -> Self {
        self.set_reply(event, payload);
        self
    }

    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn set_reply(&self, event: impl Into<String>, payload: Value) {
        self.replies.write().insert(event.into(), payload);
    }

    /// Inject an event as if the controller had emitted it
    pub fn inject(&self, event: impl Into<String>, payload: Option<Value>) {
        let _ = self.incoming_tx.send(ControllerEvent::new(event, payload));
    }

    /// Everything sent so far, in order
    pub fn sent_events(&self) -> Vec<ControllerEvent> {
        self.sent.read().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().len()
    }

    /// Set connection state
    pub fn set_connected(&self, connected: bool) {
        self.connected.send_replace(connected);
    }

    fn default_replies() -> HashMap<String, Value> {
        let mut replies = HashMap::new();
        replies.insert(
            NOW_PLAYING_EVENT.to_string(),
            json!({
                "artist": "Demo Artist",
                "name": "Demo Track",
                "thumbnail": null,
                "loading": false,
                "playbackStatus": "PLAYING",
                "volume": 80,
                "shuffleQueue": false,
                "repeatQueue": false
            }),
        );
        replies
    }
}

#[async_trait]
impl ControllerLink for MockLink {
    async fn send(&self, event: &ControllerEvent) -> Result<(), LinkError> {
        if !*self.connected.borrow() {
            return Err(LinkError::ConnectionClosed);
        }

        tracing::debug!(event = %event.event, "Mock link: sent event");
        self.sent.write().push(event.clone());

        let reply = self.replies.read().get(&event.event).cloned();
        if let Some(payload) = reply {
            let reply = ControllerEvent::new(event.event.clone(), Some(payload));
            if self.reply_delay.is_zero() {
                // Emitted before send() returns, like a controller that answers instantly
                let _ = self.incoming_tx.send(reply);
            } else {
                let tx = self.incoming_tx.clone();
                let delay = self.reply_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(reply);
                });
            }
        }

        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.incoming_tx.subscribe()
    }

    fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    async fn closed(&self) {
        let mut rx = self.connected.subscribe();
        let _ = rx.wait_for(|connected| !*connected).await;
    }
}
