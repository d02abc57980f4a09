//! Controller link trait and wire types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use super::LinkError;

/// One event exchanged with the controller, in either direction
///
/// On the wire this is a single JSON object per line:
/// `{"event": "volume", "payload": 40}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerEvent {
    /// Event name; replies reuse the name of the query that triggered them
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ControllerEvent {
    pub fn new(event: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }

    /// Event without a payload
    pub fn bare(event: impl Into<String>) -> Self {
        Self::new(event, None)
    }
}

/// Transport-agnostic channel to the controller process
///
/// Events are one-way in both directions: `send` returns as soon as the event
/// is queued, and anything the controller emits shows up on `subscribe`.
#[async_trait]
pub trait ControllerLink: Send + Sync {
    /// Queue an event for the controller without waiting for acknowledgement
    async fn send(&self, event: &ControllerEvent) -> Result<(), LinkError>;

    /// Subscribe to events emitted by the controller
    fn subscribe(&self) -> broadcast::Receiver<ControllerEvent>;

    /// Check if the link is up
    fn is_connected(&self) -> bool;

    /// Resolves once the link has gone down
    async fn closed(&self);
}
