//! Command gateway - dispatches commands to the controller
//!
//! ```text
//! received → dispatching → (awaiting-reply)? → done
//!     └────→ rejected  (precondition failed, nothing sent)
//! ```
//!
//! Schema validation happens before a `Command` exists; the gateway only
//! checks preconditions that depend on controller state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info};

use crate::bridge::EventBridge;
use crate::command::{Command, CommandMode, CommandOutcome};
use crate::error::{GatewayError, GatewayResult};
use crate::store::{ConfigStore, EqualizerSnapshot, EQUALIZER_KEY};

pub struct CommandGateway {
    bridge: Arc<EventBridge>,
    store: Arc<dyn ConfigStore>,
    reply_timeout: Duration,
    /// One queue per reply event; queries sharing a reply event run one at a time
    query_queues: Mutex<HashMap<&'static str, Arc<tokio::sync::Mutex<()>>>>,
}

impl CommandGateway {
    pub fn new(
        bridge: Arc<EventBridge>,
        store: Arc<dyn ConfigStore>,
        reply_timeout: Duration,
    ) -> Self {
        Self {
            bridge,
            store,
            reply_timeout,
            query_queues: Mutex::new(HashMap::new()),
        }
    }

    pub fn reply_timeout(&self) -> Duration {
        self.reply_timeout
    }

    pub fn bridge(&self) -> &Arc<EventBridge> {
        &self.bridge
    }

    /// Send `command` and, for queries, wait for its reply
    ///
    /// A query that times out has still been delivered; the controller may act
    /// on it even though the caller sees an error.
    pub async fn execute(&self, command: Command) -> GatewayResult<CommandOutcome> {
        match command.mode() {
            CommandMode::FireAndForget => {
                self.bridge
                    .send(command.event_name(), command.payload())
                    .await?;
                debug!(event = command.event_name(), "Command accepted");
                Ok(CommandOutcome::Accepted)
            }
            CommandMode::Query { reply_event } => {
                let queue = self.query_queue(reply_event);
                let _turn = queue.lock().await;

                let reply = self
                    .bridge
                    .request(
                        command.event_name(),
                        command.payload(),
                        reply_event,
                        self.reply_timeout,
                    )
                    .await?;
                debug!(event = command.event_name(), "Query answered");
                Ok(CommandOutcome::Reply(reply))
            }
        }
    }

    /// Current snapshot of the equalizer domain, as stored
    pub fn equalizer(&self) -> GatewayResult<Value> {
        self.store
            .get(EQUALIZER_KEY)?
            .ok_or_else(|| GatewayError::DomainNotFound(EQUALIZER_KEY.to_string()))
    }

    /// Select a preset by name after checking it exists right now
    ///
    /// The preset set may still change between this check and the controller
    /// applying the selection; the controller has the final say.
    pub async fn select_preset(&self, name: &str) -> GatewayResult<()> {
        let snapshot = EqualizerSnapshot::from_value(self.equalizer()?)?;
        if !snapshot.has_preset(name) {
            return Err(GatewayError::UnknownPreset {
                name: name.to_string(),
                allowed: snapshot.preset_names(),
            });
        }

        info!(preset = %name, "Selecting equalizer preset");
        self.execute(Command::SetEqualizer(name.to_string()))
            .await
            .map(|_| ())
    }

    fn query_queue(&self, reply_event: &'static str) -> Arc<tokio::sync::Mutex<()>> {
        self.query_queues
            .lock()
            .entry(reply_event)
            .or_default()
            .clone()
    }
}
