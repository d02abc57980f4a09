//! remote-core - Command gateway for a player controller process
//!
//! The controller only speaks one-way events. This crate turns request/response
//! style commands into event exchanges with it: commands are sent as events,
//! and query commands wait for exactly one correlated reply event.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    CommandGateway                         │
//! │  dispatch table, preset precondition, query queueing      │
//! │                                                          │
//! │  ┌──────────────┐               ┌─────────────────────┐  │
//! │  │ ConfigStore  │               │    EventBridge      │  │
//! │  │ (snapshots)  │               │  send / await_once  │  │
//! │  └──────────────┘               │  ┌───────────────┐  │  │
//! │                                 │  │ ReplyRegistry │  │  │
//! │                                 │  └───────────────┘  │  │
//! │                                 └──────────┬──────────┘  │
//! │                                   ┌────────┴────────┐    │
//! │                                   │ ControllerLink  │    │
//! │                                   │  (TCP / mock)   │    │
//! │                                   └─────────────────┘    │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod bridge;
pub mod command;
pub mod config;
pub mod error;
pub mod gateway;
pub mod link;
pub mod schema;
pub mod store;

pub use bridge::{EventBridge, PendingReply, ReplyRegistry};
pub use command::{Command, CommandMode, CommandOutcome};
pub use config::{GatewayConfig, LinkConfig, StoreConfig};
pub use error::{BridgeError, BridgeResult, GatewayError, GatewayResult, StoreError};
pub use gateway::CommandGateway;
pub use link::{create_link, ControllerEvent, ControllerLink, LinkError};
pub use store::{create_store, ConfigStore, EqualizerSnapshot, JsonFileStore, MemoryStore};
