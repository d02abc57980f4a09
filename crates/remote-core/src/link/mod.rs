//! Links to the controller process
//!
//! - TCP link exchanging newline-delimited JSON events
//! - Mock link for testing and demo mode
//!
//! # Example
//!
//! ```ignore
//! use remote_core::link::{create_link, ControllerEvent};
//! use remote_core::LinkConfig;
//!
//! let link = create_link(&LinkConfig::default()).await?;
//! link.send(&ControllerEvent::bare("next")).await?;
//! ```

mod adapter;
pub mod error;
pub mod mock;
pub mod tcp;

pub use adapter::{ControllerEvent, ControllerLink};
pub use error::LinkError;
pub use mock::MockLink;
pub use tcp::TcpLink;

use std::sync::Arc;

use crate::config::LinkConfig;

/// Create a controller link based on configuration
pub async fn create_link(config: &LinkConfig) -> Result<Arc<dyn ControllerLink>, LinkError> {
    match config {
        LinkConfig::Tcp(cfg) => {
            let link = TcpLink::connect(cfg).await?;
            Ok(Arc::new(link))
        }
        LinkConfig::Mock(cfg) => {
            let link = MockLink::new(cfg);
            Ok(Arc::new(link))
        }
    }
}
