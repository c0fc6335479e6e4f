pub mod channel;
pub mod events;
pub mod stdio;
pub mod terminal;

use async_trait::async_trait;
use thiserror::Error;

pub use channel::ChannelUi;
pub use events::{HostCommand, HostEvent};
pub use terminal::TerminalUi;

#[derive(Error, Debug)]
pub enum UIError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The host is no longer listening")]
    ChannelClosed,
}

/// Presentation surface the agent reports to.
///
/// Delivery failures never abort a conversation; the agent logs them and
/// carries on.
#[async_trait]
pub trait UserInterface: Send + Sync {
    /// Deliver an event to the host
    async fn send_event(&self, event: HostEvent) -> Result<(), UIError>;
}
