//! Host application link
//!
//! This module handles:
//! - Message types for the newline-delimited JSON host protocol
//! - The callback trait the bridge implements
//! - The session loop that pairs with the host and dispatches events

mod handler;
mod messages;
mod session;

pub use handler::HostHandler;
pub use messages::{ActionEvent, ActionMessage, InfoMessage, Outbound, SettingValues};
#[cfg(test)]
pub use messages::ActionData;
pub use session::HostSession;
