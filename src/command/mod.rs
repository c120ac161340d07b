//! Command dispatch for host actions
//!
//! This module handles:
//! - The catalog of actions the host can trigger
//! - Validating action parameters (address, brightness percent)
//! - Routing a validated command to the device client

mod action;
mod dispatcher;
mod params;

#[cfg(test)]
pub use action::ActionKind;
pub use dispatcher::{CommandDispatcher, Dispatched};
