//! Driver trait abstraction for pluggable light backends

use async_trait::async_trait;
use std::net::Ipv4Addr;
use thiserror::Error;
use wiz_bridge_shared::{pilot::PilotError, Command};

/// Errors a driver can report for a single send
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pilot error: {0}")]
    Pilot(#[from] PilotError),
}

/// Sends one command to one light
#[async_trait]
pub trait LightDriver: Send + Sync {
    /// Deliver `command` to the light at `address`, resolving once the light
    /// has acknowledged it
    async fn send(&self, address: Ipv4Addr, command: &Command) -> Result<(), DriverError>;

    /// Human-readable name for this driver
    fn name(&self) -> &'static str;
}
