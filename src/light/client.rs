use crate::transport::LightDriver;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};
use wiz_bridge_shared::{BrightnessLevel, Command, Outcome};

/// Issues single commands to lights through a driver
#[derive(Clone)]
pub struct DeviceClient {
    driver: Arc<dyn LightDriver>,
    timeout: Duration,
}

impl DeviceClient {
    /// Create a client bounding every command by `timeout`
    pub fn new(driver: Arc<dyn LightDriver>, timeout: Duration) -> Self {
        Self { driver, timeout }
    }

    /// Turn the light off
    pub async fn turn_off(&self, address: Ipv4Addr) -> Outcome {
        self.send(address, Command::TurnOff).await
    }

    /// Turn the light on at the given level
    pub async fn turn_on(&self, address: Ipv4Addr, brightness: BrightnessLevel) -> Outcome {
        if brightness == BrightnessLevel::FULL {
            self.send(address, Command::TurnOn).await
        } else {
            self.send(address, Command::SetBrightness(brightness)).await
        }
    }

    /// Turn the light on at full brightness
    pub async fn turn_on_full(&self, address: Ipv4Addr) -> Outcome {
        self.turn_on(address, BrightnessLevel::FULL).await
    }

    /// Execute an already-built command
    pub async fn execute(&self, address: Ipv4Addr, command: Command) -> Outcome {
        match command {
            Command::TurnOff => self.turn_off(address).await,
            Command::TurnOn => self.turn_on_full(address).await,
            Command::SetBrightness(level) => self.turn_on(address, level).await,
        }
    }

    async fn send(&self, address: Ipv4Addr, command: Command) -> Outcome {
        debug!(%address, %command, driver = self.driver.name(), "sending light command");

        match timeout(self.timeout, self.driver.send(address, &command)).await {
            Ok(Ok(())) => Outcome::Success,
            Ok(Err(e)) => {
                warn!(%address, %command, error = %e, "light command failed");
                Outcome::DeviceUnreachable
            }
            Err(_) => {
                warn!(
                    %address,
                    %command,
                    "no acknowledgement within {:?}",
                    self.timeout
                );
                Outcome::DeviceUnreachable
            }
        }
    }
}
