//! In-memory driver for tests

use crate::transport::traits::DriverError;
use crate::transport::LightDriver;
use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use wiz_bridge_shared::Command;

/// Records every send; optionally slow or failing
#[derive(Default)]
pub struct RecordingDriver {
    sent: Mutex<Vec<(Ipv4Addr, Command)>>,
    delay: Option<Duration>,
    fail: bool,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(Ipv4Addr, Command)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LightDriver for RecordingDriver {
    async fn send(&self, address: Ipv4Addr, command: &Command) -> Result<(), DriverError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.sent.lock().unwrap().push((address, *command));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(DriverError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "no route to light",
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
