//! UDP driver for WiZ bulbs

use crate::transport::traits::{DriverError, LightDriver};
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::debug;
use wiz_bridge_shared::{defaults, pilot, Command};

/// Sends `setPilot` datagrams and waits for the bulb's acknowledgement.
///
/// UDP gives no delivery guarantee, so an unanswered datagram is resent every
/// `resend_interval`. The driver never gives up on its own; callers bound it
/// with a timeout.
#[derive(Debug, Clone)]
pub struct WizUdpDriver {
    port: u16,
    resend_interval: Duration,
}

impl WizUdpDriver {
    pub fn new(port: u16, resend_interval: Duration) -> Self {
        Self {
            port,
            resend_interval,
        }
    }
}

impl Default for WizUdpDriver {
    fn default() -> Self {
        Self::new(
            defaults::DEVICE_PORT,
            Duration::from_millis(defaults::RESEND_INTERVAL_MS),
        )
    }
}

#[async_trait]
impl LightDriver for WizUdpDriver {
    async fn send(&self, address: Ipv4Addr, command: &Command) -> Result<(), DriverError> {
        let datagram = pilot::encode(command)?;
        let target = SocketAddr::from((address, self.port));

        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.connect(target).await?;

        let mut buf = [0u8; pilot::MAX_DATAGRAM_SIZE];
        let mut attempt = 1u32;

        loop {
            socket.send(&datagram).await?;

            match timeout(self.resend_interval, socket.recv(&mut buf)).await {
                Ok(Ok(n)) => {
                    pilot::decode_response(&buf[..n])?;
                    debug!(%target, attempt, "pilot acknowledged");
                    return Ok(());
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    debug!(%target, attempt, "no reply, resending");
                    attempt += 1;
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "wiz-udp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiz_bridge_shared::pilot::PilotRequest;
    use wiz_bridge_shared::BrightnessLevel;

    /// Bind a loopback socket standing in for a bulb
    async fn fake_bulb() -> (UdpSocket, u16) {
        let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind failed");
        let port = socket.local_addr().unwrap().port();
        (socket, port)
    }

    #[tokio::test]
    async fn test_send_acknowledged() {
        let (bulb, port) = fake_bulb().await;
        let driver = WizUdpDriver::new(port, Duration::from_millis(200));

        let responder = tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let (n, peer) = bulb.recv_from(&mut buf).await.unwrap();
            let request: PilotRequest = pilot::decode_request(&buf[..n]).unwrap();
            let ack = pilot::encode_ack(&request.method).unwrap();
            bulb.send_to(&ack, peer).await.unwrap();
            request
        });

        let level = BrightnessLevel::new(128).unwrap();
        driver
            .send(Ipv4Addr::LOCALHOST, &Command::SetBrightness(level))
            .await
            .expect("send should succeed");

        let request = responder.await.unwrap();
        assert!(request.params.state);
        assert_eq!(request.params.dimming, Some(50));
    }

    #[tokio::test]
    async fn test_resends_until_answered() {
        let (bulb, port) = fake_bulb().await;
        let driver = WizUdpDriver::new(port, Duration::from_millis(50));

        let responder = tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            // Drop the first datagram on the floor
            bulb.recv_from(&mut buf).await.unwrap();
            let (_, peer) = bulb.recv_from(&mut buf).await.unwrap();
            let ack = pilot::encode_ack(pilot::SET_PILOT).unwrap();
            bulb.send_to(&ack, peer).await.unwrap();
        });

        let result = timeout(
            Duration::from_secs(2),
            driver.send(Ipv4Addr::LOCALHOST, &Command::TurnOff),
        )
        .await
        .expect("driver should resend before the test timeout");
        assert!(result.is_ok());
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn test_device_error_reply() {
        let (bulb, port) = fake_bulb().await;
        let driver = WizUdpDriver::new(port, Duration::from_millis(200));

        tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let (_, peer) = bulb.recv_from(&mut buf).await.unwrap();
            let reply = br#"{"method":"setPilot","error":{"code":-32700,"message":"Parse error"}}"#;
            bulb.send_to(reply, peer).await.unwrap();
        });

        let result = driver.send(Ipv4Addr::LOCALHOST, &Command::TurnOn).await;
        assert!(matches!(result, Err(DriverError::Pilot(_))));
    }

    #[tokio::test]
    async fn test_closed_port_never_succeeds() {
        let (bulb, port) = fake_bulb().await;
        drop(bulb);
        let driver = WizUdpDriver::new(port, Duration::from_millis(50));

        let result = timeout(
            Duration::from_millis(500),
            driver.send(Ipv4Addr::LOCALHOST, &Command::TurnOff),
        )
        .await;
        assert!(!matches!(result, Ok(Ok(()))));
    }

    #[test]
    fn test_driver_name() {
        assert_eq!(WizUdpDriver::default().name(), "wiz-udp");
    }
}
