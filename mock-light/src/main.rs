//! Stand-in WiZ bulb for running the bridge without hardware

use anyhow::Result;
use tokio::net::UdpSocket;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wiz_bridge_shared::pilot::{self, PilotRequest, MAX_DATAGRAM_SIZE};

const DEFAULT_ADDR: &str = "0.0.0.0:38899";

fn describe(request: &PilotRequest) -> String {
    match (request.params.state, request.params.dimming) {
        (false, _) => "off".to_string(),
        (true, Some(dimming)) => format!("on at {}%", dimming),
        (true, None) => "on".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let addr = std::env::var("MOCK_LIGHT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let socket = UdpSocket::bind(&addr).await?;
    info!("Mock light listening on {}", socket.local_addr()?);

    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
    loop {
        let (n, peer) = socket.recv_from(&mut buf).await?;

        let request = match pilot::decode_request(&buf[..n]) {
            Ok(request) => request,
            Err(e) => {
                warn!("Bad datagram from {}: {}", peer, e);
                continue;
            }
        };

        info!("{} from {}: {}", request.method, peer, describe(&request));

        let ack = pilot::encode_ack(&request.method)?;
        if let Err(e) = socket.send_to(&ack, peer).await {
            warn!("Failed to ack {}: {}", peer, e);
        }
    }
}
