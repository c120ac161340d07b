//! Host session: pairing and the read/write loop

use super::handler::HostHandler;
use super::messages::{Inbound, Outbound};
use anyhow::{anyhow, Context, Result};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use wiz_bridge_shared::codec::{self, LineDecoder};

/// Whether the session keeps running after a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Close,
}

/// One connection to the host application
pub struct HostSession {
    host_addr: String,
    plugin_id: String,
    connect_timeout: Duration,
    /// Channel handlers use to send messages to the host
    outbound_tx: mpsc::Sender<Outbound>,
    /// Taken by the writer task once connected
    outbound_rx: Option<mpsc::Receiver<Outbound>>,
}

impl HostSession {
    pub fn new(host_addr: impl Into<String>, plugin_id: impl Into<String>, connect_timeout: Duration) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::channel::<Outbound>(100);

        Self {
            host_addr: host_addr.into(),
            plugin_id: plugin_id.into(),
            connect_timeout,
            outbound_tx,
            outbound_rx: Some(outbound_rx),
        }
    }

    /// Get a clone of the sender for outbound messages
    pub fn get_sender(&self) -> mpsc::Sender<Outbound> {
        self.outbound_tx.clone()
    }

    /// Connect, pair and serve events until the host closes the plugin.
    ///
    /// Returns `Ok(())` on a requested close. Any other end of the session is
    /// reported to `handler.on_error` and returned.
    pub async fn run<H>(mut self, handler: &H) -> Result<()>
    where
        H: HostHandler + ?Sized,
    {
        let result = self.connect_and_serve(handler).await;

        if let Err(e) = &result {
            handler.on_error(e).await;
        }

        result
    }

    async fn connect_and_serve<H>(&mut self, handler: &H) -> Result<()>
    where
        H: HostHandler + ?Sized,
    {
        let stream = timeout(self.connect_timeout, TcpStream::connect(&self.host_addr))
            .await
            .map_err(|_| anyhow!("Timed out connecting to host at {}", self.host_addr))?
            .with_context(|| format!("Failed to connect to host at {}", self.host_addr))?;

        info!("Connected to host at {}", self.host_addr);
        self.serve(stream, handler).await
    }

    async fn serve<H>(&mut self, stream: TcpStream, handler: &H) -> Result<()>
    where
        H: HostHandler + ?Sized,
    {
        let (mut reader, mut writer) = stream.into_split();

        let pair = Outbound::Pair {
            id: self.plugin_id.clone(),
        };
        writer.write_all(&codec::encode(&pair)?).await?;
        debug!("Pair request sent as {}", self.plugin_id);

        let outbound_rx = self
            .outbound_rx
            .take()
            .context("Session outbound channel already in use")?;

        // Writes drain on their own task so handlers can queue while we read
        let mut writer_task = tokio::spawn(write_loop(writer, outbound_rx));

        let result = self.read_loop(&mut reader, &mut writer_task, handler).await;
        writer_task.abort();
        result
    }

    async fn read_loop<H>(
        &self,
        reader: &mut OwnedReadHalf,
        writer_task: &mut JoinHandle<Result<()>>,
        handler: &H,
    ) -> Result<()>
    where
        H: HostHandler + ?Sized,
    {
        let mut decoder = LineDecoder::new();
        let mut read_buf = vec![0u8; 4096];

        loop {
            tokio::select! {
                // Writer stopped: socket gone or channel closed
                joined = &mut *writer_task => {
                    return match joined {
                        Ok(Ok(())) => Err(anyhow!("Outbound channel closed")),
                        Ok(Err(e)) => Err(e.context("Write error")),
                        Err(e) => Err(anyhow!("Writer task failed: {}", e)),
                    };
                }

                // Read incoming messages
                result = reader.read(&mut read_buf) => {
                    let n = result.context("Read error")?;
                    if n == 0 {
                        return Err(anyhow!("Host closed connection"));
                    }
                    decoder.extend(&read_buf[..n]);

                    // Process all complete lines
                    loop {
                        match decoder.decode_next::<Inbound>() {
                            Ok(Some(message)) => {
                                if self.handle_message(message, handler).await == Flow::Close {
                                    return Ok(());
                                }
                            }
                            Ok(None) => break,
                            Err(e) if e.is_recoverable() => {
                                warn!("Skipping undecodable host message: {}", e);
                            }
                            Err(e) => return Err(e.into()),
                        }
                    }
                }
            }
        }
    }

    async fn handle_message<H>(&self, message: Inbound, handler: &H) -> Flow
    where
        H: HostHandler + ?Sized,
    {
        if let Some(target) = message.plugin_id() {
            if target != self.plugin_id {
                debug!("Ignoring message addressed to {}", target);
                return Flow::Continue;
            }
        }

        match message {
            Inbound::Info(info) => handler.on_connect(&info).await,
            Inbound::Settings(settings) => handler.on_setting_update(&settings.values).await,
            Inbound::Action(action) => handler.on_action(action).await,
            Inbound::ClosePlugin(_) => {
                handler.on_shutdown().await;
                return Flow::Close;
            }
            Inbound::Other => debug!("Unhandled host message"),
        }

        Flow::Continue
    }
}

/// Write queued messages to the host until the channel closes
async fn write_loop(mut writer: OwnedWriteHalf, mut outbound_rx: mpsc::Receiver<Outbound>) -> Result<()> {
    while let Some(message) = outbound_rx.recv().await {
        writer.write_all(&codec::encode(&message)?).await?;
    }
    Ok(())
}
