mod command;
mod config;
mod host;
mod light;
mod router;
mod settings;
mod transport;

use command::CommandDispatcher;
use config::BridgeConfig;
use dotenvy::dotenv;
use host::HostSession;
use light::DeviceClient;
use router::ActionRouter;
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use transport::WizUdpDriver;

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let config = BridgeConfig::from_env();

    let (log_file, log_file_error) = match config.log_file.as_deref().map(open_log_file).transpose() {
        Ok(file) => (file, None),
        Err(e) => (None, Some(e)),
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(log_file.map(|file| fmt::layer().with_ansi(false).with_writer(Mutex::new(file))))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    if let Some(e) = log_file_error {
        warn!("Logging to stdout only: {:#}", e);
    }

    info!("Starting Wiz Plugin v{}", env!("CARGO_PKG_VERSION"));
    info!("  Host: {}", config.host_addr);
    info!("  Workers: {}", config.workers);
    info!("  Command timeout: {:?}", config.command_timeout);

    let driver = Arc::new(WizUdpDriver::new(config.device_port, config.resend_interval));
    let client = DeviceClient::new(driver, config.command_timeout);
    let dispatcher = CommandDispatcher::new(client);

    let session = HostSession::new(
        config.host_addr.clone(),
        config.plugin_id.clone(),
        config.connect_timeout,
    );
    let router = ActionRouter::new(dispatcher, config.workers, session.get_sender());

    // Errors are logged by the router as they happen
    let code = match session.run(&router).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    };

    info!("Wiz Plugin stopped");
    code
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
