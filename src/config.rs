//! Bridge configuration
//!
//! Defaults match a stock host install; each field can be overridden from the
//! environment (or a `.env` file loaded in `main`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use wiz_bridge_shared::defaults;

/// Configuration for the bridge process
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Host application plugin socket
    pub host_addr: String,
    /// Plugin identifier used for pairing and message filtering
    pub plugin_id: String,
    /// Timeout for the initial host connection
    pub connect_timeout: Duration,
    /// Upper bound for one light command, resends included
    pub command_timeout: Duration,
    /// Delay between resends of an unanswered datagram
    pub resend_interval: Duration,
    /// Commands allowed in flight at once
    pub workers: usize,
    /// UDP port the lights listen on
    pub device_port: u16,
    /// Append logs to this file as well as stdout
    pub log_file: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host_addr: defaults::HOST_ADDR.into(),
            plugin_id: defaults::PLUGIN_ID.into(),
            connect_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_millis(defaults::COMMAND_TIMEOUT_MS),
            resend_interval: Duration::from_millis(defaults::RESEND_INTERVAL_MS),
            workers: defaults::MAX_WORKERS,
            device_port: defaults::DEVICE_PORT,
            log_file: None,
        }
    }
}

impl BridgeConfig {
    /// Defaults overlaid with `WIZ_*` environment variables.
    ///
    /// Empty or unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = BridgeConfig::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("WIZ_HOST_ADDR") {
            cfg.host_addr = v;
        }
        if let Some(ms) = get("WIZ_CONNECT_TIMEOUT_MS").and_then(|v| v.parse::<u64>().ok()) {
            cfg.connect_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = get("WIZ_COMMAND_TIMEOUT_MS").and_then(|v| v.parse::<u64>().ok()) {
            if ms > 0 {
                cfg.command_timeout = Duration::from_millis(ms);
            }
        }
        if let Some(ms) = get("WIZ_RESEND_INTERVAL_MS").and_then(|v| v.parse::<u64>().ok()) {
            if ms > 0 {
                cfg.resend_interval = Duration::from_millis(ms);
            }
        }
        if let Some(n) = get("WIZ_WORKERS").and_then(|v| v.parse::<usize>().ok()) {
            if n > 0 {
                cfg.workers = n;
            }
        }
        if let Some(port) = get("WIZ_DEVICE_PORT").and_then(|v| v.parse::<u16>().ok()) {
            cfg.device_port = port;
        }
        if let Some(path) = get("WIZ_LOG_FILE") {
            cfg.log_file = Some(PathBuf::from(path));
        }

        cfg
    }
}
