//! Parameter validation for inbound actions

use std::net::Ipv4Addr;
use thiserror::Error;
use wiz_bridge_shared::BrightnessLevel;

/// Why an action's parameters were rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("No light address given")]
    MissingAddress,

    #[error("Not an IPv4 address: {0:?}")]
    InvalidAddress(String),

    #[error("No brightness given")]
    MissingBrightness,

    #[error("Brightness must be a whole percent between 0 and 100, got {0:?}")]
    InvalidBrightness(String),
}

/// Parse a light address, falling back to `fallback` when `raw` is blank
pub fn parse_address(raw: Option<&str>, fallback: &str) -> Result<Ipv4Addr, ParamError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    let candidate = if raw.is_empty() { fallback.trim() } else { raw };

    if candidate.is_empty() {
        return Err(ParamError::MissingAddress);
    }

    candidate
        .parse::<Ipv4Addr>()
        .map_err(|_| ParamError::InvalidAddress(candidate.to_string()))
}

/// Parse a user-facing percent into a device level
pub fn parse_percent(raw: Option<&str>) -> Result<BrightnessLevel, ParamError> {
    let raw = raw.map(str::trim).unwrap_or_default();

    if raw.is_empty() {
        return Err(ParamError::MissingBrightness);
    }

    raw.parse::<i64>()
        .ok()
        .and_then(|p| u8::try_from(p).ok())
        .and_then(BrightnessLevel::from_percent)
        .ok_or_else(|| ParamError::InvalidBrightness(raw.to_string()))
}
