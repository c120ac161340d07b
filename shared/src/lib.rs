//! WiZ Bridge Shared Types
//!
//! This crate provides the command model and the codecs shared by the bridge
//! and the mock light: the `setPilot` datagram codec spoken by WiZ bulbs and
//! the newline-delimited JSON framing spoken by the host application.

pub mod codec;
pub mod pilot;

use std::fmt;

/// Device-native brightness, always within `1..=255`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BrightnessLevel(u8);

impl BrightnessLevel {
    /// Lowest level a device accepts
    pub const MIN: BrightnessLevel = BrightnessLevel(1);

    /// Full brightness, used when a turn-on carries no explicit level
    pub const FULL: BrightnessLevel = BrightnessLevel(255);

    /// Create a level, returning `None` for 0
    pub fn new(level: u8) -> Option<Self> {
        if level == 0 {
            None
        } else {
            Some(Self(level))
        }
    }

    /// Rescale a user-facing percentage to a device level.
    ///
    /// Rounds half up (`50%` -> `128`) and clamps into `1..=255`, so `0%`
    /// still yields the minimum level. Returns `None` above 100%.
    pub fn from_percent(percent: u8) -> Option<Self> {
        if percent > 100 {
            return None;
        }
        let scaled = (u32::from(percent) * 255 + 50) / 100;
        Some(Self(scaled.clamp(1, 255) as u8))
    }

    /// Raw level value
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for BrightnessLevel {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Display for BrightnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single stateless light command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TurnOn,
    TurnOff,
    SetBrightness(BrightnessLevel),
}

impl Command {
    /// Brightness the light should end up at, `None` when turning off
    pub fn target_level(&self) -> Option<BrightnessLevel> {
        match self {
            Command::TurnOn => Some(BrightnessLevel::FULL),
            Command::TurnOff => None,
            Command::SetBrightness(level) => Some(*level),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::TurnOn => write!(f, "turn-on"),
            Command::TurnOff => write!(f, "turn-off"),
            Command::SetBrightness(level) => write!(f, "set-brightness({})", level),
        }
    }
}

/// Classification of a finished command attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    DeviceUnreachable,
    InvalidParameter,
    UnknownAction,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Success => "success",
            Outcome::DeviceUnreachable => "device unreachable",
            Outcome::InvalidParameter => "invalid parameter",
            Outcome::UnknownAction => "unknown action",
        };
        f.write_str(s)
    }
}

/// Defaults shared by the bridge and the mock light
pub mod defaults {
    /// UDP port WiZ bulbs listen on
    pub const DEVICE_PORT: u16 = 38899;

    /// Upper bound for a single command, including resends
    pub const COMMAND_TIMEOUT_MS: u64 = 5000;

    /// Interval between resends of an unanswered datagram
    pub const RESEND_INTERVAL_MS: u64 = 750;

    /// Concurrent commands allowed in flight
    pub const MAX_WORKERS: usize = 4;

    /// Host application plugin socket
    pub const HOST_ADDR: &str = "127.0.0.1:12136";

    /// Plugin identifier registered with the host
    pub const PLUGIN_ID: &str = "tp.plugin.wiz";
}
