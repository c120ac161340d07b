//! `setPilot` datagram codec for WiZ bulbs
//!
//! Every command is a single JSON datagram sent to the bulb on UDP port 38899:
//! ```text
//! {"method":"setPilot","params":{"state":true,"dimming":50}}
//! ```
//! The bulb answers with `{"method":"setPilot","result":{"success":true}}`, or
//! an `error` object when it rejects the request.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BrightnessLevel, Command};

/// Method name for state changes
pub const SET_PILOT: &str = "setPilot";

/// WiZ dimming floor; bulbs ignore anything lower
pub const MIN_DIMMING: u8 = 10;

/// Largest datagram we expect from a bulb
pub const MAX_DATAGRAM_SIZE: usize = 1024;

/// Errors that can occur while encoding a pilot or reading a reply
#[derive(Error, Debug)]
pub enum PilotError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Device error {code}: {message}")]
    Device { code: i64, message: String },

    #[error("Device did not acknowledge {method}")]
    NotAcknowledged { method: String },

    #[error("Reply carries neither result nor error")]
    EmptyReply,
}

/// Outgoing request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotRequest {
    pub method: String,
    pub params: PilotParams,
}

/// Light state carried by a `setPilot`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotParams {
    pub state: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimming: Option<u8>,
}

/// Reply from the bulb
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PilotResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PilotResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<PilotFault>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PilotResult {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PilotFault {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Map a device level (1-255) onto the WiZ dimming scale (10-100)
pub fn dimming_for(level: BrightnessLevel) -> u8 {
    let percent = (u32::from(level.get()) * 100 + 127) / 255;
    (percent as u8).max(MIN_DIMMING)
}

impl PilotRequest {
    /// Build the request for a command
    pub fn for_command(command: &Command) -> Self {
        let params = match command.target_level() {
            Some(level) => PilotParams {
                state: true,
                dimming: Some(dimming_for(level)),
            },
            None => PilotParams {
                state: false,
                dimming: None,
            },
        };

        Self {
            method: SET_PILOT.into(),
            params,
        }
    }
}

/// Encode a command into a datagram
pub fn encode(command: &Command) -> Result<Bytes, PilotError> {
    let body = serde_json::to_vec(&PilotRequest::for_command(command))?;
    Ok(Bytes::from(body))
}

/// Decode a request datagram (used by the mock light)
pub fn decode_request(datagram: &[u8]) -> Result<PilotRequest, PilotError> {
    Ok(serde_json::from_slice(datagram)?)
}

/// Decode a reply datagram, succeeding only when the bulb acknowledged
pub fn decode_response(datagram: &[u8]) -> Result<PilotResponse, PilotError> {
    let response: PilotResponse = serde_json::from_slice(datagram)?;

    if let Some(fault) = &response.error {
        return Err(PilotError::Device {
            code: fault.code,
            message: fault.message.clone(),
        });
    }

    match &response.result {
        Some(result) if result.success => Ok(response),
        Some(_) => Err(PilotError::NotAcknowledged {
            method: response.method.clone().unwrap_or_else(|| SET_PILOT.into()),
        }),
        None => Err(PilotError::EmptyReply),
    }
}

/// Encode an acknowledgement for `method` (used by the mock light)
pub fn encode_ack(method: &str) -> Result<Bytes, PilotError> {
    let response = PilotResponse {
        method: Some(method.into()),
        env: Some("pro".into()),
        result: Some(PilotResult { success: true }),
        error: None,
    };
    Ok(Bytes::from(serde_json::to_vec(&response)?))
}
