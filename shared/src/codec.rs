//! Newline-delimited JSON codec for the host connection
//!
//! All messages are framed as:
//! ```text
//! [ N bytes: UTF-8 JSON object ][ '\n' ]
//! ```
//!
//! A trailing `'\r'` before the newline is tolerated and blank lines are skipped.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Maximum line size (64 KiB) to prevent memory exhaustion
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Line too long: {0} bytes (max: {MAX_LINE_LEN})")]
    LineTooLong(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// Whether the stream can continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CodecError::Json(_))
    }
}

/// Encode a message into a newline-terminated buffer
pub fn encode<T: Serialize>(message: &T) -> Result<Bytes, CodecError> {
    let mut buf = BytesMut::new();
    encode_into(message, &mut buf)?;
    Ok(buf.freeze())
}

/// Encode a message directly into a provided buffer
pub fn encode_into<T: Serialize>(message: &T, buf: &mut BytesMut) -> Result<(), CodecError> {
    let body = serde_json::to_vec(message)?;

    if body.len() > MAX_LINE_LEN {
        return Err(CodecError::LineTooLong(body.len()));
    }

    buf.reserve(body.len() + 1);
    buf.put_slice(&body);
    buf.put_u8(b'\n');

    Ok(())
}

/// Try to decode one line from a buffer
///
/// Returns:
/// - `Ok(Some(message))` if a complete line was decoded
/// - `Ok(None)` if more data is needed
/// - `Err(...)` if the data is invalid; a malformed line is consumed so the
///   caller may keep decoding
pub fn decode<T: DeserializeOwned>(buf: &mut BytesMut) -> Result<Option<T>, CodecError> {
    loop {
        let newline = match buf.iter().position(|b| *b == b'\n') {
            Some(pos) => pos,
            None => {
                if buf.len() > MAX_LINE_LEN {
                    return Err(CodecError::LineTooLong(buf.len()));
                }
                return Ok(None);
            }
        };

        if newline > MAX_LINE_LEN {
            return Err(CodecError::LineTooLong(newline));
        }

        let mut line = buf.split_to(newline);
        buf.advance(1);

        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }

        if line.iter().all(|b| b.is_ascii_whitespace()) {
            continue;
        }

        return Ok(Some(serde_json::from_slice(&line)?));
    }
}

/// Decoder state machine for streaming decoding
#[derive(Debug, Default)]
pub struct LineDecoder {
    /// Partial line data being accumulated
    buffer: BytesMut,
}

impl LineDecoder {
    /// Create a new line decoder
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Add data to the decoder buffer
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode the next line from the buffer
    ///
    /// Call this repeatedly until it returns `Ok(None)` to drain all complete lines
    pub fn decode_next<T: DeserializeOwned>(&mut self) -> Result<Option<T>, CodecError> {
        decode(&mut self.buffer)
    }

    /// Get the current buffer length (for debugging)
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}
