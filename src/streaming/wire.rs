//! Wire format serialization and framing.
//!
//! Every datagram on both channels (inbound state updates, outbound cloud
//! frames) uses the same length-prefixed framing:
//!
//! ```text
//! ┌──────────────────┬──────────────────────────┐
//! │ Length (4 bytes) │ Payload (variable)       │
//! │ Big-endian u32   │ JSON or Postcard binary  │
//! └──────────────────┴──────────────────────────┘
//! ```
//!
//! - **Length field**: 4-byte big-endian unsigned integer
//! - **Maximum payload size**: 1 MB; oversized frames are rejected
//! - **JSON**: human-readable, for development and cross-language clients
//! - **Postcard**: compact binary, for high-frequency production streams
//!
//! A malformed or oversized frame is logged and discarded by receivers;
//! it never aborts the daemon.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Maximum payload size accepted on either channel (1 MB)
pub const MAX_PAYLOAD_SIZE: usize = 1_048_576;

/// Supported wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// Binary format using postcard - fast and compact
    Postcard,
    /// JSON format - human-readable for debugging
    #[default]
    Json,
}

/// Serializer that can handle both formats
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    format: WireFormat,
}

impl Serializer {
    /// Create a new serializer for the given format
    pub fn new(format: WireFormat) -> Self {
        Self { format }
    }

    /// The wire format this serializer speaks
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Serialize a message to bytes
    pub fn serialize<T: Serialize>(&self, msg: &T) -> Result<Vec<u8>> {
        match self.format {
            WireFormat::Postcard => {
                postcard::to_allocvec(msg).map_err(|e| Error::Serialization(e.to_string()))
            }
            WireFormat::Json => {
                serde_json::to_vec(msg).map_err(|e| Error::Serialization(e.to_string()))
            }
        }
    }

    /// Deserialize bytes to a message
    pub fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self.format {
            WireFormat::Postcard => {
                postcard::from_bytes(bytes).map_err(|e| Error::Serialization(e.to_string()))
            }
            WireFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| Error::Serialization(e.to_string()))
            }
        }
    }
}

/// Write a length-prefixed frame into `buf`, replacing its contents.
///
/// The buffer keeps its allocation across calls so the steady-state publish
/// path does not reallocate.
pub fn write_frame(buf: &mut Vec<u8>, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(Error::Serialization(format!(
            "payload of {} bytes exceeds the {} byte frame limit",
            payload.len(),
            MAX_PAYLOAD_SIZE
        )));
    }
    buf.clear();
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(payload);
    Ok(())
}

/// Extract the payload from a length-prefixed frame.
pub fn read_frame(frame: &[u8]) -> Result<&[u8]> {
    if frame.len() < 4 {
        return Err(Error::Serialization(format!(
            "frame of {} bytes is shorter than the length prefix",
            frame.len()
        )));
    }
    let declared = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;
    if declared > MAX_PAYLOAD_SIZE {
        return Err(Error::Serialization(format!(
            "declared payload of {} bytes exceeds the {} byte frame limit",
            declared, MAX_PAYLOAD_SIZE
        )));
    }
    let payload = &frame[4..];
    if payload.len() != declared {
        return Err(Error::Serialization(format!(
            "declared payload of {} bytes but frame carries {}",
            declared,
            payload.len()
        )));
    }
    Ok(payload)
}
