//! UDP unicast publisher for cloud frames.
//!
//! Fire-and-forget: each frame is serialized, length-prefixed, and sent to
//! the configured target in a single datagram. Send errors are reported to
//! the caller, which logs and keeps cycling - a lost frame is stale within
//! one cycle anyway.

use crate::core::types::PointCloudFrame;
use crate::error::{Error, Result};
use crate::streaming::wire::{self, Serializer, WireFormat};
use crate::streaming::CloudSink;
use std::net::{SocketAddr, UdpSocket};

/// Typical cloud datagram size; the send buffer starts here and grows to
/// the largest frame seen
const INITIAL_SEND_BUFFER_SIZE: usize = 4096;

/// UDP unicast cloud publisher
pub struct UdpCloudPublisher {
    socket: UdpSocket,
    target: SocketAddr,
    serializer: Serializer,
    send_buffer: Vec<u8>,
    frames_sent: u64,
}

impl UdpCloudPublisher {
    /// Create a publisher sending to `target` in the given wire format.
    ///
    /// The socket binds to an ephemeral local port; this end only sends.
    pub fn connect(target: &str, format: WireFormat) -> Result<Self> {
        let target: SocketAddr = target
            .parse()
            .map_err(|e| Error::InvalidParameter(format!("publish address '{}': {}", target, e)))?;
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| Error::Other(format!("Failed to create UDP socket: {}", e)))?;

        log::info!("Cloud publisher streaming to {} ({:?})", target, format);

        Ok(Self {
            socket,
            target,
            serializer: Serializer::new(format),
            send_buffer: Vec::with_capacity(INITIAL_SEND_BUFFER_SIZE),
            frames_sent: 0,
        })
    }

    /// Number of frames successfully handed to the socket so far
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}

impl CloudSink for UdpCloudPublisher {
    fn publish(&mut self, frame: &PointCloudFrame) -> Result<()> {
        let payload = self.serializer.serialize(frame)?;
        wire::write_frame(&mut self.send_buffer, &payload)?;
        self.socket.send_to(&self.send_buffer, self.target)?;

        self.frames_sent += 1;
        log::trace!(
            "Published cloud frame {} ({} points, ts {}) to {}",
            self.frames_sent,
            frame.len(),
            frame.timestamp_us,
            self.target
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Vec3;
    use std::time::Duration;

    #[test]
    fn rejects_malformed_target() {
        let err = UdpCloudPublisher::connect("not-an-address", WireFormat::Json)
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn published_frame_arrives_length_prefixed() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let target = receiver.local_addr().unwrap().to_string();

        let mut publisher = UdpCloudPublisher::connect(&target, WireFormat::Json).unwrap();

        let mut frame = PointCloudFrame::new("base");
        frame.timestamp_us = 99;
        frame.points.push(Vec3::new(1.0, 0.0, 0.0));
        publisher.publish(&frame).unwrap();
        assert_eq!(publisher.frames_sent(), 1);

        let mut buf = [0u8; 4096];
        let (n, _) = receiver.recv_from(&mut buf).unwrap();
        let payload = wire::read_frame(&buf[..n]).unwrap();
        let back: PointCloudFrame = Serializer::new(WireFormat::Json)
            .deserialize(payload)
            .unwrap();
        assert_eq!(back, frame);
    }
}
