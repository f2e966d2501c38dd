//! Streaming layer: wire framing, state channel, and cloud publishing.
//!
//! - **Inbound (UDP)**: link pose updates from an external kinematics
//!   publisher ([`UdpStateSource`])
//! - **Outbound (UDP unicast)**: length-prefixed cloud frames to a single
//!   configured client ([`UdpCloudPublisher`]), fire-and-forget

pub mod messages;
pub mod state_receiver;
pub mod udp_publisher;
pub mod wire;

pub use messages::{LinkPose, StateUpdate};
pub use state_receiver::UdpStateSource;
pub use udp_publisher::UdpCloudPublisher;
pub use wire::{Serializer, WireFormat};

use crate::core::types::PointCloudFrame;
use crate::error::Result;

/// Transport sink for built cloud frames.
///
/// `publish` is fire-and-forget: the core hands over a fully built frame
/// and expects no acknowledgment. The frame is only borrowed for the call;
/// the builder reclaims and overwrites its buffer on the next cycle.
pub trait CloudSink: Send {
    /// Ship one frame. Errors are non-fatal to the publish loop.
    fn publish(&mut self, frame: &PointCloudFrame) -> Result<()>;
}
