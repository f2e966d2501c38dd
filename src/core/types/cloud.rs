//! Point cloud frame type.

use crate::core::math::Vec3;
use serde::{Deserialize, Serialize};

/// One complete, timestamped set of world-frame points produced in a single
/// publish cycle.
///
/// Point order is link iteration order, then vertex order within each
/// link's mesh - deterministic, but carrying no semantic meaning across
/// links. The backing storage is cleared and refilled each cycle, never
/// appended across cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloudFrame {
    /// Name of the world/root frame all points are expressed in.
    /// Fixed for the process lifetime.
    pub frame_id: String,
    /// Timestamp in microseconds since epoch, set once per cycle
    pub timestamp_us: u64,
    /// World-frame points in meters
    pub points: Vec<Vec3>,
}

impl PointCloudFrame {
    /// Create an empty frame for the given root frame.
    pub fn new(frame_id: impl Into<String>) -> Self {
        Self {
            frame_id: frame_id.into(),
            timestamp_us: 0,
            points: Vec::new(),
        }
    }

    /// Create an empty frame with preallocated point storage.
    pub fn with_capacity(frame_id: impl Into<String>, capacity: usize) -> Self {
        Self {
            frame_id: frame_id.into(),
            timestamp_us: 0,
            points: Vec::with_capacity(capacity),
        }
    }

    /// Number of points in the frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the frame has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop all points, keeping the frame id and the allocated storage.
    #[inline]
    pub fn clear(&mut self) {
        self.points.clear();
        self.timestamp_us = 0;
    }
}
