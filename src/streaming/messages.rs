//! Message types for the state channel.
//!
//! Inbound traffic only: an external forward-kinematics publisher resolves
//! link poses against its own kinematic model and streams them here. The
//! outbound cloud stream carries [`PointCloudFrame`][crate::core::types::PointCloudFrame]
//! directly; it needs no wrapper.

use crate::core::math::RigidTransform;
use crate::state::StateSnapshot;
use serde::{Deserialize, Serialize};

/// World pose of a single link at the update's timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPose {
    /// Link name as declared in the robot model
    pub link: String,
    /// Resolved body-to-world transform
    pub pose: RigidTransform,
}

/// One complete state update from the upstream kinematics publisher.
///
/// Every update is expected to carry poses for all links of interest;
/// the daemon keeps only the latest update, it does not merge partial ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    /// Timestamp in microseconds since epoch (simulation or wall time)
    pub timestamp_us: u64,
    /// Resolved link poses
    pub poses: Vec<LinkPose>,
}

impl StateUpdate {
    /// Convert the update into the snapshot form the publish loop consumes.
    pub fn into_snapshot(self) -> StateSnapshot {
        let mut snapshot = StateSnapshot::new(self.timestamp_us);
        for pose in self.poses {
            snapshot.set_transform(pose.link, pose.pose);
        }
        snapshot
    }
}
