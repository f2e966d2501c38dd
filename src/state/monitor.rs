//! Shared robot-state monitor with a bounded, cancellable freshness wait.
//!
//! A feeder thread (UDP receiver or simulator) calls [`StateMonitor::update`]
//! whenever a new state snapshot arrives; the publish loop parks in
//! [`StateMonitor::wait_for_fresh_state`] until a snapshot newer than the
//! last one it consumed shows up or the timeout elapses. The wait is the
//! loop's single suspension point, so shutdown responsiveness is bounded by
//! the timeout.

use crate::core::math::RigidTransform;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// One atomic snapshot of resolved link transforms at a single instant.
///
/// The publish loop captures a snapshot once per cycle and builds entirely
/// against it; concurrent updates can never tear a cycle.
#[derive(Debug, Clone, Default)]
pub struct StateSnapshot {
    /// Snapshot timestamp in microseconds since epoch (simulation or wall
    /// time, whichever the upstream state publisher runs on)
    pub timestamp_us: u64,
    transforms: HashMap<String, RigidTransform>,
}

impl StateSnapshot {
    /// Create an empty snapshot at the given timestamp.
    pub fn new(timestamp_us: u64) -> Self {
        Self {
            timestamp_us,
            transforms: HashMap::new(),
        }
    }

    /// Record the world transform for a link.
    pub fn set_transform(&mut self, link: impl Into<String>, transform: RigidTransform) {
        self.transforms.insert(link.into(), transform);
    }

    /// Number of links with a resolved transform.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if the snapshot carries no transforms.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl crate::state::TransformLookup for StateSnapshot {
    fn world_transform(&self, link: &str) -> Option<RigidTransform> {
        self.transforms.get(link).copied()
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Update counter, bumped on every feeder update
    seq: u64,
    /// Last update counter handed out by a successful wait
    consumed: u64,
    snapshot: Option<StateSnapshot>,
}

/// Latest-state cell shared between one feeder thread and the publish loop.
///
/// Only the most recent snapshot is retained; the loop is a sampling
/// consumer, not a queue drain.
#[derive(Debug, Default)]
pub struct StateMonitor {
    inner: Mutex<Inner>,
    fresh: Condvar,
}

impl StateMonitor {
    /// Create a monitor with no state yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new snapshot and wake any parked waiter.
    pub fn update(&self, snapshot: StateSnapshot) {
        let mut inner = self.inner.lock();
        inner.seq += 1;
        inner.snapshot = Some(snapshot);
        self.fresh.notify_all();
    }

    /// Block until a snapshot newer than the last consumed one is available,
    /// or `timeout` elapses. Returns `true` exactly when fresh state exists.
    ///
    /// A timeout is the expected idle behavior while the upstream state
    /// publisher is quiet, not a failure.
    pub fn wait_for_fresh_state(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();
        loop {
            if inner.seq > inner.consumed {
                inner.consumed = inner.seq;
                return true;
            }
            if self.fresh.wait_until(&mut inner, deadline).timed_out() {
                // Re-check: the update may have landed right at the deadline.
                if inner.seq > inner.consumed {
                    inner.consumed = inner.seq;
                    return true;
                }
                return false;
            }
        }
    }

    /// Clone the latest snapshot, if any state has been received yet.
    pub fn snapshot(&self) -> Option<StateSnapshot> {
        self.inner.lock().snapshot.clone()
    }
}
