//! Robot state acquisition: the transform provider side of the pipeline.
//!
//! Forward kinematics happens outside this daemon; what arrives here are
//! already-resolved world transforms per link. Two feeders exist:
//!
//! - [`UdpStateSource`][crate::streaming::UdpStateSource]: listens on the
//!   configured state channel for pose-update datagrams from an external
//!   kinematics publisher
//! - [`sim::SimStateSource`]: deterministic seeded simulator for
//!   hardware-free development and testing
//!
//! Both feed a [`StateMonitor`]; the publish loop only ever sees the
//! [`StateSource`] trait.

pub mod monitor;
pub mod sim;

pub use monitor::{StateMonitor, StateSnapshot};

use crate::config::{Config, DEFAULT_STATE_BIND};
use crate::core::math::RigidTransform;
use crate::error::{Error, Result};
use crate::model::RobotModel;
use crate::streaming::UdpStateSource;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// Lookup of world transforms by link name, fixed for one build cycle.
pub trait TransformLookup {
    /// World transform for the named link, if the current state resolves it.
    fn world_transform(&self, link: &str) -> Option<RigidTransform>;
}

impl TransformLookup for HashMap<String, RigidTransform> {
    fn world_transform(&self, link: &str) -> Option<RigidTransform> {
        self.get(link).copied()
    }
}

/// Source of robot state snapshots driving the publish loop.
pub trait StateSource: Send {
    /// Block up to `timeout` for state newer than the last consumed
    /// snapshot. Returns `true` exactly when fresh state is available.
    fn wait_for_fresh_state(&mut self, timeout: Duration) -> bool;

    /// Latest snapshot, if any state has been received yet.
    fn snapshot(&self) -> Option<StateSnapshot>;
}

/// Create the state source selected by `state.source` in the configuration.
pub fn create_state_source(
    config: &Config,
    model: &RobotModel,
    running: Arc<AtomicBool>,
) -> Result<Box<dyn StateSource>> {
    match config.state.source.as_str() {
        "udp" => {
            let bind_address = config.state.bind_address.clone().unwrap_or_else(|| {
                log::warn!(
                    "state.bind_address not set, falling back to default: {}",
                    DEFAULT_STATE_BIND
                );
                DEFAULT_STATE_BIND.to_string()
            });
            let source =
                UdpStateSource::bind(&bind_address, config.streaming.wire_format, running)?;
            Ok(Box::new(source))
        }
        "sim" => {
            let links: Vec<String> = model
                .links_with_collision_geometry()
                .iter()
                .map(|link| link.name.clone())
                .collect();
            let source = sim::SimStateSource::spawn(links, config.state.sim.clone(), running)?;
            Ok(Box::new(source))
        }
        other => Err(Error::UnknownStateSource(other.to_string())),
    }
}
