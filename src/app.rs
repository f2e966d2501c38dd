//! Application orchestration for the KayaCloud daemon.
//!
//! Wires the collaborators together at startup and drives the publish
//! cycle: wait for fresh robot state, build the cloud, hand it to the
//! sink, repeat until shutdown.

use crate::cloud::CloudBuilder;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::RobotModel;
use crate::state::{create_state_source, StateSource};
use crate::streaming::{CloudSink, UdpCloudPublisher};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Main application: owns the model, the state source, the builder, and
/// the transport sink.
pub struct CloudApp {
    model: RobotModel,
    state: Box<dyn StateSource>,
    sink: Box<dyn CloudSink>,
    builder: CloudBuilder,
    wait_timeout: Duration,
    running: Arc<AtomicBool>,
}

impl CloudApp {
    /// Construct the daemon from its configuration.
    ///
    /// Loads the robot model (fatal if missing or malformed), creates the
    /// configured state source, and connects the cloud publisher.
    pub fn new(config: Config, running: Arc<AtomicBool>) -> Result<Self> {
        log::info!("Loading robot model from {}", config.model.description);
        let model = RobotModel::from_file(&config.model.description)?;
        log::info!(
            "Robot model: {} links, {} with collision geometry, root '{}'",
            model.links().len(),
            model.links_with_collision_geometry().len(),
            model.root_link_name()
        );

        let state = create_state_source(&config, &model, Arc::clone(&running))?;
        let sink = Box::new(UdpCloudPublisher::connect(
            &config.streaming.publish_address,
            config.streaming.wire_format,
        )?);

        Ok(Self::from_parts(config, model, state, sink, running))
    }

    /// Assemble the daemon from already-built collaborators.
    ///
    /// This is the seam the integration tests use to drive the real loop
    /// with scripted state and a recording sink.
    pub fn from_parts(
        config: Config,
        model: RobotModel,
        state: Box<dyn StateSource>,
        sink: Box<dyn CloudSink>,
        running: Arc<AtomicBool>,
    ) -> Self {
        let builder = CloudBuilder::new(model.root_link_name());
        Self {
            model,
            state,
            sink,
            builder,
            wait_timeout: Duration::from_millis(config.state.wait_timeout_ms),
            running,
        }
    }

    /// Run the publish loop until the shutdown flag clears.
    ///
    /// Per cycle: bounded wait for fresh state (a timeout logs a "waiting"
    /// notification and retries forever - the expected idle behavior), then
    /// build and publish. A missing link transform drops the cycle without
    /// publishing; a sink error is logged and the loop keeps going. Only
    /// errors that indicate a broken setup propagate out.
    pub fn run(&mut self) -> Result<()> {
        log::info!(
            "Publishing robot cloud frames in '{}' (state wait timeout {} ms)",
            self.builder.frame_id(),
            self.wait_timeout.as_millis()
        );

        while self.running.load(Ordering::Relaxed) {
            if !self.state.wait_for_fresh_state(self.wait_timeout) {
                log::info!("Waiting for robot state update...");
                continue;
            }
            let Some(snapshot) = self.state.snapshot() else {
                continue;
            };

            let links = self.model.links_with_collision_geometry();
            match self
                .builder
                .build(&links, &snapshot, snapshot.timestamp_us)
            {
                Ok(frame) => {
                    if let Err(e) = self.sink.publish(frame) {
                        log::warn!("Failed to publish cloud frame: {}", e);
                    }
                }
                Err(Error::MissingTransform(link)) => {
                    log::warn!("Dropping cycle: no transform for link '{}'", link);
                }
                Err(e) => return Err(e),
            }
        }

        log::info!("Publish loop stopped");
        Ok(())
    }
}
