//! Simulated robot state for hardware-free development.
//!
//! Animates the model's links as a rigid cluster yawing about the world Z
//! axis, each link offset radially from the root, with optional Gaussian
//! translation jitter. Deterministic when seeded, so recorded cloud output
//! is reproducible run to run.

use crate::config::SimConfig;
use crate::core::math::{Quaternion, RigidTransform, Vec3};
use crate::error::{Error, Result};
use crate::state::monitor::{StateMonitor, StateSnapshot};
use crate::state::StateSource;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Pose generator behind the simulator thread.
///
/// Kept separate from the thread loop so pose sequences can be tested
/// without spawning anything.
pub struct SimState {
    links: Vec<String>,
    config: SimConfig,
    rng: SmallRng,
    /// Elapsed simulation time in seconds
    elapsed: f64,
}

impl SimState {
    /// Create a generator for the given links.
    ///
    /// Seed 0 draws entropy from the OS; any other seed is reproducible.
    pub fn new(links: Vec<String>, config: SimConfig) -> Self {
        let rng = if config.seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(config.seed)
        };
        Self {
            links,
            config,
            rng,
            elapsed: 0.0,
        }
    }

    /// Advance one simulation step and produce the next snapshot.
    pub fn next_snapshot(&mut self, timestamp_us: u64) -> StateSnapshot {
        let yaw = self.config.yaw_rate * self.elapsed;
        let base = RigidTransform::new(
            Quaternion::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), yaw),
            Vec3::zero(),
        );

        let mut snapshot = StateSnapshot::new(timestamp_us);
        for i in 0..self.links.len() {
            // Each link sits a little further out along the base X axis.
            let offset = RigidTransform::new(
                Quaternion::identity(),
                Vec3::new(0.1 * i as f64, 0.0, 0.0).add(self.jitter()),
            );
            snapshot.set_transform(self.links[i].clone(), base.compose(&offset));
        }

        self.elapsed += 1.0 / self.config.rate_hz;
        snapshot
    }

    fn jitter(&mut self) -> Vec3 {
        if self.config.jitter_stddev == 0.0 {
            return Vec3::zero();
        }
        let stddev = self.config.jitter_stddev;
        let nx: f64 = self.rng.sample(StandardNormal);
        let ny: f64 = self.rng.sample(StandardNormal);
        let nz: f64 = self.rng.sample(StandardNormal);
        Vec3::new(nx * stddev, ny * stddev, nz * stddev)
    }
}

/// State source backed by the simulator thread.
pub struct SimStateSource {
    monitor: Arc<StateMonitor>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimStateSource {
    /// Spawn the simulator thread publishing snapshots at the configured
    /// rate. The thread exits when either the daemon-wide `running` flag
    /// clears or this source is dropped.
    pub fn spawn(
        links: Vec<String>,
        config: SimConfig,
        running: Arc<AtomicBool>,
    ) -> Result<Self> {
        if config.rate_hz <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "sim rate_hz must be positive, got {}",
                config.rate_hz
            )));
        }

        let monitor = Arc::new(StateMonitor::new());
        let stop = Arc::new(AtomicBool::new(false));

        let thread_monitor = Arc::clone(&monitor);
        let thread_stop = Arc::clone(&stop);
        let period = Duration::from_secs_f64(1.0 / config.rate_hz);

        log::info!(
            "Starting state simulator: {} links at {} Hz (seed {})",
            links.len(),
            config.rate_hz,
            config.seed
        );

        let handle = thread::Builder::new()
            .name("state-sim".to_string())
            .spawn(move || {
                let mut sim = SimState::new(links, config);
                while running.load(Ordering::Relaxed) && !thread_stop.load(Ordering::Relaxed) {
                    thread_monitor.update(sim.next_snapshot(now_us()));
                    thread::sleep(period);
                }
                log::debug!("State simulator thread exiting");
            })
            .map_err(|e| Error::Other(format!("Failed to spawn state simulator: {}", e)))?;

        Ok(Self {
            monitor,
            stop,
            handle: Some(handle),
        })
    }
}

impl StateSource for SimStateSource {
    fn wait_for_fresh_state(&mut self, timeout: Duration) -> bool {
        self.monitor.wait_for_fresh_state(timeout)
    }

    fn snapshot(&self) -> Option<StateSnapshot> {
        self.monitor.snapshot()
    }
}

impl Drop for SimStateSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Current wall time in microseconds since epoch.
fn now_us() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}
