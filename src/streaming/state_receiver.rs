//! UDP receiver for inbound link pose updates.
//!
//! Listens on the configured state channel and feeds every decoded
//! [`StateUpdate`] into a [`StateMonitor`], where the publish loop picks it
//! up through the bounded freshness wait. Malformed datagrams are logged
//! and dropped; the channel stays up.

use crate::error::{Error, Result};
use crate::state::monitor::{StateMonitor, StateSnapshot};
use crate::state::StateSource;
use crate::streaming::messages::StateUpdate;
use crate::streaming::wire::{self, Serializer, WireFormat};
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Largest accepted state datagram (length prefix included)
const MAX_STATE_DATAGRAM: usize = 65_536;

/// Socket read timeout; bounds how long shutdown can lag
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// State source fed by UDP pose-update datagrams
pub struct UdpStateSource {
    monitor: Arc<StateMonitor>,
    local_addr: SocketAddr,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl UdpStateSource {
    /// Bind the state channel and spawn the receiver thread.
    ///
    /// The thread exits when either the daemon-wide `running` flag clears
    /// or this source is dropped.
    pub fn bind(
        bind_address: &str,
        format: WireFormat,
        running: Arc<AtomicBool>,
    ) -> Result<Self> {
        let socket = UdpSocket::bind(bind_address)
            .map_err(|e| Error::Other(format!("Failed to bind to {}: {}", bind_address, e)))?;
        socket.set_read_timeout(Some(READ_TIMEOUT))?;
        let local_addr = socket.local_addr()?;

        log::info!("State channel listening on {} ({:?})", local_addr, format);

        let monitor = Arc::new(StateMonitor::new());
        let stop = Arc::new(AtomicBool::new(false));

        let thread_monitor = Arc::clone(&monitor);
        let thread_stop = Arc::clone(&stop);
        let serializer = Serializer::new(format);

        let handle = thread::Builder::new()
            .name("state-receiver".to_string())
            .spawn(move || {
                run_receive_loop(socket, serializer, thread_monitor, running, thread_stop);
            })
            .map_err(|e| Error::Other(format!("Failed to spawn state receiver: {}", e)))?;

        Ok(Self {
            monitor,
            local_addr,
            stop,
            handle: Some(handle),
        })
    }

    /// Address the state channel actually bound to (useful with port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl StateSource for UdpStateSource {
    fn wait_for_fresh_state(&mut self, timeout: Duration) -> bool {
        self.monitor.wait_for_fresh_state(timeout)
    }

    fn snapshot(&self) -> Option<StateSnapshot> {
        self.monitor.snapshot()
    }
}

impl Drop for UdpStateSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_receive_loop(
    socket: UdpSocket,
    serializer: Serializer,
    monitor: Arc<StateMonitor>,
    running: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
) {
    let mut buf = [0u8; MAX_STATE_DATAGRAM];
    let mut updates: u64 = 0;

    while running.load(Ordering::Relaxed) && !stop.load(Ordering::Relaxed) {
        match socket.recv_from(&mut buf) {
            Ok((n, addr)) => match decode_update(&serializer, &buf[..n]) {
                Ok(update) => {
                    updates += 1;
                    log::trace!(
                        "State update {} from {}: {} poses, ts {}",
                        updates,
                        addr,
                        update.poses.len(),
                        update.timestamp_us
                    );
                    monitor.update(update.into_snapshot());
                }
                Err(e) => {
                    log::warn!("Dropping malformed state datagram from {}: {}", addr, e);
                }
            },
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                // Read timeout - just re-check the shutdown flags.
            }
            Err(e) => {
                log::error!("State channel receive error: {}", e);
                thread::sleep(READ_TIMEOUT);
            }
        }
    }
    log::debug!("State receiver thread exiting after {} updates", updates);
}

fn decode_update(serializer: &Serializer, datagram: &[u8]) -> Result<StateUpdate> {
    let payload = wire::read_frame(datagram)?;
    serializer.deserialize(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::{RigidTransform, Vec3};
    use crate::state::TransformLookup;
    use crate::streaming::messages::LinkPose;

    fn send_update(target: SocketAddr, format: WireFormat, update: &StateUpdate) {
        let serializer = Serializer::new(format);
        let payload = serializer.serialize(update).unwrap();
        let mut frame = Vec::new();
        wire::write_frame(&mut frame, &payload).unwrap();

        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(&frame, target).unwrap();
    }

    #[test]
    fn receives_and_installs_state_update() {
        let running = Arc::new(AtomicBool::new(true));
        let mut source =
            UdpStateSource::bind("127.0.0.1:0", WireFormat::Postcard, Arc::clone(&running))
                .unwrap();

        let update = StateUpdate {
            timestamp_us: 7_000,
            poses: vec![LinkPose {
                link: "base".to_string(),
                pose: RigidTransform::new(Default::default(), Vec3::new(0.5, 0.0, 0.0)),
            }],
        };
        send_update(source.local_addr(), WireFormat::Postcard, &update);

        assert!(source.wait_for_fresh_state(Duration::from_secs(2)));
        let snapshot = source.snapshot().unwrap();
        assert_eq!(snapshot.timestamp_us, 7_000);
        let tf = snapshot.world_transform("base").unwrap();
        assert_eq!(tf.translation.x, 0.5);

        running.store(false, Ordering::Relaxed);
    }

    #[test]
    fn malformed_datagram_is_dropped_channel_stays_up() {
        let running = Arc::new(AtomicBool::new(true));
        let mut source =
            UdpStateSource::bind("127.0.0.1:0", WireFormat::Json, Arc::clone(&running)).unwrap();

        // Garbage first: no valid prefix, no valid payload.
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(b"garbage", source.local_addr()).unwrap();

        // A valid update afterwards must still get through.
        let update = StateUpdate {
            timestamp_us: 1,
            poses: vec![LinkPose {
                link: "base".to_string(),
                pose: RigidTransform::identity(),
            }],
        };
        send_update(source.local_addr(), WireFormat::Json, &update);

        assert!(source.wait_for_fresh_state(Duration::from_secs(2)));
        assert!(source.snapshot().unwrap().world_transform("base").is_some());

        running.store(false, Ordering::Relaxed);
    }
}
