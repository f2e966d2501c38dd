//! KayaCloud - robot self-geometry point cloud daemon
//!
//! Continuously converts a kinematic robot model's current configuration
//! into a 3-D point cloud of the robot's own collision geometry in world
//! coordinates, so the robot can "see" its own body in the same
//! representation external sensors produce (self-filtering, occupancy
//! mapping).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     app                             │  ← Publish loop
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌──────────────────┐ ┌──────────────────┐ ┌───────────┐
//! │      state/      │ │      cloud/      │ │ streaming/│
//! │ (monitor, sim)   │ │    (builder)     │ │ (wire,UDP)│
//! └──────────────────┘ └──────────────────┘ └───────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    model/                           │  ← Robot description
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                 (math, types)                       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Forward kinematics, model distribution, and cloud consumption all live
//! outside this daemon: link transforms arrive pre-resolved on the state
//! channel, and built frames leave as fire-and-forget UDP datagrams.

pub mod app;
pub mod cloud;
pub mod config;
pub mod core;
pub mod error;
pub mod model;
pub mod state;
pub mod streaming;

// Re-export commonly used types
pub use crate::app::CloudApp;
pub use crate::cloud::CloudBuilder;
pub use crate::config::Config;
pub use crate::core::math::{Quaternion, RigidTransform, Vec3};
pub use crate::core::types::{CollisionGeometry, PointCloudFrame, PrimitiveShape, TriangleMesh};
pub use crate::error::{Error, Result};
pub use crate::model::{LinkModel, RobotModel};
pub use crate::state::{StateMonitor, StateSnapshot, StateSource, TransformLookup};
pub use crate::streaming::{CloudSink, WireFormat};
