//! Core data types for links, collision geometry, and cloud frames.

pub mod cloud;
pub mod geometry;

pub use cloud::PointCloudFrame;
pub use geometry::{CollisionGeometry, PrimitiveShape, TriangleMesh};
