//! Collision geometry attached to robot links.
//!
//! Only the mesh variant ever produces cloud points; primitive and unknown
//! shapes are enumerated so the builder can skip them exhaustively instead
//! of guessing from a runtime type tag.

use crate::core::math::Vec3;

/// Triangulated collision mesh: a flat vertex soup in the link's body frame.
///
/// Vertices are stored as consecutive (x, y, z) triples in meters. The model
/// loader guarantees the length is divisible by 3; a zero-vertex mesh is
/// valid and contributes no points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriangleMesh {
    /// Flat (x, y, z) vertex triples in the link's local frame
    pub vertices: Vec<f64>,
}

impl TriangleMesh {
    /// Create a mesh from flat vertex data.
    pub fn new(vertices: Vec<f64>) -> Self {
        Self { vertices }
    }

    /// Number of vertices (triples) in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Check if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over the vertices as points, in storage order.
    pub fn iter_vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
    }
}

/// Primitive collision shapes. Present in model descriptions but never
/// rasterized into cloud points.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveShape {
    /// Axis-aligned box, full extents in meters
    Box {
        /// (x, y, z) side lengths in meters
        size: [f64; 3],
    },
    /// Sphere centered on the link origin
    Sphere {
        /// Radius in meters
        radius: f64,
    },
    /// Cylinder along the link Z axis
    Cylinder {
        /// Radius in meters
        radius: f64,
        /// Length in meters
        length: f64,
    },
}

/// Collision geometry variants a link can carry.
///
/// The builder matches this exhaustively: only `Mesh` produces points,
/// `Primitive` and `Unknown` are deliberate no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionGeometry {
    /// Triangulated mesh - the only variant converted to points
    Mesh(TriangleMesh),
    /// Primitive shape - skipped by the cloud builder
    Primitive(PrimitiveShape),
    /// Unrecognized shape descriptor - skipped like a primitive
    Unknown,
}

impl CollisionGeometry {
    /// Borrow the mesh if this geometry is one.
    pub fn as_mesh(&self) -> Option<&TriangleMesh> {
        match self {
            CollisionGeometry::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}
