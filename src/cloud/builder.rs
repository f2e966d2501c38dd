//! Cloud builder: link meshes + world transforms -> one cloud frame.
//!
//! This is the computational core of the daemon. Per cycle it applies each
//! link's body-to-world transform to every vertex of that link's collision
//! mesh and flattens the results into a single ordered point sequence.
//! Everything around it is acquisition or transport.

use crate::core::types::{CollisionGeometry, PointCloudFrame};
use crate::error::{Error, Result};
use crate::model::LinkModel;
use crate::state::TransformLookup;

/// Builds world-frame cloud frames from link geometry and link transforms.
///
/// The builder owns one reusable output frame: each build clears and refills
/// the point buffer in place, so steady-state cycles allocate nothing. The
/// frame id is fixed at construction for the process lifetime.
#[derive(Debug)]
pub struct CloudBuilder {
    frame: PointCloudFrame,
}

impl CloudBuilder {
    /// Create a builder producing frames in the given root frame.
    pub fn new(root_frame_name: impl Into<String>) -> Self {
        Self {
            frame: PointCloudFrame::new(root_frame_name),
        }
    }

    /// Name of the root frame all output points are expressed in
    pub fn frame_id(&self) -> &str {
        &self.frame.frame_id
    }

    /// Build one cloud frame.
    ///
    /// Iterates `links` in the given order; only mesh geometry produces
    /// points (primitive and unknown shapes are skipped by design, without
    /// error). For every link that does carry a mesh, `transforms` must
    /// resolve a world transform - otherwise the whole cycle fails with
    /// [`Error::MissingTransform`] and nothing is published, never a
    /// partial cloud.
    ///
    /// The output point order is link order, then vertex order within each
    /// mesh: deterministic and reproducible, with no semantic meaning
    /// across links. `timestamp_us` is stamped onto the frame after the
    /// point pass.
    pub fn build(
        &mut self,
        links: &[&LinkModel],
        transforms: &dyn TransformLookup,
        timestamp_us: u64,
    ) -> Result<&PointCloudFrame> {
        self.frame.clear();

        for link in links {
            let Some(geometry) = &link.geometry else {
                // Links without collision geometry are filtered out
                // upstream; tolerate them anyway.
                continue;
            };
            match geometry {
                CollisionGeometry::Mesh(mesh) => {
                    let transform = transforms
                        .world_transform(&link.name)
                        .ok_or_else(|| Error::MissingTransform(link.name.clone()))?;
                    log::debug!(
                        "Link '{}': transforming {} vertices",
                        link.name,
                        mesh.vertex_count()
                    );
                    log::trace!("Link '{}' world transform: {:?}", link.name, transform);

                    for vertex in mesh.iter_vertices() {
                        self.frame.points.push(transform.transform_point(vertex));
                    }
                }
                CollisionGeometry::Primitive(shape) => {
                    log::debug!(
                        "Link '{}': skipping primitive collision shape {:?}",
                        link.name,
                        shape
                    );
                }
                CollisionGeometry::Unknown => {
                    log::debug!("Link '{}': skipping unknown collision shape", link.name);
                }
            }
        }

        self.frame.timestamp_us = timestamp_us;
        Ok(&self.frame)
    }
}
