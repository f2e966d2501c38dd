//! Robot model description: links and their collision geometry.
//!
//! The model is loaded once at startup from a TOML description file and
//! stays immutable for the process lifetime. A missing file is a fatal
//! startup error; a malformed one likewise. The publish loop only ever
//! borrows links read-only, one cycle at a time.
//!
//! # Model file format
//!
//! ```toml
//! root_link = "base"
//!
//! [[links]]
//! name = "base"
//!
//! [[links]]
//! name = "shell"
//! geometry = { kind = "mesh", vertices = [0.0, 0.0, 0.0, 0.1, 0.0, 0.0, 0.0, 0.1, 0.0] }
//!
//! [[links]]
//! name = "bumper"
//! geometry = { kind = "sphere", radius = 0.05 }
//! ```

use crate::core::types::{CollisionGeometry, PrimitiveShape, TriangleMesh};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A rigid body in the kinematic model.
///
/// Links without collision geometry exist in the model (they anchor frames)
/// but are excluded from cloud generation upstream of the builder.
#[derive(Debug, Clone)]
pub struct LinkModel {
    /// Unique link name
    pub name: String,
    /// Collision geometry, if the link carries any
    pub geometry: Option<CollisionGeometry>,
}

/// Immutable robot model: the root frame name plus all links in
/// declaration order.
#[derive(Debug, Clone)]
pub struct RobotModel {
    root_link: String,
    links: Vec<LinkModel>,
}

impl RobotModel {
    /// Build a model from parts, validating link names and the root link.
    pub fn new(root_link: impl Into<String>, links: Vec<LinkModel>) -> Result<Self> {
        let root_link = root_link.into();
        let mut seen = HashSet::new();
        for link in &links {
            if link.name.is_empty() {
                return Err(Error::InvalidModel("link with empty name".to_string()));
            }
            if !seen.insert(link.name.as_str()) {
                return Err(Error::InvalidModel(format!(
                    "duplicate link name '{}'",
                    link.name
                )));
            }
        }
        if !seen.contains(root_link.as_str()) {
            return Err(Error::InvalidModel(format!(
                "root link '{}' is not declared",
                root_link
            )));
        }
        Ok(Self { root_link, links })
    }

    /// Load a model description from a TOML file.
    ///
    /// A missing or unreadable file maps to [`Error::ModelUnavailable`],
    /// which the daemon treats as fatal at startup.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::ModelUnavailable(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parse a model description from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let spec: ModelSpec =
            toml::from_str(text).map_err(|e| Error::InvalidModel(e.to_string()))?;

        let mut links = Vec::with_capacity(spec.links.len());
        for link in spec.links {
            let geometry = match link.geometry {
                Some(geom) => Some(convert_geometry(&link.name, geom)?),
                None => None,
            };
            links.push(LinkModel {
                name: link.name,
                geometry,
            });
        }
        Self::new(spec.root_link, links)
    }

    /// Name of the root/world frame all cloud points are expressed in.
    pub fn root_link_name(&self) -> &str {
        &self.root_link
    }

    /// All links in declaration order.
    pub fn links(&self) -> &[LinkModel] {
        &self.links
    }

    /// Links carrying collision geometry, in declaration order.
    ///
    /// The order is the enumeration order the cloud builder iterates in,
    /// so repeated calls yield reproducible point sequences.
    pub fn links_with_collision_geometry(&self) -> Vec<&LinkModel> {
        self.links
            .iter()
            .filter(|link| link.geometry.is_some())
            .collect()
    }
}

/// Raw model file schema (serde-facing; converted into runtime types).
#[derive(Debug, Deserialize)]
struct ModelSpec {
    root_link: String,
    #[serde(default)]
    links: Vec<LinkSpec>,
}

#[derive(Debug, Deserialize)]
struct LinkSpec {
    name: String,
    geometry: Option<GeometrySpec>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum GeometrySpec {
    Mesh { vertices: Vec<f64> },
    Box { size: [f64; 3] },
    Sphere { radius: f64 },
    Cylinder { radius: f64, length: f64 },
    #[serde(other)]
    Unknown,
}

fn convert_geometry(link_name: &str, spec: GeometrySpec) -> Result<CollisionGeometry> {
    Ok(match spec {
        GeometrySpec::Mesh { vertices } => {
            if vertices.len() % 3 != 0 {
                return Err(Error::InvalidModel(format!(
                    "link '{}': mesh vertex array length {} is not divisible by 3",
                    link_name,
                    vertices.len()
                )));
            }
            CollisionGeometry::Mesh(TriangleMesh::new(vertices))
        }
        GeometrySpec::Box { size } => CollisionGeometry::Primitive(PrimitiveShape::Box { size }),
        GeometrySpec::Sphere { radius } => {
            CollisionGeometry::Primitive(PrimitiveShape::Sphere { radius })
        }
        GeometrySpec::Cylinder { radius, length } => {
            CollisionGeometry::Primitive(PrimitiveShape::Cylinder { radius, length })
        }
        GeometrySpec::Unknown => CollisionGeometry::Unknown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXAMPLE_MODEL: &str = r#"
root_link = "base"

[[links]]
name = "base"

[[links]]
name = "shell"
geometry = { kind = "mesh", vertices = [0.0, 0.0, 0.0, 0.1, 0.0, 0.0, 0.0, 0.1, 0.0] }

[[links]]
name = "bumper"
geometry = { kind = "sphere", radius = 0.05 }

[[links]]
name = "caster"
geometry = { kind = "cylinder", radius = 0.02, length = 0.01 }
"#;

    #[test]
    fn parses_example_model() {
        let model = RobotModel::from_toml(EXAMPLE_MODEL).unwrap();
        assert_eq!(model.root_link_name(), "base");
        assert_eq!(model.links().len(), 4);

        let with_geometry = model.links_with_collision_geometry();
        let names: Vec<&str> = with_geometry.iter().map(|l| l.name.as_str()).collect();
        // "base" has no geometry; declaration order is preserved.
        assert_eq!(names, vec!["shell", "bumper", "caster"]);

        let shell_mesh = with_geometry[0].geometry.as_ref().unwrap().as_mesh();
        assert_eq!(shell_mesh.unwrap().vertex_count(), 3);
        assert!(with_geometry[1].geometry.as_ref().unwrap().as_mesh().is_none());
    }

    #[test]
    fn unknown_geometry_kind_is_preserved_as_unknown() {
        let text = r#"
root_link = "base"

[[links]]
name = "base"
geometry = { kind = "octomap" }
"#;
        let model = RobotModel::from_toml(text).unwrap();
        let links = model.links_with_collision_geometry();
        assert_eq!(links.len(), 1);
        assert!(matches!(
            links[0].geometry,
            Some(CollisionGeometry::Unknown)
        ));
    }

    #[test]
    fn rejects_unaligned_vertex_array() {
        let text = r#"
root_link = "base"

[[links]]
name = "base"
geometry = { kind = "mesh", vertices = [0.0, 0.0, 0.0, 1.0] }
"#;
        let err = RobotModel::from_toml(text).unwrap_err();
        assert!(matches!(err, Error::InvalidModel(_)));
        assert!(err.to_string().contains("divisible by 3"));
    }

    #[test]
    fn rejects_duplicate_link_names() {
        let text = r#"
root_link = "base"

[[links]]
name = "base"

[[links]]
name = "base"
"#;
        let err = RobotModel::from_toml(text).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_undeclared_root_link() {
        let text = r#"
root_link = "ghost"

[[links]]
name = "base"
"#;
        let err = RobotModel::from_toml(text).unwrap_err();
        assert!(err.to_string().contains("root link"));
    }

    #[test]
    fn missing_file_is_model_unavailable() {
        let err = RobotModel::from_file("/nonexistent/robot.toml").unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE_MODEL.as_bytes()).unwrap();

        let model = RobotModel::from_file(file.path()).unwrap();
        assert_eq!(model.root_link_name(), "base");
        assert_eq!(model.links_with_collision_geometry().len(), 3);
    }
}
