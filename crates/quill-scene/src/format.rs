//! Scene file format definitions

use crate::camera::Camera;
use crate::mesh::{Axis, Mesh};
use quill_core::{QuillError, Result, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root structure of a scene TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub scene: SceneMetadata,
    #[serde(default)]
    pub view: ViewDef,
    /// Keyed and iterated by name
    #[serde(default)]
    pub meshes: BTreeMap<String, MeshDef>,
}

/// Scene metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMetadata {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The view a stroke is drawn in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDef {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub camera: Camera,
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

impl Default for ViewDef {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            camera: Camera::default(),
        }
    }
}

/// Primitive used to build a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Quad,
    Box,
    Triangles,
}

/// Definition of a mesh in a scene file. Which fields are required depends on `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshDef {
    pub kind: ShapeKind,
    #[serde(default)]
    pub center: Vec3,
    /// Quad: half width and half depth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_size: Option<[f64; 2]>,
    /// Quad: axis the quad faces along
    #[serde(default)]
    pub axis: Axis,
    /// Box: half extents on x, y, z
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_extents: Option<Vec3>,
    /// Triangles: explicit vertex list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vertices: Vec<Vec3>,
    /// Triangles: vertex index triples
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triangles: Vec<[usize; 3]>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub intermediate: bool,
}

impl MeshDef {
    /// Build the world-space mesh. `name` is only used in error messages.
    pub fn to_mesh(&self, name: &str) -> Result<Mesh> {
        match self.kind {
            ShapeKind::Quad => {
                let half_size = self.half_size.ok_or_else(|| missing(name, "half_size"))?;
                Ok(Mesh::quad(self.center, half_size, self.axis))
            }
            ShapeKind::Box => {
                let half_extents = self.half_extents.ok_or_else(|| missing(name, "half_extents"))?;
                Ok(Mesh::cuboid(self.center, half_extents))
            }
            ShapeKind::Triangles => {
                let vertices = self.vertices.iter().map(|v| *v + self.center).collect();
                Mesh::new(vertices, self.triangles.clone())
                    .map_err(|e| QuillError::ParseError(format!("mesh '{name}': {e}")))
            }
        }
    }
}

fn missing(name: &str, field: &str) -> QuillError {
    QuillError::ParseError(format!("mesh '{name}' is missing '{field}'"))
}
