//! Quill Core - Foundational types for the Quill curve tools
//!
//! This crate provides the types every other Quill crate depends on:
//! - `EntityId` - Scene node handles
//! - `Vec3`, `Mat4`, `Ray` - Spatial types
//! - `NurbsCurve` - Edit-point interpolation for open B-spline curves
//! - Error types and Result alias

mod error;
mod id;
pub mod nurbs;
mod types;

pub use error::{QuillError, Result};
pub use id::{EntityId, IdAllocator};
pub use nurbs::{CurveForm, NurbsCurve};
pub use types::{
    mat4_inverse, mat4_mul, transform_point, transform_vector, Mat4, Ray, Vec3, MAT4_IDENTITY,
};
