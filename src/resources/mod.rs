//! Geometry resources.
//!
//! - Mesh: flat triangle/quad mesh handed to the renderer
//! - Tesselation: recursive midpoint subdivision of meshes
//! - Primitives: procedural box, plane and sphere builders

pub mod mesh;
pub mod tesselation;
pub mod primitives;

pub use mesh::{BoundingBox, FaceKind, Mesh};
pub use primitives::{create_box, create_plane, PlaneOptions, Sphere};
