//! Scene animation core.
//!
//! Keyframed transform hierarchies, recursive mesh subdivision, bone
//! skinning with automatic weights and particle dynamics. The crate
//! produces per-frame geometry, transforms and particle arrays; drawing
//! them is left to the host renderer.
//!
//! ```rust,ignore
//! use marionette::{Node, Scene, Surface, Transform};
//! use marionette::resources::Sphere;
//!
//! let mut scene = Scene::new();
//! let pivot = scene.add_child(scene.root(), Node::transform("pivot", Transform::new()))?;
//! scene.add_child(pivot, Node::new("ball", Surface::sphere(Sphere::default()).with_level(2)))?;
//!
//! scene.tesselate()?;
//! for _ in 0..30 {
//!     scene.step()?;
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod errors;
pub mod math;
pub mod resources;
pub mod scene;
pub mod settings;

pub use animation::{InterpolationMode, KeyframeBezierSpline, KeyframeTrack, Vec3Animation};
pub use errors::{MarionetteError, Result};
pub use resources::{BoundingBox, FaceKind, Mesh, Sphere};
pub use scene::{
    Bone, MaterialKey, Node, NodeHandle, NodeKind, ParticleState, ParticleSystem, Scene, SkinnedMesh, Surface,
    SurfaceShape, Transform,
};
pub use settings::{ScalePolicy, SceneSettings, WeightFalloff};
