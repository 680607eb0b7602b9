//! Scene graph
//!
//! - Node: hierarchy node, a transform, surface or particle system
//! - Transform: keyframed translation, rotation and scale
//! - Surface: mesh, sphere or skinned mesh leaf
//! - Bone / SkinnedMesh: bind-pose skinning with automatic weights
//! - ParticleSystem: fixed-capacity particle population
//! - Scene: arena-backed container driving the tesselate/animate passes

pub mod bone;
pub mod node;
pub mod particles;
pub mod scene;
pub mod skinning;
pub mod surface;
pub mod transform;

pub use bone::{BindPose, Bone};
pub use node::{Node, NodeKind};
pub use particles::{
    ConstantForce, DragForce, ParticleForce, ParticleSource, ParticleState, ParticleSystem, PointSource,
};
pub use scene::Scene;
pub use skinning::{SkinnedMesh, WeightParams};
pub use surface::{Surface, SurfaceShape};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Handle of a node in a [`Scene`].
    pub struct NodeHandle;
    /// Opaque material reference owned by the host renderer.
    pub struct MaterialKey;
}
