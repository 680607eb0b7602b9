//! Error Types
//!
//! This module defines the error types used throughout the animation core.
//!
//! # Overview
//!
//! The main error type [`MarionetteError`] covers every failure mode of the
//! core:
//! - Malformed input data (spline arrays, mesh topology, bone sizes)
//! - Programming errors (quad operations on a triangle mesh and vice versa)
//! - Ordering violations (animating before tesselating)
//! - Scene graph misuse (unknown handles, cycles)
//!
//! None of these are recoverable locally: geometry and animation are
//! deterministic, so a retry would fail the same way. They propagate
//! unmodified to whoever called [`Scene::tesselate`](crate::Scene::tesselate)
//! or [`Scene::animate`](crate::Scene::animate).
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, MarionetteError>`.
//!
//! ```rust,ignore
//! use marionette::errors::Result;
//!
//! fn load_frame(scene: &mut Scene, t: f32) -> Result<()> {
//!     scene.animate(t)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::resources::mesh::FaceKind;

/// The main error type for the animation core.
#[derive(Error, Debug)]
pub enum MarionetteError {
    // ========================================================================
    // Structural Input Errors
    // ========================================================================
    /// Keyframe and control-point arrays do not describe a valid curve.
    #[error("Invalid spline: {0}")]
    InvalidSpline(String),

    /// Index buffer length or stride does not match the mesh topology.
    #[error("Invalid mesh topology: {0}")]
    InvalidTopology(String),

    /// A face references a vertex that does not exist.
    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// Face being read
        face: usize,
        /// Offending vertex index
        index: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },

    /// Bone configuration that cannot be used for skinning.
    #[error("Invalid bone {bone}: {reason}")]
    InvalidBone {
        /// Bone index within its skinned mesh
        bone: usize,
        /// What is wrong with it
        reason: String,
    },

    /// A matrix that must be inverted is singular.
    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    /// A resolved scale component is zero, negative or not finite.
    #[error("Degenerate scale {0:?}")]
    InvalidScale([f32; 3]),

    /// Particle system parameters that cannot be simulated.
    #[error("Invalid particle system: {0}")]
    InvalidParticleSystem(String),

    // ========================================================================
    // Programming Errors
    // ========================================================================
    /// Writing a face of the wrong arity into a mesh.
    #[error("Cannot write a {requested:?} face into a {actual:?} mesh")]
    UnsupportedFaceOperation {
        /// Face kind the caller tried to write
        requested: FaceKind,
        /// Face kind of the mesh
        actual: FaceKind,
    },

    /// `animate` was called before the one-time `tesselate` pass.
    #[error("{0} must be tesselated before it is animated")]
    NotTesselated(&'static str),

    // ========================================================================
    // Scene Graph Errors
    // ========================================================================
    /// The handle does not refer to a live node.
    #[error("Node not found")]
    NodeNotFound,

    /// An attach request that would break the tree structure.
    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings could not be parsed.
    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Alias for `Result<T, MarionetteError>`.
pub type Result<T> = std::result::Result<T, MarionetteError>;
