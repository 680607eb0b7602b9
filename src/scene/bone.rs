use glam::{Mat3, Mat4, Vec3};

use crate::animation::curve::{resolve_channel, Vec3Animation};
use crate::errors::{MarionetteError, Result};
use crate::math::{is_invertible, normal_matrix, pose_matrix};

/// Inverse of a bone's time-0 pose.
///
/// Maps points and normals from bind space (the skin's rest pose) into
/// bone-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BindPose {
    pub inverse: Mat4,
    pub normal_inverse: Mat3,
}

/// A bone of a skinned mesh.
///
/// Translation and rotation are expressed in the parent space shared by the
/// skin and all bones of the mesh. The bind pose is by definition the pose
/// at time 0. The bone itself is a unit capsule along +Y from the origin,
/// stretched per axis by `size`.
#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,

    // === Local pose ===
    pub translation: Vec3,
    pub rotation: Vec3,
    pub translation_curve: Option<Vec3Animation>,
    pub rotation_curve: Option<Vec3Animation>,

    /// Capsule extents used for automatic weighting.
    pub size: Vec3,
    /// Display colour for skeleton and weight visualisation.
    pub color: Vec3,

    // === Runtime data ===
    // Refreshed by every animate call
    pose: Mat4,
    normal_pose: Mat3,
    // Written once by compute_pose_transforms
    bind: Option<BindPose>,
}

impl Bone {
    #[must_use]
    pub fn new(name: &str, translation: Vec3, rotation: Vec3, size: Vec3) -> Self {
        let pose = pose_matrix(translation, rotation);
        Self {
            name: name.to_string(),
            translation,
            rotation,
            translation_curve: None,
            rotation_curve: None,
            size,
            color: Vec3::ONE,
            pose,
            normal_pose: Mat3::from_mat4(pose),
            bind: None,
        }
    }

    #[must_use]
    pub fn with_translation_curve(mut self, curve: impl Into<Vec3Animation>) -> Self {
        self.translation_curve = Some(curve.into());
        self
    }

    #[must_use]
    pub fn with_rotation_curve(mut self, curve: impl Into<Vec3Animation>) -> Self {
        self.rotation_curve = Some(curve.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Current pose matrix, in the skin's parent space.
    #[inline]
    #[must_use]
    pub fn pose(&self) -> &Mat4 {
        &self.pose
    }

    /// Normal transform of the current pose.
    #[inline]
    #[must_use]
    pub fn normal_pose(&self) -> &Mat3 {
        &self.normal_pose
    }

    /// Bind-pose inverses, once computed.
    #[inline]
    #[must_use]
    pub fn bind_pose(&self) -> Option<&BindPose> {
        self.bind.as_ref()
    }

    /// Checks curves and capsule size.
    pub fn validate(&self, index: usize) -> Result<()> {
        for curve in [&self.translation_curve, &self.rotation_curve].into_iter().flatten() {
            curve.validate()?;
        }
        if !(self.size.is_finite() && self.size.cmpgt(Vec3::ZERO).all()) {
            return Err(MarionetteError::InvalidBone {
                bone: index,
                reason: format!("capsule size {:?} must be positive on every axis", self.size),
            });
        }
        Ok(())
    }

    /// Records the inverse of the time-0 pose.
    ///
    /// Runs once: later calls keep the first result, so re-tesselating a
    /// skinned mesh never moves its bind pose.
    pub fn compute_pose_transforms(&mut self) -> Result<()> {
        if self.bind.is_some() {
            log::trace!("bone '{}' already has a bind pose", self.name);
            return Ok(());
        }

        let translation = resolve_channel(self.translation_curve.as_ref(), self.translation, 0.0)?;
        let rotation = resolve_channel(self.rotation_curve.as_ref(), self.rotation, 0.0)?;
        let m0 = pose_matrix(translation, rotation);

        if !is_invertible(&m0) {
            return Err(MarionetteError::SingularMatrix(format!(
                "bind pose of bone '{}'",
                self.name
            )));
        }
        let nm0 = normal_matrix(&m0).ok_or_else(|| {
            MarionetteError::SingularMatrix(format!("bind normal transform of bone '{}'", self.name))
        })?;

        self.bind = Some(BindPose {
            inverse: m0.inverse(),
            normal_inverse: nm0.inverse(),
        });
        log::debug!("bone '{}' bound at {translation}", self.name);
        Ok(())
    }

    /// Resolves the pose at `time` and refreshes the pose matrices.
    pub fn animate(&mut self, time: f32) -> Result<()> {
        let translation = resolve_channel(self.translation_curve.as_ref(), self.translation, time)?;
        let rotation = resolve_channel(self.rotation_curve.as_ref(), self.rotation, time)?;

        let pose = pose_matrix(translation, rotation);
        let normal_pose = normal_matrix(&pose).ok_or_else(|| {
            MarionetteError::SingularMatrix(format!("pose of bone '{}' at t={time}", self.name))
        })?;

        self.translation = translation;
        self.rotation = rotation;
        self.pose = pose;
        self.normal_pose = normal_pose;
        Ok(())
    }

    pub fn restart_animation(&mut self) -> Result<()> {
        self.animate(0.0)
    }

    /// Bind space to current pose: `pose * bind_inverse`.
    #[must_use]
    pub fn skinning_matrix(&self) -> Option<Mat4> {
        self.bind.map(|bind| self.pose * bind.inverse)
    }

    /// Normal counterpart of [`Bone::skinning_matrix`].
    #[must_use]
    pub fn skinning_normal_matrix(&self) -> Option<Mat3> {
        self.bind.map(|bind| self.normal_pose * bind.normal_inverse)
    }
}
