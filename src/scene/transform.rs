use glam::{Mat4, Vec3};

use crate::animation::curve::{resolve_channel, Vec3Animation};
use crate::errors::{MarionetteError, Result};
use crate::math::trs_matrix;
use crate::settings::ScalePolicy;

/// Transform component
///
/// Holds the local translation, rotation (Euler angles, radians) and scale
/// of a hierarchy node, each optionally driven by an animation curve.
///
/// No world or local matrix is cached here: the renderer composes matrices
/// during its own traversal, using [`Transform::local_matrix`] if it likes.
#[derive(Debug, Clone)]
pub struct Transform {
    // === Resolved values ===
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,

    // === Animation channels ===
    // A channel without a curve keeps its last explicitly set value.
    pub translation_curve: Option<Vec3Animation>,
    pub rotation_curve: Option<Vec3Animation>,
    pub scale_curve: Option<Vec3Animation>,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,

            translation_curve: None,
            rotation_curve: None,
            scale_curve: None,
        }
    }

    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::new()
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
    pub fn with_scale_curve(mut self, curve: impl Into<Vec3Animation>) -> Self {
        self.scale_curve = Some(curve.into());
        self
    }

    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.translation_curve.is_some() || self.rotation_curve.is_some() || self.scale_curve.is_some()
    }

    /// Validates every attached curve.
    pub fn validate(&self) -> Result<()> {
        for curve in [&self.translation_curve, &self.rotation_curve, &self.scale_curve]
            .into_iter()
            .flatten()
        {
            curve.validate()?;
        }
        Ok(())
    }

    /// Resolves the animated channels at `time`.
    ///
    /// All three channels are evaluated before any is written, so a failing
    /// curve leaves the previous values intact.
    pub fn animate(&mut self, time: f32, scale_policy: ScalePolicy) -> Result<()> {
        let translation = resolve_channel(self.translation_curve.as_ref(), self.translation, time)?;
        let rotation = resolve_channel(self.rotation_curve.as_ref(), self.rotation, time)?;
        let scale = resolve_channel(self.scale_curve.as_ref(), self.scale, time)?;

        if scale_policy == ScalePolicy::Reject && !is_valid_scale(scale) {
            return Err(MarionetteError::InvalidScale(scale.to_array()));
        }

        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;
        Ok(())
    }

    /// `T * S * Rx * Ry * Rz`, the order the renderer applies the channels in.
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Mat4 {
        trs_matrix(self.translation, self.rotation, self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn is_valid_scale(scale: Vec3) -> bool {
    scale.is_finite() && scale.cmpgt(Vec3::ZERO).all()
}
