use glam::Vec3;

use crate::animation::spline::KeyframeBezierSpline;
use crate::animation::tracks::KeyframeTrack;
use crate::errors::{MarionetteError, Result};

/// An animation curve producing a vector for every point in time.
///
/// Transforms and bones hold one of these per animated channel
/// (translation, rotation, scale).
#[derive(Debug, Clone)]
pub enum Vec3Animation {
    /// Piecewise cubic Bezier with keyframes.
    Bezier(KeyframeBezierSpline),
    /// Linear or stepped keyframes.
    Track(KeyframeTrack<Vec3>),
    /// Same value at every time.
    Constant(Vec3),
}

impl Vec3Animation {
    pub fn evaluate(&self, t: f32) -> Result<Vec3> {
        match self {
            Self::Bezier(spline) => spline.evaluate(t),
            Self::Track(track) => track.sample(t),
            Self::Constant(v) => Ok(*v),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Bezier(spline) => spline.validate(),
            Self::Track(track) => track.validate(),
            Self::Constant(v) if !v.is_finite() => Err(MarionetteError::InvalidSpline(format!(
                "constant curve value {v} is not finite"
            ))),
            Self::Constant(_) => Ok(()),
        }
    }

    /// Time of the last keyframe, `None` for constant curves.
    #[must_use]
    pub fn end_time(&self) -> Option<f32> {
        match self {
            Self::Bezier(spline) => spline.end_time(),
            Self::Track(track) => track.times.last().copied(),
            Self::Constant(_) => None,
        }
    }
}

impl From<KeyframeBezierSpline> for Vec3Animation {
    fn from(spline: KeyframeBezierSpline) -> Self {
        Self::Bezier(spline)
    }
}

impl From<KeyframeTrack<Vec3>> for Vec3Animation {
    fn from(track: KeyframeTrack<Vec3>) -> Self {
        Self::Track(track)
    }
}

/// Resolves a channel: the curve's value if animated, else the current value.
pub(crate) fn resolve_channel(curve: Option<&Vec3Animation>, current: Vec3, t: f32) -> Result<Vec3> {
    match curve {
        Some(curve) => curve.evaluate(t),
        None => Ok(current),
    }
}
