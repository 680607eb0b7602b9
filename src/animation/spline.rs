use glam::Vec3;

use crate::animation::tracks::validate_times;
use crate::animation::values::Interpolatable;
use crate::errors::{MarionetteError, Result};

/// Number of Bezier control points per keyframe segment.
pub const POINTS_PER_SEGMENT: usize = 4;

/// A piecewise cubic Bezier curve with keyframes.
///
/// Keyframes `k` and `k + 1` bound a segment shaped by the control points
/// `k * 4 .. k * 4 + 4`, so a spline with `K` keyframes has `(K - 1) * 4`
/// control points. The first control point of a segment is the value at its
/// start keyframe and the fourth is the value at its end keyframe.
///
/// A spline with a single keyframe is constant and carries exactly one
/// control point: the keyframe value.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeBezierSpline {
    pub times: Vec<f32>,
    pub control_points: Vec<Vec3>,
}

impl KeyframeBezierSpline {
    /// Builds a spline and validates its layout.
    pub fn new(times: Vec<f32>, control_points: Vec<Vec3>) -> Result<Self> {
        let spline = Self {
            times,
            control_points,
        };
        spline.validate()?;
        Ok(spline)
    }

    /// Builds a spline that moves at constant speed between keyframe values,
    /// placing the inner control points on the thirds of each segment.
    pub fn from_linear_keyframes(times: Vec<f32>, values: &[Vec3]) -> Result<Self> {
        if values.len() != times.len() {
            return Err(MarionetteError::InvalidSpline(format!(
                "{} keyframe times but {} keyframe values",
                times.len(),
                values.len()
            )));
        }

        let control_points = if values.len() == 1 {
            vec![values[0]]
        } else {
            values
                .windows(2)
                .flat_map(|w| {
                    let (a, b) = (w[0], w[1]);
                    [a, a.lerp(b, 1.0 / 3.0), a.lerp(b, 2.0 / 3.0), b]
                })
                .collect()
        };

        Self::new(times, control_points)
    }

    /// Checks array lengths, finiteness and strict monotonicity of the
    /// keyframe times.
    pub fn validate(&self) -> Result<()> {
        self.check_lengths()?;
        validate_times(&self.times)?;
        if let Some(i) = self.control_points.iter().position(|p| !p.is_finite()) {
            return Err(MarionetteError::InvalidSpline(format!(
                "control point {i} is not finite: {}",
                self.control_points[i]
            )));
        }
        Ok(())
    }

    fn check_lengths(&self) -> Result<()> {
        let keys = self.times.len();
        if keys == 0 {
            return Err(MarionetteError::InvalidSpline(
                "spline has no keyframes".to_string(),
            ));
        }

        let expected = if keys == 1 {
            1
        } else {
            (keys - 1) * POINTS_PER_SEGMENT
        };
        if self.control_points.len() != expected {
            return Err(MarionetteError::InvalidSpline(format!(
                "{keys} keyframes need {expected} control points, found {}",
                self.control_points.len()
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn start_time(&self) -> Option<f32> {
        self.times.first().copied()
    }

    #[must_use]
    pub fn end_time(&self) -> Option<f32> {
        self.times.last().copied()
    }

    /// Value of keyframe `k`.
    #[must_use]
    pub fn keyframe_value(&self, k: usize) -> Option<Vec3> {
        let keys = self.times.len();
        if k >= keys {
            return None;
        }
        if keys == 1 {
            return self.control_points.first().copied();
        }
        if k == keys - 1 {
            self.control_points.get((k - 1) * POINTS_PER_SEGMENT + 3).copied()
        } else {
            self.control_points.get(k * POINTS_PER_SEGMENT).copied()
        }
    }

    /// Evaluates the spline at time `t`.
    ///
    /// Times before the first keyframe clamp to the first keyframe value and
    /// times after the last keyframe clamp to the last keyframe value.
    pub fn evaluate(&self, t: f32) -> Result<Vec3> {
        self.check_lengths()?;

        let keys = self.times.len();
        if keys == 1 {
            return Ok(self.control_points[0]);
        }

        // first index whose time is strictly after t
        let next = self.times.partition_point(|&k| k <= t);
        if next == 0 {
            return Ok(self.control_points[0]);
        }
        if next >= keys {
            return Ok(self.control_points[(keys - 2) * POINTS_PER_SEGMENT + 3]);
        }

        let segment = next - 1;
        let base = segment * POINTS_PER_SEGMENT;
        let t0 = self.times[segment];
        let t1 = self.times[next];
        if t == t0 {
            return Ok(self.control_points[base]);
        }

        let u = ((t - t0) / (t1 - t0)).clamp(0.0, 1.0);
        let p = &self.control_points[base..base + POINTS_PER_SEGMENT];
        Ok(Vec3::interpolate_bezier(p[0], p[1], p[2], p[3], u))
    }
}
