use crate::animation::values::Interpolatable;
use crate::errors::{MarionetteError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
}

/// A plain keyframe track: one value per keyframe.
///
/// Sampling clamps to the first value before the first keyframe and to the
/// last value after the last keyframe.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Checks array lengths and strict monotonicity of the keyframe times.
    pub fn validate(&self) -> Result<()> {
        self.check_lengths()?;
        validate_times(&self.times)?;
        if let Some(k) = self.values.iter().position(|v| !v.is_finite_value()) {
            return Err(MarionetteError::InvalidSpline(format!(
                "keyframe value {k} is not finite"
            )));
        }
        Ok(())
    }

    fn check_lengths(&self) -> Result<()> {
        if self.times.is_empty() {
            return Err(MarionetteError::InvalidSpline(
                "track has no keyframes".to_string(),
            ));
        }
        if self.values.len() != self.times.len() {
            return Err(MarionetteError::InvalidSpline(format!(
                "track has {} keyframe times but {} values",
                self.times.len(),
                self.values.len()
            )));
        }
        Ok(())
    }

    pub fn sample(&self, time: f32) -> Result<T> {
        self.check_lengths()?;

        let len = self.times.len();
        // partition_point finds the first index where t > time, i.e. next_index
        let next_idx = self.times.partition_point(|&t| t <= time);

        if next_idx == 0 {
            return Ok(self.values[0]);
        }
        if next_idx >= len {
            return Ok(self.values[len - 1]);
        }

        let index = next_idx - 1;
        match self.interpolation {
            InterpolationMode::Step => Ok(self.values[index]),
            InterpolationMode::Linear => {
                let t0 = self.times[index];
                let t1 = self.times[next_idx];
                let t = ((time - t0) / (t1 - t0)).clamp(0.0, 1.0);
                Ok(T::interpolate_linear(
                    self.values[index],
                    self.values[next_idx],
                    t,
                ))
            }
        }
    }
}

/// Keyframe times must be finite and strictly increasing.
pub(crate) fn validate_times(times: &[f32]) -> Result<()> {
    if let Some(t) = times.iter().find(|t| !t.is_finite()) {
        return Err(MarionetteError::InvalidSpline(format!(
            "keyframe time {t} is not finite"
        )));
    }
    if let Some(pair) = times.windows(2).find(|w| w[1] <= w[0]) {
        return Err(MarionetteError::InvalidSpline(format!(
            "keyframe times must be strictly increasing, found {} then {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}
