//! Scene Settings
//!
//! Tunables that apply to a whole scene rather than to individual nodes.
//! Hosts normally embed them in their own configuration file; every field
//! has a default so partial JSON documents are accepted.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use marionette::settings::{SceneSettings, WeightFalloff};
//!
//! let settings = SceneSettings::from_json(r#"{ "time_step": 0.02 }"#)?;
//! assert_eq!(settings.weight_falloff, WeightFalloff::Smooth);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Shape of the distance-to-weight curve used for automatic skin weights.
///
/// Both curves are 1 at distance 0, decrease monotonically and reach 0 at
/// the maximum influence distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightFalloff {
    /// `1 - d / max`
    Linear,
    /// `(1 - d / max)^2`
    #[default]
    Smooth,
}

impl WeightFalloff {
    /// Weight of a bone at capsule distance `distance`.
    #[must_use]
    pub fn weight(self, distance: f32, max_distance: f32) -> f32 {
        if max_distance <= 0.0 || distance >= max_distance {
            return 0.0;
        }
        let x = 1.0 - distance.max(0.0) / max_distance;
        match self {
            Self::Linear => x,
            Self::Smooth => x * x,
        }
    }
}

/// What transforms do with a zero, negative or non-finite scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Fail the animate pass with [`MarionetteError::InvalidScale`](crate::MarionetteError::InvalidScale).
    #[default]
    Reject,
    /// Pass the scale through unchecked.
    Allow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Seconds advanced by [`Scene::step`](crate::Scene::step).
    pub time_step: f32,
    /// Influence radius for skinned meshes that do not set their own.
    pub auto_weights_max_distance: f32,
    pub weight_falloff: WeightFalloff,
    pub scale_policy: ScalePolicy,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 30.0,
            auto_weights_max_distance: 2.0,
            weight_falloff: WeightFalloff::default(),
            scale_policy: ScalePolicy::default(),
        }
    }
}

impl SceneSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
