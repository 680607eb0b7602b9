//! Skinned meshes: a rest-pose skin deformed by a flat list of bones.
//!
//! Weights are computed automatically from the distance between each rest
//! vertex and each bone, where a bone is a capsule along its local +Y axis.
//! Every frame a vertex moves to the weighted blend of where each bone
//! carries it:
//!
//! ```text
//! p' = sum_b  w[v][b] * pose_b * bind_inverse_b * p
//! ```

use glam::{Mat3, Mat4, Vec3};

use crate::errors::{MarionetteError, Result};
use crate::math::normalize_or_keep;
use crate::resources::mesh::Mesh;
use crate::scene::bone::Bone;
use crate::settings::WeightFalloff;

/// Distance from `point` to the segment `(0,0,0)-(0,1,0)` after dividing
/// each axis by the bone `size`.
///
/// `point` is in bone-local space; the distance is measured in unit-capsule
/// space, so a thick bone reaches further sideways than a thin one.
#[must_use]
pub fn distance_from_capsule(point: Vec3, size: Vec3) -> f32 {
    let q = point / size;
    let closest = Vec3::new(0.0, q.y.clamp(0.0, 1.0), 0.0);
    q.distance(closest)
}

/// Weighting parameters for one tesselate pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightParams {
    pub max_distance: f32,
    pub falloff: WeightFalloff,
}

#[derive(Debug, Clone)]
pub struct SkinnedMesh {
    /// Skin geometry in the rest pose, in the same space as the bones.
    pub skin: Mesh,
    pub bones: Vec<Bone>,
    /// Overrides the scene-wide influence radius when set.
    pub auto_weights_max_distance: Option<f32>,

    // === Derived at tesselate time ===
    rest: Option<Mesh>,
    // vertex-major: weights[v * bones.len() + b]
    weights: Vec<f32>,
    deformed: Option<Mesh>,
}

impl SkinnedMesh {
    #[must_use]
    pub fn new(skin: Mesh, bones: Vec<Bone>) -> Self {
        Self {
            skin,
            bones,
            auto_weights_max_distance: None,
            rest: None,
            weights: Vec::new(),
            deformed: None,
        }
    }

    /// The tesselated skin in its rest pose.
    #[inline]
    #[must_use]
    pub fn rest_mesh(&self) -> Option<&Mesh> {
        self.rest.as_ref()
    }

    /// The deformed output mesh read by the renderer.
    #[inline]
    #[must_use]
    pub fn deformed_mesh(&self) -> Option<&Mesh> {
        self.deformed.as_ref()
    }

    /// Weight of `bone` on vertex `vertex` of the rest mesh.
    #[must_use]
    pub fn weight(&self, vertex: usize, bone: usize) -> Option<f32> {
        let bones = self.bones.len();
        if bone >= bones {
            return None;
        }
        self.weights.get(vertex * bones + bone).copied()
    }

    /// All weights of one vertex, one per bone.
    #[must_use]
    pub fn vertex_weights(&self, vertex: usize) -> Option<&[f32]> {
        let bones = self.bones.len();
        self.weights.get(vertex * bones..(vertex + 1) * bones)
    }

    /// Bone colours blended by a vertex's weights, for weight visualisation.
    #[must_use]
    pub fn vertex_color(&self, vertex: usize) -> Option<Vec3> {
        let weights = self.vertex_weights(vertex)?;
        Some(
            self.bones
                .iter()
                .zip(weights)
                .fold(Vec3::ZERO, |acc, (bone, &w)| acc + bone.color * w),
        )
    }

    /// Tesselates the skin, binds every bone and computes vertex weights.
    ///
    /// Everything is built before any field is replaced, so a failure
    /// leaves the previous state untouched.
    pub fn tesselate(&mut self, level: u32, params: WeightParams) -> Result<()> {
        for (i, bone) in self.bones.iter().enumerate() {
            bone.validate(i)?;
        }

        let rest = self.skin.tesselate(level)?;

        // bind on a copy, committed together with the weights
        let mut bones = self.bones.clone();
        for bone in &mut bones {
            bone.compute_pose_transforms()?;
        }

        let weights = compute_vertex_weights(&rest, &bones, params)?;

        log::debug!(
            "skinned mesh tesselated: {} vertices, {} bones",
            rest.num_vertices(),
            self.bones.len()
        );

        self.deformed = Some(rest.clone());
        self.rest = Some(rest);
        self.bones = bones;
        self.weights = weights;
        Ok(())
    }

    /// Animates every bone, then deforms the rest mesh into the output mesh.
    ///
    /// Fails when bones were added or removed since the last tesselate call,
    /// since the weight table no longer lines up with them.
    pub fn animate(&mut self, time: f32) -> Result<()> {
        let Some(rest) = self.rest.as_ref() else {
            return Err(MarionetteError::NotTesselated("skinned mesh"));
        };
        let expected = rest.num_vertices() * self.bones.len();
        if self.weights.len() != expected {
            return Err(MarionetteError::InvalidBone {
                bone: self.bones.len(),
                reason: format!(
                    "bone list changed after tesselation: {} weights for {} vertices and {} bones",
                    self.weights.len(),
                    rest.num_vertices(),
                    self.bones.len()
                ),
            });
        }

        for bone in &mut self.bones {
            bone.animate(time)?;
        }

        let matrices = self
            .bones
            .iter()
            .enumerate()
            .map(|(i, bone)| {
                bone.skinning_matrix()
                    .zip(bone.skinning_normal_matrix())
                    .ok_or_else(|| MarionetteError::InvalidBone {
                        bone: i,
                        reason: "no bind pose".to_string(),
                    })
            })
            .collect::<Result<Vec<(Mat4, Mat3)>>>()?;

        let (positions, normals) = deform(rest, &self.weights, &matrices);

        match self.deformed.as_mut() {
            Some(out) => {
                out.positions = positions;
                out.normals = normals;
            }
            None => {
                let mut out = rest.clone();
                out.positions = positions;
                out.normals = normals;
                self.deformed = Some(out);
            }
        }
        log::trace!("skinned mesh deformed at t={time}");
        Ok(())
    }

    /// Restores the undeformed skin and restarts every bone.
    pub fn restart_animation(&mut self) -> Result<()> {
        if let Some(rest) = &self.rest {
            self.deformed = Some(rest.clone());
        }
        for bone in &mut self.bones {
            bone.restart_animation()?;
        }
        Ok(())
    }
}

/// Computes normalized per-vertex, per-bone weights for `mesh`.
///
/// A vertex that no bone reaches is bound entirely to the nearest bone, so
/// every vertex of a mesh with at least one bone has weights summing to 1.
pub fn compute_vertex_weights(mesh: &Mesh, bones: &[Bone], params: WeightParams) -> Result<Vec<f32>> {
    let bone_count = bones.len();
    let mut weights = vec![0.0; mesh.num_vertices() * bone_count];
    if bone_count == 0 {
        return Ok(weights);
    }

    let binds = bones
        .iter()
        .enumerate()
        .map(|(i, bone)| {
            bone.bind_pose()
                .map(|bind| (bind.inverse, bone.size))
                .ok_or_else(|| MarionetteError::InvalidBone {
                    bone: i,
                    reason: "weights requested before the bind pose was computed".to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut fallbacks = 0_usize;
    for (v, &position) in mesh.positions.iter().enumerate() {
        let row = &mut weights[v * bone_count..(v + 1) * bone_count];

        let mut nearest = (0, f32::INFINITY);
        for (b, (inverse, size)) in binds.iter().enumerate() {
            let local = inverse.transform_point3(position);
            let distance = distance_from_capsule(local, *size);
            if distance < nearest.1 {
                nearest = (b, distance);
            }
            row[b] = params.falloff.weight(distance, params.max_distance);
        }

        let sum: f32 = row.iter().sum();
        if sum > 0.0 {
            for w in row.iter_mut() {
                *w /= sum;
            }
        } else {
            row[nearest.0] = 1.0;
            fallbacks += 1;
        }
    }

    if fallbacks > 0 {
        log::debug!("{fallbacks} vertices out of bone range, bound to their nearest bone");
    }
    Ok(weights)
}

fn deform(rest: &Mesh, weights: &[f32], matrices: &[(Mat4, Mat3)]) -> (Vec<Vec3>, Option<Vec<Vec3>>) {
    let bone_count = matrices.len();
    if bone_count == 0 {
        return (rest.positions.clone(), rest.normals.clone());
    }

    let positions = rest
        .positions
        .iter()
        .enumerate()
        .map(|(v, &p)| {
            let row = &weights[v * bone_count..(v + 1) * bone_count];
            row.iter()
                .zip(matrices)
                .filter(|(w, _)| **w != 0.0)
                .fold(Vec3::ZERO, |acc, (&w, (m, _))| acc + m.transform_point3(p) * w)
        })
        .collect();

    let normals = rest.normals.as_ref().map(|normals| {
        normals
            .iter()
            .enumerate()
            .map(|(v, &n)| {
                let row = &weights[v * bone_count..(v + 1) * bone_count];
                let blended = row
                    .iter()
                    .zip(matrices)
                    .filter(|(w, _)| **w != 0.0)
                    .fold(Vec3::ZERO, |acc, (&w, (_, nm))| acc + (*nm * n) * w);
                normalize_or_keep(blended)
            })
            .collect()
    });

    (positions, normals)
}
