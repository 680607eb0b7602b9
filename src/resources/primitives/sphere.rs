use glam::Vec3;
use std::f32::consts::PI;

use crate::errors::{MarionetteError, Result};
use crate::resources::mesh::{FaceKind, Mesh};

/// Highest tesselation level a sphere accepts (`2^(level + 2)` segments).
pub const MAX_SPHERE_LEVEL: u32 = 10;

/// An analytic sphere, tesselated into a triangle UV sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
        }
    }
}

impl Sphere {
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Builds a UV sphere with `2^(level + 2)` segments in longitude and latitude.
    ///
    /// Vertices are laid out column by column (`iu * (segments + 1) + iv`);
    /// the first and last vertex of each column sit exactly on the poles.
    pub fn tesselate(&self, level: u32) -> Result<Mesh> {
        if level > MAX_SPHERE_LEVEL {
            return Err(MarionetteError::InvalidTopology(format!(
                "sphere tesselation level {level} exceeds {MAX_SPHERE_LEVEL}"
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(MarionetteError::InvalidTopology(format!(
                "sphere radius {} must be positive",
                self.radius
            )));
        }

        let segments = 1_u32 << (level + 2);
        let column = segments + 1;
        let vertex_count = (column * column) as usize;

        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);

        for iu in 0..=segments {
            let u = iu as f32 / segments as f32;
            for iv in 0..=segments {
                let dir = if iv == 0 {
                    Vec3::NEG_Y
                } else if iv == segments {
                    Vec3::Y
                } else {
                    let v = iv as f32 / segments as f32;
                    // Polar angle runs from the south pole (v = 0) to the north pole (v = 1)
                    let theta = (1.0 - v) * PI;
                    let phi = u * 2.0 * PI;
                    Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
                };

                positions.push(self.center + dir * self.radius);
                normals.push(dir.normalize());
            }
        }

        // Two triangles per grid cell
        let mut face_ids = Vec::with_capacity((segments * segments * 6) as usize);
        for iu in 0..segments {
            for iv in 0..segments {
                let a = iu * column + iv;
                let b = a + 1;
                let c = (iu + 1) * column + iv + 1;
                let d = (iu + 1) * column + iv;
                face_ids.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }

        Ok(Mesh::new(positions, Some(normals), face_ids, FaceKind::Triangles))
    }
}
