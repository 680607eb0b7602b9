use glam::Vec3;

use crate::resources::mesh::{FaceKind, Mesh};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneOptions {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for PlaneOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            width_segments: 1,
            height_segments: 1,
        }
    }
}

/// Quad grid in the XY plane facing +Z, with shared grid vertices.
#[must_use]
pub fn create_plane(options: PlaneOptions) -> Mesh {
    let width_half = options.width / 2.0;
    let height_half = options.height / 2.0;

    let grid_x = options.width_segments.max(1);
    let grid_y = options.height_segments.max(1);

    let grid_x1 = grid_x + 1;
    let grid_y1 = grid_y + 1;

    let segment_width = options.width / grid_x as f32;
    let segment_height = options.height / grid_y as f32;

    let mut positions = Vec::with_capacity((grid_x1 * grid_y1) as usize);
    for iy in 0..grid_y1 {
        let y = iy as f32 * segment_height - height_half;
        for ix in 0..grid_x1 {
            let x = ix as f32 * segment_width - width_half;
            positions.push(Vec3::new(x, y, 0.0));
        }
    }
    let normals = vec![Vec3::Z; positions.len()];

    let mut face_ids = Vec::with_capacity((grid_x * grid_y * 4) as usize);
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = ix + grid_x1 * iy;
            let b = (ix + 1) + grid_x1 * iy;
            let c = (ix + 1) + grid_x1 * (iy + 1);
            let d = ix + grid_x1 * (iy + 1);
            face_ids.extend_from_slice(&[a, b, c, d]);
        }
    }

    Mesh::new(positions, Some(normals), face_ids, FaceKind::Quads)
}
