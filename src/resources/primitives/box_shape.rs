use glam::Vec3;

use crate::resources::mesh::{FaceKind, Mesh};

/// Axis-aligned box centred on the origin: 6 quad faces, 24 vertices with
/// flat per-face normals, counter-clockwise seen from outside.
#[must_use]
pub fn create_box(width: f32, height: f32, depth: f32) -> Mesh {
    let w = width / 2.0;
    let h = height / 2.0;
    let d = depth / 2.0;

    // 4 corners per face
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        // Front face (+Z)
        ([[-w, -h, d], [w, -h, d], [w, h, d], [-w, h, d]], [0.0, 0.0, 1.0]),
        // Back face (-Z)
        ([[-w, -h, -d], [-w, h, -d], [w, h, -d], [w, -h, -d]], [0.0, 0.0, -1.0]),
        // Top face (+Y)
        ([[-w, h, -d], [-w, h, d], [w, h, d], [w, h, -d]], [0.0, 1.0, 0.0]),
        // Bottom face (-Y)
        ([[-w, -h, -d], [w, -h, -d], [w, -h, d], [-w, -h, d]], [0.0, -1.0, 0.0]),
        // Right face (+X)
        ([[w, -h, -d], [w, h, -d], [w, h, d], [w, -h, d]], [1.0, 0.0, 0.0]),
        // Left face (-X)
        ([[-w, -h, -d], [-w, -h, d], [-w, h, d], [-w, h, -d]], [-1.0, 0.0, 0.0]),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    for (corners, normal) in faces {
        positions.extend(corners.map(Vec3::from_array));
        normals.extend([Vec3::from_array(normal); 4]);
    }

    let face_ids: Vec<u32> = (0..24).collect();

    Mesh::new(positions, Some(normals), face_ids, FaceKind::Quads)
}
