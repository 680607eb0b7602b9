//! Recursive midpoint subdivision.
//!
//! Every pass replaces each face with four children and builds entirely new
//! vertex, normal and index buffers, so the input of a pass stays valid.
//! No vertices are shared across faces: each parent face contributes its
//! own corner and midpoint vertices.
//!
//! Quads (corners `v0 v2 v4 v6`) gain edge midpoints `v1 v3 v5 v7` and a
//! centre `v8`, giving 9 vertices per parent face. Triangles (corners
//! `v0 v2 v4`) gain edge midpoints `v1 v3 v5`, giving 6 vertices per parent
//! face. Quad normals are renormalized at every new vertex; triangle
//! midpoint normals are the plain average of the two corner normals.

use glam::Vec3;

use crate::errors::Result;
use crate::math::normalize_or_keep;
use crate::resources::mesh::{FaceKind, Mesh};

/// Vertices emitted per parent quad.
pub const QUAD_CHILD_VERTICES: usize = 9;
/// Vertices emitted per parent triangle.
pub const TRIANGLE_CHILD_VERTICES: usize = 6;
/// Child faces per parent face, for both topologies.
pub const CHILD_FACES: usize = 4;

// Child quads in terms of the 9 local vertices.
const QUAD_CHILDREN: [[u32; 4]; 4] = [[0, 1, 8, 7], [1, 2, 3, 8], [3, 4, 5, 8], [5, 6, 7, 8]];
// Three corner triangles followed by the centre one.
const TRIANGLE_CHILDREN: [[u32; 3]; 4] = [[0, 1, 5], [1, 2, 3], [3, 4, 5], [1, 3, 5]];

impl Mesh {
    /// Applies `level` subdivision passes. Level 0 returns a copy of the mesh.
    pub fn tesselate(&self, level: u32) -> Result<Mesh> {
        self.validate()?;

        let mut current = self.clone();
        for pass in 1..=level {
            current = current.subdivide_unchecked();
            log::trace!(
                "tesselation pass {pass}/{level}: {} faces, {} vertices",
                current.num_faces(),
                current.num_vertices()
            );
        }
        Ok(current)
    }

    /// One subdivision pass into a fresh mesh.
    pub fn subdivide(&self) -> Result<Mesh> {
        self.validate()?;
        Ok(self.subdivide_unchecked())
    }

    fn subdivide_unchecked(&self) -> Mesh {
        match self.kind() {
            FaceKind::Quads => subdivide_quads(self),
            FaceKind::Triangles => subdivide_triangles(self),
        }
    }
}

fn subdivide_quads(src: &Mesh) -> Mesh {
    let faces = src.num_faces();
    let mut positions = Vec::with_capacity(faces * QUAD_CHILD_VERTICES);
    let mut normals = src
        .normals
        .as_ref()
        .map(|_| Vec::with_capacity(faces * QUAD_CHILD_VERTICES));
    let mut face_ids = Vec::with_capacity(faces * CHILD_FACES * 4);

    for f in 0..faces {
        let c = [0, 1, 2, 3].map(|v| src.corner(f, v));

        let v0 = src.positions[c[0]];
        let v2 = src.positions[c[1]];
        let v4 = src.positions[c[2]];
        let v6 = src.positions[c[3]];
        let v1 = (v0 + v2) * 0.5;
        let v3 = (v2 + v4) * 0.5;
        let v5 = (v4 + v6) * 0.5;
        let v7 = (v6 + v0) * 0.5;
        let v8 = (v1 + v5) * 0.5;
        positions.extend_from_slice(&[v0, v1, v2, v3, v4, v5, v6, v7, v8]);

        if let (Some(out), Some(src_normals)) = (normals.as_mut(), src.normals.as_ref()) {
            let n0 = normalize_or_keep(src_normals[c[0]]);
            let n2 = normalize_or_keep(src_normals[c[1]]);
            let n4 = normalize_or_keep(src_normals[c[2]]);
            let n6 = normalize_or_keep(src_normals[c[3]]);
            let n1 = normalize_or_keep(n0 + n2);
            let n3 = normalize_or_keep(n2 + n4);
            let n5 = normalize_or_keep(n4 + n6);
            let n7 = normalize_or_keep(n6 + n0);
            let n8 = normalize_or_keep(n7 + n3);
            out.extend_from_slice(&[n0, n1, n2, n3, n4, n5, n6, n7, n8]);
        }

        let base = (f * QUAD_CHILD_VERTICES) as u32;
        for child in QUAD_CHILDREN {
            face_ids.extend(child.iter().map(|&i| base + i));
        }
    }

    Mesh::new(positions, normals, face_ids, FaceKind::Quads)
}

fn subdivide_triangles(src: &Mesh) -> Mesh {
    let faces = src.num_faces();
    let mut positions = Vec::with_capacity(faces * TRIANGLE_CHILD_VERTICES);
    let mut normals = src
        .normals
        .as_ref()
        .map(|_| Vec::with_capacity(faces * TRIANGLE_CHILD_VERTICES));
    let mut face_ids = Vec::with_capacity(faces * CHILD_FACES * 3);

    for f in 0..faces {
        let c = [0, 1, 2].map(|v| src.corner(f, v));

        let v0 = src.positions[c[0]];
        let v2 = src.positions[c[1]];
        let v4 = src.positions[c[2]];
        let v1 = (v0 + v2) * 0.5;
        let v3 = (v2 + v4) * 0.5;
        let v5 = (v4 + v0) * 0.5;
        positions.extend_from_slice(&[v0, v1, v2, v3, v4, v5]);

        if let (Some(out), Some(src_normals)) = (normals.as_mut(), src.normals.as_ref()) {
            let n0 = src_normals[c[0]];
            let n2 = src_normals[c[1]];
            let n4 = src_normals[c[2]];
            out.extend_from_slice(&[
                n0,
                average(n0, n2),
                n2,
                average(n2, n4),
                n4,
                average(n4, n0),
            ]);
        }

        let base = (f * TRIANGLE_CHILD_VERTICES) as u32;
        for child in TRIANGLE_CHILDREN {
            face_ids.extend(child.iter().map(|&i| base + i));
        }
    }

    Mesh::new(positions, normals, face_ids, FaceKind::Triangles)
}

#[inline]
fn average(a: Vec3, b: Vec3) -> Vec3 {
    (a + b) * 0.5
}
