use glam::{Mat4, Vec3};

use crate::errors::{MarionetteError, Result};

/// Face arity of a mesh. Fixed for the lifetime of a mesh instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceKind {
    Triangles,
    Quads,
}

impl FaceKind {
    #[inline]
    #[must_use]
    pub const fn vertices_per_face(self) -> usize {
        match self {
            Self::Triangles => 3,
            Self::Quads => 4,
        }
    }
}

/// Axis-aligned bounds of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut new_min = Vec3::splat(f32::INFINITY);
        let mut new_max = Vec3::splat(f32::NEG_INFINITY);
        for point in corners {
            let transformed = matrix.transform_point3(point);
            new_min = new_min.min(transformed);
            new_max = new_max.max(transformed);
        }

        Self {
            min: new_min,
            max: new_max,
        }
    }
}

/// A flat collection of triangles or quads.
///
/// This is the simplest mesh representation and the one handed to the
/// renderer. Faces index into the vertex arrays through a flat index buffer
/// with a fixed stride: vertex `v` of face `f` is `face_ids[f * stride + v]`.
///
/// Vertices are not shared between faces after tesselation, so the mesh is
/// not a watertight half-edge structure. Algorithms that need adjacency must
/// weld vertices first.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    /// Per-vertex normals. `None` means the renderer uses face normals.
    pub normals: Option<Vec<Vec3>>,
    pub face_ids: Vec<u32>,
    kind: FaceKind,
}

impl Mesh {
    /// Wraps already populated buffers. Call [`Mesh::validate`] before use.
    #[must_use]
    pub fn new(
        positions: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        face_ids: Vec<u32>,
        kind: FaceKind,
    ) -> Self {
        Self {
            positions,
            normals,
            face_ids,
            kind,
        }
    }

    /// Allocates `vertex_count` zeroed vertices and `face_count` faces pointing at vertex 0.
    #[must_use]
    pub fn allocate(vertex_count: usize, face_count: usize, kind: FaceKind, with_normals: bool) -> Self {
        Self {
            positions: vec![Vec3::ZERO; vertex_count],
            normals: with_normals.then(|| vec![Vec3::ZERO; vertex_count]),
            face_ids: vec![0; face_count * kind.vertices_per_face()],
            kind,
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> FaceKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_quads(&self) -> bool {
        self.kind == FaceKind::Quads
    }

    #[inline]
    #[must_use]
    pub fn vertices_per_face(&self) -> usize {
        self.kind.vertices_per_face()
    }

    #[inline]
    #[must_use]
    pub fn num_faces(&self) -> usize {
        self.face_ids.len() / self.vertices_per_face()
    }

    #[inline]
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Index of vertex `vertex` of face `face`, `None` when either is out of range.
    #[inline]
    #[must_use]
    pub fn face_vertex_index(&self, face: usize, vertex: usize) -> Option<usize> {
        if vertex >= self.vertices_per_face() {
            return None;
        }
        self.face(face)?.get(vertex).map(|&i| i as usize)
    }

    /// The vertex indices of one face.
    #[inline]
    #[must_use]
    pub fn face(&self, face: usize) -> Option<&[u32]> {
        let stride = self.vertices_per_face();
        self.face_ids.get(face * stride..(face + 1) * stride)
    }

    // Only for meshes that already passed `validate`.
    #[inline]
    pub(crate) fn corner(&self, face: usize, vertex: usize) -> usize {
        self.face_ids[face * self.vertices_per_face() + vertex] as usize
    }

    pub fn set_triangle_face(&mut self, face: usize, ids: [u32; 3]) -> Result<()> {
        self.write_face(face, FaceKind::Triangles, &ids)
    }

    pub fn set_quad_face(&mut self, face: usize, ids: [u32; 4]) -> Result<()> {
        self.write_face(face, FaceKind::Quads, &ids)
    }

    fn write_face(&mut self, face: usize, requested: FaceKind, ids: &[u32]) -> Result<()> {
        if requested != self.kind {
            return Err(MarionetteError::UnsupportedFaceOperation {
                requested,
                actual: self.kind,
            });
        }
        let stride = self.vertices_per_face();
        let start = face * stride;
        let face_count = self.face_ids.len() / stride;
        let slot = self.face_ids.get_mut(start..start + stride).ok_or_else(|| {
            MarionetteError::InvalidTopology(format!(
                "face {face} is outside an index buffer of {face_count} faces"
            ))
        })?;
        slot.copy_from_slice(ids);
        Ok(())
    }

    /// Checks the indexing invariants: the index buffer is a whole number of
    /// faces, every index names a vertex and normals match the vertex count.
    pub fn validate(&self) -> Result<()> {
        let stride = self.vertices_per_face();
        if self.face_ids.len() % stride != 0 {
            return Err(MarionetteError::InvalidTopology(format!(
                "index buffer length {} is not a multiple of {stride}",
                self.face_ids.len()
            )));
        }

        if let Some(normals) = &self.normals
            && normals.len() != self.positions.len()
        {
            return Err(MarionetteError::InvalidTopology(format!(
                "{} normals for {} vertices",
                normals.len(),
                self.positions.len()
            )));
        }

        let vertex_count = self.positions.len();
        if let Some((slot, &index)) = self
            .face_ids
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertex_count)
        {
            return Err(MarionetteError::FaceIndexOutOfRange {
                face: slot / stride,
                index,
                vertex_count,
            });
        }
        Ok(())
    }

    /// Geometric normal of a face from its first three corners.
    pub fn face_normal(&self, face: usize) -> Result<Vec3> {
        let ids = self.face(face).ok_or_else(|| {
            MarionetteError::InvalidTopology(format!(
                "face {face} is outside a mesh of {} faces",
                self.num_faces()
            ))
        })?;
        let vertex_count = self.positions.len();
        let corner = |slot: usize| {
            let index = ids[slot];
            self.positions
                .get(index as usize)
                .copied()
                .ok_or(MarionetteError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                })
        };
        let (p0, p1, p2) = (corner(0)?, corner(1)?, corner(2)?);
        Ok((p1 - p0).cross(p2 - p0).normalize_or_zero())
    }

    /// Normalizes loaded vertex normals in place.
    pub fn normalize_normals(&mut self) {
        if let Some(normals) = &mut self.normals {
            for n in normals.iter_mut() {
                *n = n.normalize_or_zero();
            }
        }
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.positions.first()?;
        let (min, max) = self
            .positions
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Some(BoundingBox { min, max })
    }
}
