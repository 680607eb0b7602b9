use crate::errors::{MarionetteError, Result};
use crate::resources::mesh::Mesh;
use crate::resources::primitives::Sphere;
use crate::scene::MaterialKey;
use crate::scene::skinning::{SkinnedMesh, WeightParams};
use crate::settings::SceneSettings;

/// Geometry source of a [`Surface`].
#[derive(Debug, Clone)]
pub enum SurfaceShape {
    /// Explicit mesh, subdivided `tesselation_level` times.
    Mesh(Mesh),
    /// Procedural sphere, `2^(level + 2)` segments per direction.
    Sphere(Sphere),
    /// Bone-deformed skin.
    Skinned(SkinnedMesh),
}

/// Drawable leaf of the hierarchy.
#[derive(Debug, Clone)]
pub struct Surface {
    pub material: Option<MaterialKey>,
    pub tesselation_level: u32,
    pub shape: SurfaceShape,

    tesselated: Option<Mesh>,
}

impl Surface {
    #[must_use]
    pub fn new(shape: SurfaceShape) -> Self {
        Self {
            material: None,
            tesselation_level: 0,
            shape,
            tesselated: None,
        }
    }

    #[must_use]
    pub fn mesh(mesh: Mesh) -> Self {
        Self::new(SurfaceShape::Mesh(mesh))
    }

    #[must_use]
    pub fn sphere(sphere: Sphere) -> Self {
        Self::new(SurfaceShape::Sphere(sphere))
    }

    #[must_use]
    pub fn skinned(skinned: SkinnedMesh) -> Self {
        Self::new(SurfaceShape::Skinned(skinned))
    }

    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.tesselation_level = level;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: MaterialKey) -> Self {
        self.material = Some(material);
        self
    }

    /// The mesh the renderer draws, once tesselated.
    ///
    /// For skinned surfaces this is the deformed output mesh.
    #[must_use]
    pub fn tesselated_mesh(&self) -> Option<&Mesh> {
        match &self.shape {
            SurfaceShape::Skinned(skinned) => skinned.deformed_mesh(),
            SurfaceShape::Mesh(_) | SurfaceShape::Sphere(_) => self.tesselated.as_ref(),
        }
    }

    #[must_use]
    pub fn skinned_mesh(&self) -> Option<&SkinnedMesh> {
        match &self.shape {
            SurfaceShape::Skinned(skinned) => Some(skinned),
            _ => None,
        }
    }

    pub fn skinned_mesh_mut(&mut self) -> Option<&mut SkinnedMesh> {
        match &mut self.shape {
            SurfaceShape::Skinned(skinned) => Some(skinned),
            _ => None,
        }
    }

    pub fn tesselate(&mut self, settings: &SceneSettings) -> Result<()> {
        let level = self.tesselation_level;
        match &mut self.shape {
            SurfaceShape::Mesh(mesh) => {
                self.tesselated = Some(mesh.tesselate(level)?);
            }
            SurfaceShape::Sphere(sphere) => {
                self.tesselated = Some(sphere.tesselate(level)?);
            }
            SurfaceShape::Skinned(skinned) => {
                let params = WeightParams {
                    max_distance: skinned
                        .auto_weights_max_distance
                        .unwrap_or(settings.auto_weights_max_distance),
                    falloff: settings.weight_falloff,
                };
                skinned.tesselate(level, params)?;
            }
        }
        Ok(())
    }

    /// Static shapes ignore time; skinned shapes animate their bones and
    /// deform.
    pub fn animate(&mut self, time: f32) -> Result<()> {
        match &mut self.shape {
            SurfaceShape::Skinned(skinned) => skinned.animate(time),
            SurfaceShape::Mesh(_) | SurfaceShape::Sphere(_) => {
                if self.tesselated.is_none() {
                    return Err(MarionetteError::NotTesselated("surface"));
                }
                Ok(())
            }
        }
    }

    pub fn restart_animation(&mut self) -> Result<()> {
        match &mut self.shape {
            SurfaceShape::Skinned(skinned) => skinned.restart_animation(),
            SurfaceShape::Mesh(_) | SurfaceShape::Sphere(_) => Ok(()),
        }
    }
}
