use crate::scene::NodeHandle;
use crate::scene::particles::ParticleSystem;
use crate::scene::surface::Surface;
use crate::scene::transform::Transform;

/// What a node does during tesselate, animate and restart passes.
///
/// Only [`NodeKind::Transform`] nodes may have children.
#[derive(Debug)]
pub enum NodeKind {
    Transform(Transform),
    Surface(Surface),
    ParticleSystem(ParticleSystem),
}

impl NodeKind {
    #[inline]
    #[must_use]
    pub fn is_transform(&self) -> bool {
        matches!(self, Self::Transform(_))
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Transform(_) => "transform",
            Self::Surface(_) => "surface",
            Self::ParticleSystem(_) => "particle system",
        }
    }
}

impl From<Transform> for NodeKind {
    fn from(t: Transform) -> Self {
        Self::Transform(t)
    }
}

impl From<Surface> for NodeKind {
    fn from(s: Surface) -> Self {
        Self::Surface(s)
    }
}

impl From<ParticleSystem> for NodeKind {
    fn from(p: ParticleSystem) -> Self {
        Self::ParticleSystem(p)
    }
}

/// A scene hierarchy node.
///
/// # Hierarchy
///
/// - `parent`: handle of the owning transform (None for the scene root)
/// - `children`: ordered child handles; order is the traversal order
///
/// Both are maintained by [`Scene`](crate::Scene); use
/// [`Scene::add_child`](crate::Scene::add_child) and
/// [`Scene::attach`](crate::Scene::attach) to edit the tree.
#[derive(Debug)]
pub struct Node {
    pub name: String,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub kind: NodeKind,
}

impl Node {
    #[must_use]
    pub fn new(name: &str, kind: impl Into<NodeKind>) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            kind: kind.into(),
        }
    }

    #[must_use]
    pub fn transform(name: &str, transform: Transform) -> Self {
        Self::new(name, transform)
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[must_use]
    pub fn as_transform(&self) -> Option<&Transform> {
        match &self.kind {
            NodeKind::Transform(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_transform_mut(&mut self) -> Option<&mut Transform> {
        match &mut self.kind {
            NodeKind::Transform(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_surface(&self) -> Option<&Surface> {
        match &self.kind {
            NodeKind::Surface(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_surface_mut(&mut self) -> Option<&mut Surface> {
        match &mut self.kind {
            NodeKind::Surface(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_particle_system(&self) -> Option<&ParticleSystem> {
        match &self.kind {
            NodeKind::ParticleSystem(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_particle_system_mut(&mut self) -> Option<&mut ParticleSystem> {
        match &mut self.kind {
            NodeKind::ParticleSystem(p) => Some(p),
            _ => None,
        }
    }
}
