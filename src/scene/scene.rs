use glam::Mat4;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::errors::{MarionetteError, Result};
use crate::scene::NodeHandle;
use crate::scene::node::{Node, NodeKind};
use crate::scene::particles::ParticleSystem;
use crate::scene::surface::Surface;
use crate::scene::transform::Transform;
use crate::settings::SceneSettings;

/// Scene graph container.
///
/// Owns every node in an arena, rooted at a single transform. The three
/// passes walk the tree depth-first, parents before children, children in
/// declaration order:
///
/// 1. [`Scene::tesselate`] once, after the scene is built
/// 2. [`Scene::animate`] / [`Scene::step`] once per frame
/// 3. [`Scene::restart_animation`] to rewind to time 0
///
/// A pass stops at the first failing node and returns its error.
#[derive(Debug)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    root: NodeHandle,

    /// Time of the last successful animate pass.
    pub time: f32,
    pub settings: SceneSettings,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(SceneSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: SceneSettings) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::transform("root", Transform::new()));
        Self {
            nodes,
            root,
            time: 0.0,
            settings,
        }
    }

    /// Handle of the root transform.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Inserts `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeHandle, node: Node) -> Result<NodeHandle> {
        self.check_parent(parent)?;
        let handle = self.nodes.insert(node);
        self.link(handle, parent);
        Ok(handle)
    }

    /// Moves an existing node (and its subtree) under `parent`.
    ///
    /// Fails for the root, for self-attachment, for non-transform parents
    /// and when `parent` lies inside the child's own subtree.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> Result<()> {
        if !self.nodes.contains_key(child) {
            return Err(MarionetteError::NodeNotFound);
        }
        self.check_parent(parent)?;
        if child == self.root {
            return Err(MarionetteError::InvalidHierarchy(
                "the root cannot be attached to another node".to_string(),
            ));
        }
        if child == parent {
            return Err(MarionetteError::InvalidHierarchy(
                "cannot attach a node to itself".to_string(),
            ));
        }
        if self.is_ancestor(child, parent) {
            return Err(MarionetteError::InvalidHierarchy(
                "attaching a node below its own descendant would create a cycle".to_string(),
            ));
        }

        self.unlink(child);
        self.link(child, parent);
        Ok(())
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) -> Result<()> {
        if handle == self.root {
            return Err(MarionetteError::InvalidHierarchy(
                "the root cannot be removed".to_string(),
            ));
        }
        if !self.nodes.contains_key(handle) {
            return Err(MarionetteError::NodeNotFound);
        }

        self.unlink(handle);
        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        match self.nodes.get(handle) {
            Some(node) => node.children(),
            None => &[],
        }
    }

    #[must_use]
    pub fn transform(&self, handle: NodeHandle) -> Option<&Transform> {
        self.nodes.get(handle)?.as_transform()
    }

    pub fn transform_mut(&mut self, handle: NodeHandle) -> Option<&mut Transform> {
        self.nodes.get_mut(handle)?.as_transform_mut()
    }

    #[must_use]
    pub fn surface(&self, handle: NodeHandle) -> Option<&Surface> {
        self.nodes.get(handle)?.as_surface()
    }

    pub fn surface_mut(&mut self, handle: NodeHandle) -> Option<&mut Surface> {
        self.nodes.get_mut(handle)?.as_surface_mut()
    }

    #[must_use]
    pub fn particle_system(&self, handle: NodeHandle) -> Option<&ParticleSystem> {
        self.nodes.get(handle)?.as_particle_system()
    }

    pub fn particle_system_mut(&mut self, handle: NodeHandle) -> Option<&mut ParticleSystem> {
        self.nodes.get_mut(handle)?.as_particle_system_mut()
    }

    /// Product of the local matrices of every transform from the root down
    /// to `handle`, inclusive.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<Mat4> {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(handle);
        while let Some(h) = current {
            let node = self.nodes.get(h)?;
            if let Some(t) = node.as_transform() {
                matrix = t.local_matrix() * matrix;
            }
            current = node.parent;
        }
        Some(matrix)
    }

    /// Depth-first walk from the root, calling `f(handle, node, depth)`.
    pub fn visit(&self, mut f: impl FnMut(NodeHandle, &Node, usize)) {
        let mut stack: SmallVec<[(NodeHandle, usize); 16]> = SmallVec::new();
        stack.push((self.root, 0));
        while let Some((handle, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            f(handle, node, depth);
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }
    }

    // ========================================================================
    // Passes
    // ========================================================================

    /// Builds all static geometry, bind poses and skin weights, and
    /// populates particle systems at time 0.
    pub fn tesselate(&mut self) -> Result<()> {
        let order = self.traversal_order();
        for handle in &order {
            let Some(node) = self.nodes.get_mut(*handle) else {
                continue;
            };
            match &mut node.kind {
                NodeKind::Transform(t) => t.validate()?,
                NodeKind::Surface(s) => s.tesselate(&self.settings)?,
                NodeKind::ParticleSystem(p) => p.tesselate(&self.settings)?,
            }
        }
        log::debug!("scene tesselated: {} nodes", order.len());
        Ok(())
    }

    /// Resolves every node at `time`.
    pub fn animate(&mut self, time: f32) -> Result<()> {
        let policy = self.settings.scale_policy;
        for handle in self.traversal_order() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            match &mut node.kind {
                NodeKind::Transform(t) => t.animate(time, policy)?,
                NodeKind::Surface(s) => s.animate(time)?,
                NodeKind::ParticleSystem(p) => p.animate(time)?,
            }
        }
        self.time = time;
        log::trace!("scene animated at t={time}");
        Ok(())
    }

    /// Advances by one [`SceneSettings::time_step`].
    pub fn step(&mut self) -> Result<()> {
        self.animate(self.time + self.settings.time_step)
    }

    /// Rewinds every node to time 0.
    ///
    /// Transforms resolve their curves at 0, skinned meshes restore their
    /// rest pose and particle systems drop their particles until the next
    /// animate call.
    pub fn restart_animation(&mut self) -> Result<()> {
        let policy = self.settings.scale_policy;
        for handle in self.traversal_order() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            match &mut node.kind {
                NodeKind::Transform(t) => t.animate(0.0, policy)?,
                NodeKind::Surface(s) => s.restart_animation()?,
                NodeKind::ParticleSystem(p) => p.restart_animation()?,
            }
        }
        self.time = 0.0;
        log::debug!("scene animation restarted");
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn traversal_order(&self) -> Vec<NodeHandle> {
        let mut order = Vec::with_capacity(self.nodes.len());
        self.visit(|handle, _, _| order.push(handle));
        order
    }

    fn check_parent(&self, parent: NodeHandle) -> Result<()> {
        let node = self.nodes.get(parent).ok_or(MarionetteError::NodeNotFound)?;
        if !node.kind.is_transform() {
            return Err(MarionetteError::InvalidHierarchy(format!(
                "a {} node cannot have children",
                node.kind.type_name()
            )));
        }
        Ok(())
    }

    /// Returns `true` if `ancestor` lies on the parent chain of `node`.
    fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(h) = current {
            if h == ancestor {
                return true;
            }
            current = self.nodes.get(h).and_then(|n| n.parent);
        }
        false
    }

    fn link(&mut self, child: NodeHandle, parent: NodeHandle) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn unlink(&mut self, child: NodeHandle) {
        let old_parent = self.nodes.get_mut(child).and_then(|n| n.parent.take());
        if let Some(p) = old_parent
            && let Some(n) = self.nodes.get_mut(p)
            && let Some(i) = n.children.iter().position(|&x| x == child)
        {
            n.children.remove(i);
        }
    }
}
