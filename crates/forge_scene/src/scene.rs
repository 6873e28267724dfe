use forge_core::errors::{ForgeError, Result};
use forge_core::handles::{ArmatureKey, MaterialKey, NodeHandle};
use forge_resources::material::Material;
use glam::Affine3A;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::node::Node;
use crate::skeleton::Armature;
use crate::transform_system;

/// Scene graph container
///
/// Owns every node, material and armature created during a generation pass.
/// Node and material names are unique; both are indexed for lookup by name.
///
/// The parent graph is always an acyclic forest: [`Scene::attach`] refuses
/// any link that would make a node its own ancestor.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,
    names: FxHashMap<String, NodeHandle>,

    materials: SlotMap<MaterialKey, Material>,
    material_names: FxHashMap<String, MaterialKey>,

    armatures: SlotMap<ArmatureKey, Armature>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Adds a node as a new root.
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeHandle> {
        if self.names.contains_key(&node.name) {
            return Err(ForgeError::DuplicateNode(node.name));
        }
        node.parent = None;
        node.children.clear();

        let name = node.name.clone();
        let handle = self.nodes.insert(node);
        self.names.insert(name, handle);
        self.root_nodes.push(handle);
        Ok(handle)
    }

    /// Adds a node directly under `parent`.
    pub fn add_to_parent(&mut self, node: Node, parent: NodeHandle) -> Result<NodeHandle> {
        self.require(parent)?;
        let handle = self.add_node(node)?;
        self.attach(handle, parent)?;
        Ok(handle)
    }

    /// Links `child` under `parent`, keeping the child's local transform.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> Result<()> {
        self.require(child)?;
        self.require(parent)?;

        if child == parent || self.is_ancestor(child, parent) {
            return Err(ForgeError::CyclicHierarchy {
                child: self.nodes[child].name.clone(),
                parent: self.nodes[parent].name.clone(),
            });
        }

        self.unlink(child);
        self.nodes[parent].children.push(child);

        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.transform.mark_dirty();
        Ok(())
    }

    /// Links `child` under `parent`, rewriting the child's local transform
    /// so its world placement does not change.
    pub fn attach_keep_world(&mut self, child: NodeHandle, parent: NodeHandle) -> Result<()> {
        let child_world = self
            .compute_world_matrix(child)
            .ok_or_else(|| ForgeError::UnknownNode(format!("{child:?}")))?;
        let parent_world = self
            .compute_world_matrix(parent)
            .ok_or_else(|| ForgeError::UnknownNode(format!("{parent:?}")))?;

        self.attach(child, parent)?;
        self.nodes[child]
            .transform
            .apply_local_matrix(parent_world.inverse() * child_world);
        Ok(())
    }

    /// Makes `child` a root, keeping its local transform.
    pub fn detach(&mut self, child: NodeHandle) -> Result<()> {
        self.require(child)?;
        if self.nodes[child].parent.is_some() {
            self.unlink(child);
            self.root_nodes.push(child);
            self.nodes[child].transform.mark_dirty();
        }
        Ok(())
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        for descendant in self.subtree(handle).into_iter().rev() {
            self.remove_single(descendant);
        }
    }

    /// Removes one node. Its children, if any, become roots.
    pub(crate) fn remove_single(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.unlink(handle);

        let children = std::mem::take(&mut self.nodes[handle].children);
        for child in children {
            self.nodes[child].parent = None;
            self.nodes[child].transform.mark_dirty();
            self.root_nodes.push(child);
        }

        if let Some(node) = self.nodes.remove(handle) {
            self.names.remove(&node.name);
        }
    }

    /// Removes `child` from its parent's list (or the root list).
    fn unlink(&mut self, child: NodeHandle) {
        match self.nodes[child].parent.take() {
            Some(p) => {
                if let Some(parent) = self.nodes.get_mut(p) {
                    parent.children.retain(|&c| c != child);
                }
            }
            None => self.root_nodes.retain(|&r| r != child),
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    /// Mutable access for TRS and content edits. Hierarchy links and names
    /// are not writable through this reference.
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Like [`Scene::get_node`], but a stale handle is an error.
    pub fn require(&self, handle: NodeHandle) -> Result<&Node> {
        self.nodes
            .get(handle)
            .ok_or_else(|| ForgeError::UnknownNode(format!("{handle:?}")))
    }

    pub(crate) fn require_mut(&mut self, handle: NodeHandle) -> Result<&mut Node> {
        self.nodes
            .get_mut(handle)
            .ok_or_else(|| ForgeError::UnknownNode(format!("{handle:?}")))
    }

    #[must_use]
    pub fn node_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.names.get(name).copied()
    }

    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    /// True when `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    /// `root` and all its descendants, parents before children.
    #[must_use]
    pub fn subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            out.push(handle);
            if let Some(node) = self.nodes.get(handle) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    // ========================================================================
    // World matrices
    // ========================================================================

    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    pub fn update_subtree(&mut self, root: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, root);
    }

    /// World matrix of `handle` computed from the current local transforms,
    /// independent of the cache.
    #[must_use]
    pub fn compute_world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        let mut node = self.nodes.get(handle)?;
        let mut world = node.transform.compute_local_matrix();
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(p)) {
            world = parent.transform.compute_local_matrix() * world;
            node = parent;
        }
        Some(world)
    }

    // ========================================================================
    // Materials
    // ========================================================================

    pub fn add_material(&mut self, material: Material) -> Result<MaterialKey> {
        material.validate()?;
        if self.material_names.contains_key(&material.name) {
            return Err(ForgeError::DuplicateMaterial(material.name));
        }
        let name = material.name.clone();
        let key = self.materials.insert(material);
        self.material_names.insert(name, key);
        Ok(key)
    }

    #[must_use]
    pub fn material_by_name(&self, name: &str) -> Option<MaterialKey> {
        self.material_names.get(name).copied()
    }

    #[must_use]
    pub fn get_material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    pub fn iter_materials(&self) -> impl Iterator<Item = (MaterialKey, &Material)> {
        self.materials.iter()
    }

    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// `base` if free, otherwise the first free `base.NNN`.
    #[must_use]
    pub fn unique_material_name(&self, base: &str) -> String {
        if !self.material_names.contains_key(base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{base}.{i:03}"))
            .find(|candidate| !self.material_names.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Appends `material` to the node's slots unless it is already bound.
    /// Returns the slot index.
    pub fn attach_material(&mut self, node: NodeHandle, material: MaterialKey) -> Result<usize> {
        if !self.materials.contains_key(material) {
            return Err(ForgeError::InvalidParameter(format!(
                "unknown material {material:?}"
            )));
        }
        let node = self.require_mut(node)?;
        if let Some(slot) = node.materials.iter().position(|&m| m == material) {
            return Ok(slot);
        }
        node.materials.push(material);
        Ok(node.materials.len() - 1)
    }

    // ========================================================================
    // Armatures
    // ========================================================================

    pub(crate) fn insert_armature(&mut self, armature: Armature) -> ArmatureKey {
        self.armatures.insert(armature)
    }

    #[must_use]
    pub fn get_armature(&self, key: ArmatureKey) -> Option<&Armature> {
        self.armatures.get(key)
    }

    pub fn iter_armatures(&self) -> impl Iterator<Item = (ArmatureKey, &Armature)> {
        self.armatures.iter()
    }

    pub(crate) fn set_skin(&mut self, node: NodeHandle, skin: Option<crate::node::SkinBinding>) -> Result<()> {
        self.require_mut(node)?.skin = skin;
        Ok(())
    }

    pub(crate) fn replace_materials(&mut self, node: NodeHandle, slots: &[MaterialKey]) -> Result<()> {
        let node = self.require_mut(node)?;
        node.materials.clear();
        node.materials.extend_from_slice(slots);
        Ok(())
    }
}
