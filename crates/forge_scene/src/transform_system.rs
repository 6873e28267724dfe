//! Transform System
//!
//! Propagates world matrices down the node hierarchy, parent before child.
//! Only the node storage and root list are borrowed, so callers holding other
//! parts of the scene are not blocked.

use forge_core::handles::NodeHandle;
use glam::Affine3A;
use slotmap::SlotMap;

use crate::node::Node;

/// Updates every node reachable from `roots`.
///
/// Uses an explicit stack instead of recursion so deep hierarchies cannot
/// overflow. A node's world matrix is recomputed when its local matrix
/// changed or any ancestor's world matrix did.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    propagate(nodes, &mut stack);
}

/// Updates the subtree under `root_handle`, starting from its parent's
/// cached world matrix. The root is always recomputed.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root_handle: NodeHandle) {
    let Some(node) = nodes.get(root_handle) else {
        return;
    };
    let parent_world = node
        .parent
        .and_then(|p| nodes.get(p))
        .map_or(Affine3A::IDENTITY, |p| *p.transform.world_matrix());

    let mut stack = vec![(root_handle, parent_world, true)];
    propagate(nodes, &mut stack);
}

fn propagate(nodes: &mut SlotMap<NodeHandle, Node>, stack: &mut Vec<(NodeHandle, Affine3A, bool)>) {
    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = *node.transform.world_matrix();
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_hierarchy_update() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let mut parent = Node::empty("Parent");
        parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::empty("Child");
        child.transform.position = Vec3::new(0.0, 1.0, 0.0);
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes.get_mut(parent_handle).unwrap().children.push(child_handle);

        update_hierarchy_iterative(&mut nodes, &[parent_handle]);

        let child_world_pos = nodes[child_handle].world_matrix().translation;
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_parent_change_propagates_to_unchanged_child() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let parent_handle = nodes.insert(Node::empty("Parent"));
        let mut child = Node::empty("Child");
        child.transform.position = Vec3::X;
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);
        nodes[parent_handle].children.push(child_handle);

        update_hierarchy_iterative(&mut nodes, &[parent_handle]);

        nodes[parent_handle].transform.rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        update_hierarchy_iterative(&mut nodes, &[parent_handle]);

        let p = nodes[child_handle].world_matrix().translation;
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
    }
}
