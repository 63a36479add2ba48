// extensions/hierarchy.rs
//
// Parent hierarchy for platform attachment and carrying, keyed by EntityId.
// Knows nothing about physics objects; the simulation mirrors each object's
// desired parent into it and asks it which children to drag along.
//
// Usage:
//   let mut graph = ParentGraph::new();
//   graph.register(platform, platform_pos);
//   graph.set_parent(crate_id, Some(platform));
//   let delta = graph.set_world(platform, new_pos);  // children move by delta

use std::collections::HashMap;
use glam::Vec2;
use crate::api::types::EntityId;

/// Node in the parent hierarchy.
#[derive(Debug, Clone, Default)]
struct HierarchyNode {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    /// Last known world position.
    world: Vec2,
}

/// Parent-child links between objects and anchors (platforms, carriers).
#[derive(Debug, Default)]
pub struct ParentGraph {
    nodes: HashMap<EntityId, HierarchyNode>,
    /// Entities with no parent (top-level).
    roots: Vec<EntityId>,
}

impl ParentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity at a world position. Re-registering only updates the position.
    pub fn register(&mut self, id: EntityId, world: Vec2) {
        let node = self.nodes.entry(id).or_default();
        node.world = world;
        if node.parent.is_none() && !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Set the parent of an entity. Pass `None` to make it a root.
    /// Self-parenting and cycles are refused.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) {
        if self.parent(child) == parent {
            return;
        }
        if let Some(p) = parent {
            if p == child || self.is_ancestor(child, p) {
                log::warn!("refusing to parent {:?} under its own descendant {:?}", child, p);
                return;
            }
            self.nodes.entry(p).or_default();
        }
        self.nodes.entry(child).or_default();

        // Remove from old parent's children
        if let Some(old_parent) = self.nodes.get(&child).and_then(|n| n.parent) {
            if let Some(old_node) = self.nodes.get_mut(&old_parent) {
                old_node.children.retain(|&c| c != child);
            }
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        if let Some(p) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&p) {
                if !parent_node.children.contains(&child) {
                    parent_node.children.push(child);
                }
            }
            self.roots.retain(|&r| r != child);
        } else if !self.roots.contains(&child) {
            self.roots.push(child);
        }
    }

    /// Whether `ancestor` is somewhere above `id`.
    pub fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn world(&self, id: EntityId) -> Option<Vec2> {
        self.nodes.get(&id).map(|n| n.world)
    }

    /// Record a new world position and return how far the entity moved.
    /// Unknown entities are registered at `world` with a zero delta.
    pub fn set_world(&mut self, id: EntityId, world: Vec2) -> Vec2 {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                let delta = world - node.world;
                node.world = world;
                delta
            }
            None => {
                self.register(id, world);
                Vec2::ZERO
            }
        }
    }

    /// Remove an entity from the hierarchy.
    /// Children become roots (orphaned).
    pub fn remove(&mut self, id: EntityId) -> Vec<EntityId> {
        let Some(node) = self.nodes.remove(&id) else {
            return Vec::new();
        };
        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        for &child in &node.children {
            if let Some(child_node) = self.nodes.get_mut(&child) {
                child_node.parent = None;
            }
            if !self.roots.contains(&child) {
                self.roots.push(child);
            }
        }
        self.roots.retain(|&r| r != id);
        node.children
    }

    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
