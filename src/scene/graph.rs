//! Scene graph — arena of assemblies and primitives.
//!
//! Every node stores its transform relative to its parent, so moving an
//! assembly root relocates the whole subtree rigidly. `flatten()` walks the
//! tree and produces world-space records for inspection and export.

use std::collections::HashMap;

use glam::{Mat4, Vec3};

use super::flatten::FlatPrimitive;
use super::node::{LocalTransform, NodeContent, PlacedPrimitive, SceneNode, SceneNodeId};

/// Tree-shaped arena of scene nodes under a single root assembly.
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    root: SceneNodeId,
    next_id: u64,
}

impl SceneGraph {
    /// Create a new scene graph with a root assembly.
    pub fn new() -> Self {
        let root_id = SceneNodeId(0);
        let root_node = SceneNode::new(root_id, "root", NodeContent::Assembly);

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    /// Allocate a fresh node ID.
    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert `node` under `parent`. Unknown parents fall back to the root so
    /// every node keeps exactly one parent.
    fn attach(&mut self, parent: SceneNodeId, mut node: SceneNode) -> SceneNodeId {
        let parent = if self.nodes.contains_key(&parent) {
            parent
        } else {
            log::warn!("parent {:?} not found, attaching {} to root", parent, node.name);
            self.root
        };

        let id = node.id;
        node.parent = Some(parent);
        self.nodes.insert(id, node);

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        id
    }

    /// Add an empty assembly under `parent` at a local position.
    pub fn add_assembly(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        position: Vec3,
    ) -> SceneNodeId {
        let id = self.alloc_id();
        let mut node = SceneNode::new(id, name, NodeContent::Assembly);
        node.local_transform = LocalTransform::from_position(position);
        self.attach(parent, node)
    }

    /// Insert a laid-out primitive under `parent`.
    pub fn add_primitive(&mut self, parent: SceneNodeId, primitive: PlacedPrimitive) -> SceneNodeId {
        let id = self.alloc_id();
        let PlacedPrimitive { name, shape, position, rotation, material } = primitive;
        let mut node = SceneNode::new(id, name, NodeContent::Primitive { shape, material });
        node.local_transform = LocalTransform::from_position_rotation(position, rotation);
        self.attach(parent, node)
    }

    /// Insert a batch of primitives under `parent`, preserving order.
    pub fn add_primitives(
        &mut self,
        parent: SceneNodeId,
        primitives: impl IntoIterator<Item = PlacedPrimitive>,
    ) -> Vec<SceneNodeId> {
        primitives
            .into_iter()
            .map(|p| self.add_primitive(parent, p))
            .collect()
    }

    /// Move an assembly to a new local position.
    ///
    /// Primitives are immutable once placed, so this only affects assemblies.
    pub fn set_position(&mut self, id: SceneNodeId, position: Vec3) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) if node.is_assembly() => {
                node.local_transform.position = position;
                true
            }
            Some(node) => {
                log::warn!("refusing to move primitive {}", node.name);
                false
            }
            None => false,
        }
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: SceneNodeId) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Depth-first descendants of `id` (excluding `id`), in insertion order.
    pub fn descendants(&self, id: SceneNodeId) -> Vec<SceneNodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<SceneNodeId> = self.children(id).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let before = stack.len();
            stack.extend(self.children(current));
            stack[before..].reverse();
        }
        out
    }

    /// Find the first direct child of `parent` with the given name.
    pub fn find_child(&self, parent: SceneNodeId, name: &str) -> Option<SceneNodeId> {
        self.children(parent)
            .find(|c| self.nodes.get(c).is_some_and(|n| n.name == name))
    }

    /// Total number of nodes in the graph, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walk the tree, propagate transforms, and collect every primitive in world space.
    pub fn flatten(&mut self) -> Vec<FlatPrimitive> {
        self.propagate_transforms(self.root, Mat4::IDENTITY);

        let mut out = Vec::new();
        self.collect_primitives(self.root, &mut out);
        out
    }

    /// Recursively propagate world transforms.
    fn propagate_transforms(&mut self, node_id: SceneNodeId, parent_world: Mat4) {
        let (local_mat, children) = {
            let node = match self.nodes.get(&node_id) {
                Some(n) => n,
                None => return,
            };
            (node.local_transform.to_mat4(), node.children.clone())
        };

        let world = parent_world * local_mat;

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.world_transform = world;
        }

        for child_id in children {
            self.propagate_transforms(child_id, world);
        }
    }

    /// Recursively collect primitives in depth-first order.
    fn collect_primitives(&self, node_id: SceneNodeId, out: &mut Vec<FlatPrimitive>) {
        let node = match self.nodes.get(&node_id) {
            Some(n) => n,
            None => return,
        };

        if let NodeContent::Primitive { shape, material } = &node.content {
            out.push(FlatPrimitive {
                id: node.id,
                name: node.name.clone(),
                parent: node.parent,
                shape: shape.clone(),
                material: *material,
                world_transform: node.world_transform,
                world_bounds: shape.local_bounds().transformed(&node.world_transform),
            });
        }

        for &child_id in &node.children {
            self.collect_primitives(child_id, out);
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
