//! Scene context threaded through every generation call
//!
//! A [`Scene`] owns the node arena and the material registry for one
//! generation run. Nothing is global: several scenes can be built side by
//! side, and starting a run means starting from a fresh (or cleared) scene.

pub mod flatten;
pub mod graph;
pub mod material;
pub mod node;

pub use flatten::FlatPrimitive;
pub use graph::SceneGraph;
pub use material::{Material, MaterialId, MaterialParams, MaterialRegistry};
pub use node::{LocalTransform, NodeContent, PlacedPrimitive, SceneNode, SceneNodeId, Shape};

/// Everything produced by one generation run.
pub struct Scene {
    name: String,
    graph: SceneGraph,
    materials: MaterialRegistry,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: SceneGraph::new(),
            materials: MaterialRegistry::new(),
        }
    }

    /// Drop every node and material, keeping the name.
    pub fn clear(&mut self) {
        log::debug!("clearing scene {}", self.name);
        self.graph = SceneGraph::new();
        self.materials = MaterialRegistry::new();
    }

    /// Scene name, used for the output file stem.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root assembly of the scene.
    pub fn root(&self) -> SceneNodeId {
        self.graph.root()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut MaterialRegistry {
        &mut self.materials
    }

    /// Flatten the scene into world-space primitives.
    pub fn flatten(&mut self) -> Vec<FlatPrimitive> {
        self.graph.flatten()
    }
}
