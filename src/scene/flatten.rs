//! Flattened scene output.
//!
//! `FlatPrimitive` is the result of walking the scene graph: one entry per
//! placed primitive with its resolved world transform.

use glam::{Mat4, Vec3};

use crate::math::Aabb;

use super::material::MaterialId;
use super::node::{SceneNodeId, Shape};

/// One primitive with its world-space placement.
#[derive(Clone, Debug)]
pub struct FlatPrimitive {
    pub id: SceneNodeId,
    pub name: String,
    /// Owning assembly.
    pub parent: Option<SceneNodeId>,
    pub shape: Shape,
    pub material: MaterialId,
    pub world_transform: Mat4,
    pub world_bounds: Aabb,
}

impl FlatPrimitive {
    /// World-space origin of the primitive.
    pub fn world_position(&self) -> Vec3 {
        self.world_transform.transform_point3(Vec3::ZERO)
    }
}
