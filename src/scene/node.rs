//! Scene graph node types
//!
//! Core types for the scene arena: node IDs, transforms, shape variants, and nodes.

use glam::{Mat4, Quat, Vec3};

use crate::geometry::font::{self, TextSpec};
use crate::math::Aabb;

use super::material::MaterialId;

/// Unique identifier for a scene graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneNodeId(pub u64);

/// Local transform relative to the parent node.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with translation and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Solid kinds the generator can place.
///
/// Dimensions live on the variant, so the node transform of a primitive
/// only ever carries translation and rotation.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned box with full edge lengths.
    Box { size: Vec3 },
    /// Z-aligned cylinder centered on its origin.
    Cylinder { radius: f32, height: f32 },
    /// UV sphere centered on its origin.
    Sphere { radius: f32 },
    /// Extruded block-font text.
    Text(TextSpec),
}

impl Shape {
    /// Shorthand for a box from its three edge lengths.
    pub fn cuboid(x: f32, y: f32, z: f32) -> Self {
        Shape::Box { size: Vec3::new(x, y, z) }
    }

    /// Scale applied to the shape's unit mesh at export time.
    ///
    /// Text meshes are built at final size, so they export unscaled.
    pub fn mesh_scale(&self) -> Vec3 {
        match self {
            Shape::Box { size } => *size,
            Shape::Cylinder { radius, height } => Vec3::new(*radius, *radius, *height),
            Shape::Sphere { radius } => Vec3::splat(*radius),
            Shape::Text(_) => Vec3::ONE,
        }
    }

    /// Bounds in the shape's own frame.
    pub fn local_bounds(&self) -> Aabb {
        match self {
            Shape::Box { size } => Aabb::from_center_half_extent(Vec3::ZERO, *size * 0.5),
            Shape::Cylinder { radius, height } => Aabb::from_center_half_extent(
                Vec3::ZERO,
                Vec3::new(*radius, *radius, *height * 0.5),
            ),
            Shape::Sphere { radius } => Aabb::from_center_half_extent(Vec3::ZERO, Vec3::splat(*radius)),
            Shape::Text(spec) => font::text_bounds(spec),
        }
    }
}

/// A primitive computed by a layout function but not yet inserted into a scene.
///
/// Layout code is pure: it returns these, and the caller decides which
/// assembly owns them.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedPrimitive {
    pub name: String,
    pub shape: Shape,
    pub position: Vec3,
    pub rotation: Quat,
    pub material: MaterialId,
}

impl PlacedPrimitive {
    /// Unrotated primitive at `position`.
    pub fn new(name: impl Into<String>, shape: Shape, position: Vec3, material: MaterialId) -> Self {
        Self {
            name: name.into(),
            shape,
            position,
            rotation: Quat::IDENTITY,
            material,
        }
    }

    /// Replace the rotation.
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Bounds in the owning assembly's frame.
    pub fn bounds(&self) -> Aabb {
        let m = Mat4::from_rotation_translation(self.rotation, self.position);
        self.shape.local_bounds().transformed(&m)
    }
}

/// What a scene node contains.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeContent {
    /// A named grouping node with no geometry of its own.
    Assembly,

    /// One placed solid.
    Primitive { shape: Shape, material: MaterialId },
}

/// A single node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: SceneNodeId,
    pub name: String,
    pub parent: Option<SceneNodeId>,
    pub children: Vec<SceneNodeId>,
    pub local_transform: LocalTransform,
    /// Cached world transform (recomputed during propagation).
    pub world_transform: Mat4,
    pub content: NodeContent,
}

impl SceneNode {
    /// Create a new scene node.
    pub fn new(id: SceneNodeId, name: impl Into<String>, content: NodeContent) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local_transform: LocalTransform::identity(),
            world_transform: Mat4::IDENTITY,
            content,
        }
    }

    /// True for grouping nodes.
    pub fn is_assembly(&self) -> bool {
        matches!(self.content, NodeContent::Assembly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_node_id_equality() {
        let a = SceneNodeId(1);
        let b = SceneNodeId(1);
        let c = SceneNodeId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_local_transform_identity() {
        let t = LocalTransform::identity();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_mat4(), Mat4::IDENTITY);
    }

    #[test]
    fn test_local_transform_from_position() {
        let pos = Vec3::new(10.0, 5.0, -3.0);
        let t = LocalTransform::from_position(pos);
        let (_, _, translation) = t.to_mat4().to_scale_rotation_translation();
        assert!((translation - pos).length() < 1e-5);
    }

    #[test]
    fn test_shape_mesh_scale() {
        assert_eq!(Shape::cuboid(10.0, 8.0, 0.2).mesh_scale(), Vec3::new(10.0, 8.0, 0.2));
        assert_eq!(
            Shape::Cylinder { radius: 0.15, height: 2.0 }.mesh_scale(),
            Vec3::new(0.15, 0.15, 2.0)
        );
        assert_eq!(Shape::Sphere { radius: 1.0 }.mesh_scale(), Vec3::ONE);
    }

    #[test]
    fn test_cylinder_bounds_are_z_aligned() {
        let b = Shape::Cylinder { radius: 0.5, height: 4.0 }.local_bounds();
        assert_eq!(b.min, Vec3::new(-0.5, -0.5, -2.0));
        assert_eq!(b.max, Vec3::new(0.5, 0.5, 2.0));
    }

    #[test]
    fn test_placed_primitive_bounds_follow_position() {
        let p = PlacedPrimitive::new(
            "slab",
            Shape::cuboid(2.0, 2.0, 0.2),
            Vec3::new(1.0, 0.0, 0.1),
            MaterialId(0),
        );
        let b = p.bounds();
        assert!((b.min - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);
        assert!((b.max - Vec3::new(2.0, 1.0, 0.2)).length() < 1e-5);
    }

    #[test]
    fn test_scene_node_new() {
        let node = SceneNode::new(SceneNodeId(0), "root", NodeContent::Assembly);
        assert_eq!(node.id, SceneNodeId(0));
        assert_eq!(node.name, "root");
        assert!(node.parent.is_none());
        assert!(node.children.is_empty());
        assert!(node.is_assembly());
    }
}
