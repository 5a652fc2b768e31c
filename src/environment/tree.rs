//! Stylized tree: one trunk and five foliage clusters.

use glam::{Vec2, Vec3};

use crate::core::{is_valid_extent, Error, Result};
use crate::scene::{MaterialId, MaterialParams, MaterialRegistry, PlacedPrimitive, Scene, SceneNodeId, Shape};

pub const TRUNK_RADIUS: f32 = 0.15;
/// Trunk height as a fraction of the tree height.
pub const TRUNK_RATIO: f32 = 0.4;
/// Foliage sphere radius as a fraction of the tree height.
pub const FOLIAGE_RATIO: f32 = 0.25;
/// Horizontal offset of the four lateral clusters.
const LATERAL_OFFSET: f32 = 0.3;
const APEX_RISE: f32 = 0.3;
const LATERAL_RISE: f32 = 0.15;

/// One tree to place.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeSpec {
    pub name: String,
    /// Ground position; the tree always stands on z = 0.
    pub position: Vec2,
    pub height: f32,
}

impl TreeSpec {
    pub fn new(name: impl Into<String>, position: Vec2, height: f32) -> Self {
        Self {
            name: name.into(),
            position,
            height,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(is_valid_extent(self.height) && self.position.is_finite()) {
            return Err(Error::InvalidDimension(format!(
                "tree {} at {} with height {} must be finite and positive",
                self.name, self.position, self.height
            )));
        }
        Ok(())
    }

    pub fn trunk_height(&self) -> f32 {
        self.height * TRUNK_RATIO
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeMaterials {
    pub trunk: MaterialId,
    pub leaves: MaterialId,
}

impl TreeMaterials {
    /// Register `{name}_Trunk` and `{name}_Leaves`.
    pub fn register(registry: &mut MaterialRegistry, name: &str) -> Result<Self> {
        Ok(Self {
            trunk: registry.get_or_create(
                format!("{name}_Trunk"),
                MaterialParams::color([0.35, 0.2, 0.1]).roughness(0.9),
            )?,
            leaves: registry.get_or_create(
                format!("{name}_Leaves"),
                MaterialParams::color([0.2, 0.5, 0.15]).roughness(0.8),
            )?,
        })
    }
}

/// Trunk followed by the apex cluster and the four lateral clusters.
pub fn layout_tree(spec: &TreeSpec, materials: &TreeMaterials) -> Result<Vec<PlacedPrimitive>> {
    spec.validate()?;

    let name = &spec.name;
    let h = spec.height;
    let trunk_h = spec.trunk_height();

    let mut parts = Vec::with_capacity(6);
    parts.push(PlacedPrimitive::new(
        format!("{name}_Trunk"),
        Shape::Cylinder { radius: TRUNK_RADIUS, height: trunk_h },
        Vec3::new(0.0, 0.0, trunk_h / 2.0),
        materials.trunk,
    ));

    let apex = Vec3::new(0.0, 0.0, trunk_h + h * APEX_RISE);
    let lateral_z = trunk_h + h * LATERAL_RISE;
    let o = LATERAL_OFFSET;
    let clusters = [
        apex,
        Vec3::new(o, o, lateral_z),
        Vec3::new(-o, o, lateral_z),
        Vec3::new(o, -o, lateral_z),
        Vec3::new(-o, -o, lateral_z),
    ];

    for (i, center) in clusters.into_iter().enumerate() {
        parts.push(PlacedPrimitive::new(
            format!("{name}_Leaves_{i}"),
            Shape::Sphere { radius: h * FOLIAGE_RATIO },
            center,
            materials.leaves,
        ));
    }
    Ok(parts)
}

/// Generate a tree assembly standing at `spec.position`.
pub fn build_tree(scene: &mut Scene, spec: &TreeSpec) -> Result<SceneNodeId> {
    spec.validate()?;

    let materials = TreeMaterials::register(scene.materials_mut(), &spec.name)?;
    let parts = layout_tree(spec, &materials)?;

    let parent = scene.root();
    let graph = scene.graph_mut();
    let root = graph.add_assembly(parent, spec.name.as_str(), spec.position.extend(0.0));
    graph.add_primitives(root, parts);

    log::debug!(
        "tree {} at ({}, {}), height {}",
        spec.name,
        spec.position.x,
        spec.position.y,
        spec.height
    );
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(height: f32) -> Vec<PlacedPrimitive> {
        let mut reg = MaterialRegistry::new();
        let spec = TreeSpec::new("Tree_1", Vec2::ZERO, height);
        let mats = TreeMaterials::register(&mut reg, &spec.name).unwrap();
        layout_tree(&spec, &mats).unwrap()
    }

    #[test]
    fn test_trunk_dimensions() {
        let parts = layout(5.0);
        assert_eq!(parts.len(), 6);
        assert_eq!(parts[0].name, "Tree_1_Trunk");
        assert_eq!(parts[0].shape, Shape::Cylinder { radius: 0.15, height: 2.0 });
        assert!((parts[0].position.z - 1.0).abs() < 1e-6);
        // Trunk base on the ground
        assert!(parts[0].bounds().min.z.abs() < 1e-6);
    }

    #[test]
    fn test_foliage_clusters() {
        let parts = layout(4.0);
        let leaves: Vec<_> = parts.iter().filter(|p| p.name.contains("_Leaves_")).collect();
        assert_eq!(leaves.len(), 5);
        for leaf in &leaves {
            assert_eq!(leaf.shape, Shape::Sphere { radius: 1.0 });
        }
        // Apex sits highest, laterals share one height
        assert!((leaves[0].position - Vec3::new(0.0, 0.0, 1.6 + 1.2)).length() < 1e-5);
        for leaf in &leaves[1..] {
            assert!((leaf.position.z - (1.6 + 0.6)).abs() < 1e-5);
            assert!((leaf.position.x.abs() - 0.3).abs() < 1e-6);
            assert!((leaf.position.y.abs() - 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rejects_non_positive_height() {
        let mut scene = Scene::new("t");
        assert!(matches!(
            build_tree(&mut scene, &TreeSpec::new("T", Vec2::ZERO, 0.0)),
            Err(Error::InvalidDimension(_))
        ));
        assert!(build_tree(&mut scene, &TreeSpec::new("T", Vec2::ZERO, f32::NAN)).is_err());
        assert!(build_tree(&mut scene, &TreeSpec::new("T", Vec2::ZERO, f32::INFINITY)).is_err());
        assert_eq!(scene.graph().node_count(), 1);
    }

    #[test]
    fn test_build_tree_positions_root() {
        let mut scene = Scene::new("t");
        let root = build_tree(&mut scene, &TreeSpec::new("Tree_2", Vec2::new(7.0, -2.0), 4.0)).unwrap();
        let node = scene.graph().get(root).unwrap();
        assert_eq!(node.local_transform.position, Vec3::new(7.0, -2.0, 0.0));
        assert_eq!(scene.graph().children(root).count(), 6);

        let flat = scene.flatten();
        let trunk = flat.iter().find(|p| p.name == "Tree_2_Trunk").unwrap();
        assert!((trunk.world_position() - Vec3::new(7.0, -2.0, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_same_tree_name_twice_reuses_materials() {
        let mut scene = Scene::new("t");
        build_tree(&mut scene, &TreeSpec::new("Tree", Vec2::ZERO, 4.0)).unwrap();
        build_tree(&mut scene, &TreeSpec::new("Tree", Vec2::X * 5.0, 3.0)).unwrap();
        assert_eq!(scene.materials().len(), 2);
    }
}
