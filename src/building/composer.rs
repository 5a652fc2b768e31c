//! Building composer: stacks stories under one assembly and caps them with a roof.

use glam::Vec3;

use crate::core::Result;
use crate::scene::{PlacedPrimitive, Scene, Shape};

use super::floor::{layout_floor, FloorSpec};
use super::{Building, BuildingMaterials, BuildingParams, ROOF_OVERHANG, ROOF_THICKNESS};

/// Center height of the roof slab.
fn roof_center_z(params: &BuildingParams) -> f32 {
    params.floor_count as f32 * params.story_height + ROOF_THICKNESS / 2.0
}

/// Z of the top face of the roof.
pub fn roof_top(params: &BuildingParams) -> f32 {
    roof_center_z(params) + ROOF_THICKNESS / 2.0
}

/// Lay out every story plus the roof, in building-local coordinates.
pub fn layout_building(
    name: &str,
    params: &BuildingParams,
    materials: &BuildingMaterials,
) -> Result<Vec<PlacedPrimitive>> {
    params.validate()?;

    let mut parts = Vec::new();
    for floor_index in 1..=params.floor_count {
        parts.extend(layout_floor(&FloorSpec::for_building(params, floor_index), materials)?);
    }

    parts.push(PlacedPrimitive::new(
        format!("{name}_Roof"),
        Shape::cuboid(
            params.width + ROOF_OVERHANG,
            params.depth + ROOF_OVERHANG,
            ROOF_THICKNESS,
        ),
        Vec3::new(0.0, 0.0, roof_center_z(params)),
        materials.roof,
    ));
    Ok(parts)
}

/// Generate a building assembly named `name` at the scene origin.
///
/// Every floor and roof primitive becomes a direct child of the returned
/// root; reposition the root to move the whole building.
pub fn build_building(scene: &mut Scene, name: &str, params: &BuildingParams) -> Result<Building> {
    params.validate()?;

    let materials = BuildingMaterials::register(scene.materials_mut(), name, params.wall_color)?;
    let parts = layout_building(name, params, &materials)?;
    let part_count = parts.len();

    let parent = scene.root();
    let graph = scene.graph_mut();
    let root = graph.add_assembly(parent, name, Vec3::ZERO);
    graph.add_primitives(root, parts);

    log::debug!(
        "building {}: {} floors, {}x{}m, {} primitives",
        name,
        params.floor_count,
        params.width,
        params.depth,
        part_count
    );

    Ok(Building {
        name: name.to_string(),
        root,
        params: params.clone(),
        materials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::window_positions;
    use crate::core::Error;
    use crate::scene::NodeContent;

    #[test]
    fn test_two_story_building_primitive_count() {
        let mut scene = Scene::new("test");
        let params = BuildingParams::default();
        let building = build_building(&mut scene, "Building_Basic", &params).unwrap();

        let windows = window_positions(10.0).len();
        let expected = 2 * (1 + 4 + 2 * windows) + 1;
        assert_eq!(scene.graph().children(building.root).count(), expected);
    }

    #[test]
    fn test_roof_placement() {
        let mut scene = Scene::new("test");
        let building = build_building(&mut scene, "B", &BuildingParams::default()).unwrap();
        let roof_id = scene.graph().find_child(building.root, "B_Roof").unwrap();
        let roof = scene.graph().get(roof_id).unwrap();

        assert!((roof.local_transform.position.z - 7.15).abs() < 1e-5);
        match &roof.content {
            NodeContent::Primitive { shape: Shape::Box { size }, material } => {
                assert!((*size - Vec3::new(10.3, 8.3, 0.3)).length() < 1e-5);
                assert_eq!(*material, building.materials.roof);
            }
            other => panic!("unexpected roof content {:?}", other),
        }
    }

    #[test]
    fn test_roof_top_monotonic_in_floors() {
        let mut last = 0.0;
        for floors in 1..6 {
            let params = BuildingParams { floor_count: floors, ..Default::default() };
            let top = roof_top(&params);
            assert!((top - (floors as f32 * 3.5 + 0.15 + 0.15)).abs() < 1e-5);
            assert!(top > last);
            last = top;
        }
    }

    #[test]
    fn test_all_parts_parented_to_root() {
        let mut scene = Scene::new("test");
        let building = build_building(&mut scene, "B", &BuildingParams::default()).unwrap();
        for child in scene.graph().children(building.root) {
            assert_eq!(scene.graph().get(child).unwrap().parent, Some(building.root));
        }
        let root_node = scene.graph().get(building.root).unwrap();
        assert_eq!(root_node.name, "B");
        assert_eq!(root_node.parent, Some(scene.root()));
    }

    #[test]
    fn test_invalid_building_leaves_scene_untouched() {
        let mut scene = Scene::new("test");
        let params = BuildingParams { floor_count: 0, ..Default::default() };
        assert!(matches!(
            build_building(&mut scene, "B", &params),
            Err(Error::InvalidDimension(_))
        ));
        assert_eq!(scene.graph().node_count(), 1);
        assert!(scene.materials().is_empty());
    }

    #[test]
    fn test_entrance_gap_only_on_ground_floor() {
        let mut scene = Scene::new("test");
        let params = BuildingParams { entrance_width: 2.5, floor_count: 3, ..Default::default() };
        let building = build_building(&mut scene, "B", &params).unwrap();
        let names: Vec<String> = scene
            .graph()
            .children(building.root)
            .map(|c| scene.graph().get(c).unwrap().name.clone())
            .collect();
        assert!(names.contains(&"Floor_1_Wall_Front_Left".to_string()));
        assert!(names.contains(&"Floor_2_Wall_Front".to_string()));
        assert!(names.contains(&"Floor_3_Wall_Front".to_string()));
        assert!(!names.contains(&"Floor_1_Wall_Front".to_string()));
    }
}
