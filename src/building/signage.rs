//! Signage: extruded text on a wall face or standing on the roof edge.
//!
//! Placement uses the dimensions of the building it is attached to, so signs
//! sit on the actual facade regardless of footprint or story height.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use glam::{Quat, Vec3};

use crate::core::{is_valid_extent, Error, Result};
use crate::geometry::{TextSpec, VerticalAlign};
use crate::scene::{MaterialId, MaterialParams, PlacedPrimitive, Scene, SceneNodeId, Shape};

use super::{Building, BuildingParams};

/// Wall text glyph size.
pub const WALL_TEXT_SIZE: f32 = 0.8;
pub const WALL_TEXT_EXTRUSION: f32 = 0.05;
/// Gap between the wall face and the text.
pub const WALL_TEXT_OFFSET: f32 = 0.01;
/// Text center height as a fraction of the story height.
pub const WALL_TEXT_HEIGHT_RATIO: f32 = 0.6;
pub const ROOF_TEXT_EXTRUSION: f32 = 0.08;
/// Roof text stands this far in front of the front face.
pub const ROOF_TEXT_SETBACK: f32 = 0.15;
/// Roof text baseline above the top of the last story.
pub const ROOF_TEXT_LIFT: f32 = 0.3;

/// Face of the building a sign is mounted on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WallSide {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

impl WallSide {
    /// Outward face normal.
    pub fn normal(self) -> Vec3 {
        match self {
            WallSide::Front => Vec3::NEG_Y,
            WallSide::Back => Vec3::Y,
            WallSide::Left => Vec3::NEG_X,
            WallSide::Right => Vec3::X,
        }
    }

    /// Yaw about Z applied after standing the text up.
    fn yaw(self) -> f32 {
        match self {
            WallSide::Front => 0.0,
            WallSide::Back => PI,
            WallSide::Left => -FRAC_PI_2,
            WallSide::Right => FRAC_PI_2,
        }
    }

    /// Stand the text up (90° about X) then turn it to face outward.
    pub fn rotation(self) -> Quat {
        Quat::from_rotation_z(self.yaw()) * Quat::from_rotation_x(FRAC_PI_2)
    }

    /// Distance from the building center to this face.
    fn face_distance(self, params: &BuildingParams) -> f32 {
        match self {
            WallSide::Front | WallSide::Back => params.depth / 2.0,
            WallSide::Left | WallSide::Right => params.width / 2.0,
        }
    }
}

impl FromStr for WallSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "front" => Ok(WallSide::Front),
            "back" => Ok(WallSide::Back),
            "left" => Ok(WallSide::Left),
            "right" => Ok(WallSide::Right),
            _ => Err(Error::UnknownSide(s.to_string())),
        }
    }
}

impl fmt::Display for WallSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WallSide::Front => "front",
            WallSide::Back => "back",
            WallSide::Left => "left",
            WallSide::Right => "right",
        };
        f.write_str(s)
    }
}

/// Where a building's sign goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextPlacement {
    #[default]
    Wall,
    Roof,
}

impl FromStr for TextPlacement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "wall" => Ok(TextPlacement::Wall),
            "roof" => Ok(TextPlacement::Roof),
            _ => Err(Error::UnknownSide(s.to_string())),
        }
    }
}

fn check_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::Config("signage text is empty".into()));
    }
    Ok(())
}

/// Lay out wall text for story `floor_index` on `side`.
pub fn layout_wall_text(
    name: &str,
    params: &BuildingParams,
    text: &str,
    floor_index: u32,
    side: WallSide,
    material: MaterialId,
) -> Result<PlacedPrimitive> {
    check_text(text)?;
    if floor_index < 1 || floor_index > params.floor_count {
        return Err(Error::InvalidDimension(format!(
            "text floor {} outside 1..={}",
            floor_index, params.floor_count
        )));
    }

    let z = (floor_index - 1) as f32 * params.story_height + params.story_height * WALL_TEXT_HEIGHT_RATIO;
    let out = side.normal() * (side.face_distance(params) + WALL_TEXT_OFFSET);

    Ok(PlacedPrimitive::new(
        format!("{name}_Text_{text}"),
        Shape::Text(TextSpec::new(text, WALL_TEXT_SIZE, WALL_TEXT_EXTRUSION, VerticalAlign::Center)),
        Vec3::new(out.x, out.y, z),
        material,
    )
    .rotated(side.rotation()))
}

/// Lay out text standing upright on the front roof edge.
///
/// Glyph meshes lie in their local XY plane, so the front-wall rotation
/// (a quarter turn about X) is what stands the letters up facing -Y.
/// Without it the text would lie flat on the roof.
pub fn layout_roof_text(
    name: &str,
    params: &BuildingParams,
    text: &str,
    size: f32,
    material: MaterialId,
) -> Result<PlacedPrimitive> {
    check_text(text)?;
    if !is_valid_extent(size) {
        return Err(Error::InvalidDimension(format!("text size {size} must be positive and finite")));
    }

    let z = params.floor_count as f32 * params.story_height + ROOF_TEXT_LIFT;
    let y = -params.depth / 2.0 - ROOF_TEXT_SETBACK;

    Ok(PlacedPrimitive::new(
        format!("{name}_RoofText_{text}"),
        Shape::Text(TextSpec::new(text, size, ROOF_TEXT_EXTRUSION, VerticalAlign::Bottom)),
        Vec3::new(0.0, y, z),
        material,
    )
    .rotated(WallSide::Front.rotation()))
}

fn text_material(scene: &mut Scene, name: String, color: [f32; 3]) -> Result<MaterialId> {
    scene
        .materials_mut()
        .get_or_create(name, MaterialParams::color(color).roughness(0.3))
}

/// Mount `text` on a wall of `building`. Returns the text node.
pub fn place_wall_text(
    scene: &mut Scene,
    building: &Building,
    text: &str,
    floor_index: u32,
    side: WallSide,
    color: [f32; 3],
) -> Result<SceneNodeId> {
    check_text(text)?;
    let material = text_material(scene, format!("{}_Text_{}", building.name, text), color)?;
    let placed = layout_wall_text(&building.name, &building.params, text, floor_index, side, material)?;
    log::debug!("wall text {:?} on {} ({side}, floor {floor_index})", text, building.name);
    Ok(scene.graph_mut().add_primitive(building.root, placed))
}

/// Stand `text` on the front roof edge of `building`. Returns the text node.
pub fn place_roof_text(
    scene: &mut Scene,
    building: &Building,
    text: &str,
    color: [f32; 3],
    size: f32,
) -> Result<SceneNodeId> {
    check_text(text)?;
    let material = text_material(scene, format!("{}_RoofText_{}", building.name, text), color)?;
    let placed = layout_roof_text(&building.name, &building.params, text, size, material)?;
    log::debug!("roof text {:?} on {}", text, building.name);
    Ok(scene.graph_mut().add_primitive(building.root, placed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::build_building;

    fn params() -> BuildingParams {
        BuildingParams {
            width: 12.0,
            depth: 10.0,
            story_height: 4.0,
            floor_count: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_side_parsing() {
        assert_eq!("front".parse::<WallSide>().unwrap(), WallSide::Front);
        assert_eq!("Back".parse::<WallSide>().unwrap(), WallSide::Back);
        assert!(matches!("diagonal".parse::<WallSide>(), Err(Error::UnknownSide(_))));
        assert_eq!("roof".parse::<TextPlacement>().unwrap(), TextPlacement::Roof);
        assert!(matches!("sky".parse::<TextPlacement>(), Err(Error::UnknownSide(_))));
        for side in [WallSide::Front, WallSide::Back, WallSide::Left, WallSide::Right] {
            assert_eq!(side.to_string().parse::<WallSide>().unwrap(), side);
        }
    }

    #[test]
    fn test_text_faces_outward_and_upright() {
        for side in [WallSide::Front, WallSide::Back, WallSide::Left, WallSide::Right] {
            let rot = side.rotation();
            // Text reads from local +Z and its glyphs grow along local +Y.
            assert!((rot * Vec3::Z - side.normal()).length() < 1e-5, "{side}");
            assert!((rot * Vec3::Y - Vec3::Z).length() < 1e-5, "{side}");
        }
    }

    #[test]
    fn test_wall_text_uses_building_dimensions() {
        let p = params();
        let front = layout_wall_text("Office", &p, "OFFICE", 3, WallSide::Front, MaterialId(0)).unwrap();
        assert!((front.position.y + 5.01).abs() < 1e-5);
        assert!((front.position.z - (2.0 * 4.0 + 4.0 * 0.6)).abs() < 1e-5);
        assert_eq!(front.name, "Office_Text_OFFICE");

        let right = layout_wall_text("Office", &p, "OFFICE", 1, WallSide::Right, MaterialId(0)).unwrap();
        assert!((right.position.x - 6.01).abs() < 1e-5);
        assert!(right.position.y.abs() < 1e-6);

        let left = layout_wall_text("Office", &p, "OFFICE", 1, WallSide::Left, MaterialId(0)).unwrap();
        assert!((left.position.x + 6.01).abs() < 1e-5);
    }

    #[test]
    fn test_wall_text_stays_off_the_wall() {
        let p = params();
        let placed = layout_wall_text("B", &p, "TEST", 2, WallSide::Back, MaterialId(0)).unwrap();
        // Extrusion pokes back toward the wall but never past the outer face minus extrusion.
        let b = placed.bounds();
        assert!(b.min.y >= p.depth / 2.0 + WALL_TEXT_OFFSET - WALL_TEXT_EXTRUSION - 1e-5);
    }

    #[test]
    fn test_wall_text_floor_out_of_range() {
        let p = params();
        assert!(layout_wall_text("B", &p, "X", 0, WallSide::Front, MaterialId(0)).is_err());
        assert!(layout_wall_text("B", &p, "X", 4, WallSide::Front, MaterialId(0)).is_err());
        assert!(layout_wall_text("B", &p, "  ", 1, WallSide::Front, MaterialId(0)).is_err());
    }

    #[test]
    fn test_roof_text_stands_on_front_edge() {
        let p = BuildingParams {
            width: 8.0,
            depth: 6.0,
            story_height: 4.0,
            floor_count: 1,
            ..Default::default()
        };
        let placed = layout_roof_text("Shop", &p, "SHOP", 1.2, MaterialId(0)).unwrap();
        assert!((placed.position.z - 4.3).abs() < 1e-5);
        assert!((placed.position.y + 3.15).abs() < 1e-5);

        let b = placed.bounds();
        assert!((b.min.z - 4.3).abs() < 1e-4);
        assert!((b.size().z - 1.2 * 0.7).abs() < 1e-4);
        assert!(b.size().y < 0.2);
    }

    #[test]
    fn test_roof_text_rejects_bad_size() {
        let p = params();
        assert!(layout_roof_text("B", &p, "X", 0.0, MaterialId(0)).is_err());
        assert!(layout_roof_text("B", &p, "X", f32::INFINITY, MaterialId(0)).is_err());
        assert!(layout_roof_text("B", &p, "X", f32::NAN, MaterialId(0)).is_err());
    }

    #[test]
    fn test_place_text_parents_to_building() {
        let mut scene = Scene::new("test");
        let building = build_building(&mut scene, "Cafe", &params()).unwrap();
        let wall = place_wall_text(&mut scene, &building, "CAFE", 1, WallSide::Front, [0.6, 0.3, 0.1]).unwrap();
        let roof = place_roof_text(&mut scene, &building, "CAFE", [0.8, 0.2, 0.1], 1.0).unwrap();

        assert_eq!(scene.graph().get(wall).unwrap().parent, Some(building.root));
        assert_eq!(scene.graph().get(roof).unwrap().parent, Some(building.root));
        assert!(scene.materials().by_name("Cafe_Text_CAFE").is_some());
        assert!(scene.materials().by_name("Cafe_RoofText_CAFE").is_some());
    }
}
