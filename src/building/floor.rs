//! Floor layout: one story's slab, walls and windows.

use glam::Vec3;

use crate::core::{Error, Result};
use crate::scene::{PlacedPrimitive, Shape};

use super::{
    BuildingMaterials, BuildingParams, SLAB_THICKNESS, WALL_THICKNESS, WINDOW_DEPTH, WINDOW_HEIGHT,
    WINDOW_WIDTH,
};

/// Inputs for laying out a single story.
#[derive(Clone, Debug, PartialEq)]
pub struct FloorSpec {
    pub width: f32,
    pub depth: f32,
    pub story_height: f32,
    /// 1-based story number.
    pub floor_index: u32,
    /// Front wall gap; only honored on the ground floor.
    pub entrance_width: f32,
}

impl FloorSpec {
    /// Story `floor_index` of a building.
    pub fn for_building(params: &BuildingParams, floor_index: u32) -> Self {
        Self {
            width: params.width,
            depth: params.depth,
            story_height: params.story_height,
            floor_index,
            entrance_width: if floor_index == 1 { params.entrance_width } else { 0.0 },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.floor_index < 1 {
            return Err(Error::InvalidDimension("floor index is 1-based".into()));
        }
        BuildingParams {
            width: self.width,
            depth: self.depth,
            story_height: self.story_height,
            floor_count: self.floor_index,
            entrance_width: self.entrance_width,
            ..Default::default()
        }
        .validate()
    }

    /// Z of the bottom of this story's slab.
    pub fn base_z(&self) -> f32 {
        (self.floor_index - 1) as f32 * self.story_height
    }

    fn has_entrance(&self) -> bool {
        self.floor_index == 1 && self.entrance_width > 0.0
    }
}

/// Window center x positions, evenly spaced across the facade.
pub fn window_positions(width: f32) -> Vec<f32> {
    let count = ((width / 3.0).floor() as usize).max(1);
    let spacing = width / (count + 1) as f32;
    (0..count)
        .map(|i| -width / 2.0 + spacing * (i + 1) as f32)
        .collect()
}

/// Lay out one story. Output order: slab, walls, then front/back window pairs.
pub fn layout_floor(spec: &FloorSpec, materials: &BuildingMaterials) -> Result<Vec<PlacedPrimitive>> {
    spec.validate()?;

    let FloorSpec { width, depth, floor_index: n, .. } = *spec;
    let base_z = spec.base_z();
    let wall_height = spec.story_height - SLAB_THICKNESS;
    let wall_z = base_z + SLAB_THICKNESS + wall_height / 2.0;
    let front_y = -depth / 2.0 + WALL_THICKNESS / 2.0;
    let back_y = depth / 2.0 - WALL_THICKNESS / 2.0;

    let mut out = Vec::new();

    out.push(PlacedPrimitive::new(
        format!("Floor_{n}_Slab"),
        Shape::cuboid(width, depth, SLAB_THICKNESS),
        Vec3::new(0.0, 0.0, base_z + SLAB_THICKNESS / 2.0),
        materials.concrete,
    ));

    out.push(PlacedPrimitive::new(
        format!("Floor_{n}_Wall_Back"),
        Shape::cuboid(width, WALL_THICKNESS, wall_height),
        Vec3::new(0.0, back_y, wall_z),
        materials.wall,
    ));

    if spec.has_entrance() {
        let segment = (width - spec.entrance_width) / 2.0;
        if segment > 0.0 {
            let offset = spec.entrance_width / 2.0 + segment / 2.0;
            for (label, x) in [("Left", -offset), ("Right", offset)] {
                out.push(PlacedPrimitive::new(
                    format!("Floor_{n}_Wall_Front_{label}"),
                    Shape::cuboid(segment, WALL_THICKNESS, wall_height),
                    Vec3::new(x, front_y, wall_z),
                    materials.wall,
                ));
            }
        } else {
            log::warn!("floor {n}: entrance leaves no front wall, skipping segments");
        }
    } else {
        out.push(PlacedPrimitive::new(
            format!("Floor_{n}_Wall_Front"),
            Shape::cuboid(width, WALL_THICKNESS, wall_height),
            Vec3::new(0.0, front_y, wall_z),
            materials.wall,
        ));
    }

    let side_depth = depth - WALL_THICKNESS * 2.0;
    for (label, x) in [
        ("Right", width / 2.0 - WALL_THICKNESS / 2.0),
        ("Left", -width / 2.0 + WALL_THICKNESS / 2.0),
    ] {
        out.push(PlacedPrimitive::new(
            format!("Floor_{n}_Wall_{label}"),
            Shape::cuboid(WALL_THICKNESS, side_depth, wall_height),
            Vec3::new(x, 0.0, wall_z),
            materials.wall,
        ));
    }

    let window = Shape::cuboid(WINDOW_WIDTH, WINDOW_DEPTH, WINDOW_HEIGHT);
    let door_clearance = spec.entrance_width / 2.0 + WINDOW_WIDTH / 2.0;
    for (i, x) in window_positions(width).into_iter().enumerate() {
        if !spec.has_entrance() || x.abs() > door_clearance {
            out.push(PlacedPrimitive::new(
                format!("Floor_{n}_Window_Front_{i}"),
                window.clone(),
                Vec3::new(x, front_y, wall_z),
                materials.glass,
            ));
        }
        out.push(PlacedPrimitive::new(
            format!("Floor_{n}_Window_Back_{i}"),
            window.clone(),
            Vec3::new(x, back_y, wall_z),
            materials.glass,
        ));
    }

    log::trace!("floor {n}: {} primitives", out.len());
    Ok(out)
}
