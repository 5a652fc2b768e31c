//! Straight road along X with lane markings and sidewalks.

use glam::{Vec3, Vec3Swizzles};

use crate::core::{is_valid_extent, Error, Result, MAX_EXTENT};
use crate::scene::{MaterialId, MaterialParams, MaterialRegistry, PlacedPrimitive, Scene, SceneNodeId, Shape};

pub const SURFACE_THICKNESS: f32 = 0.1;
pub const DASH_LENGTH: f32 = 2.0;
pub const DASH_GAP: f32 = 1.0;
const DASH_WIDTH: f32 = 0.1;
const CENTERLINE_WIDTH: f32 = 0.15;
const MARKING_THICKNESS: f32 = 0.02;
/// Markings sit just above the surface top.
const MARKING_Z: f32 = 0.01;
pub const SIDEWALK_WIDTH: f32 = 2.0;
const SIDEWALK_HEIGHT: f32 = 0.2;
const SIDEWALK_Z: f32 = 0.05;

/// Road dimensions and world placement.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSpec {
    pub length: f32,
    pub width: f32,
    pub position: Vec3,
}

impl Default for RoadSpec {
    fn default() -> Self {
        Self {
            length: 40.0,
            width: 8.0,
            position: Vec3::new(0.0, -18.0, 0.0),
        }
    }
}

impl RoadSpec {
    pub fn validate(&self) -> Result<()> {
        if !(is_valid_extent(self.length) && is_valid_extent(self.width)) {
            return Err(Error::InvalidDimension(format!(
                "road length {} and width {} must lie in (0, {MAX_EXTENT}]",
                self.length, self.width
            )));
        }
        if !self.position.is_finite() {
            return Err(Error::InvalidDimension(format!("road position {} must be finite", self.position)));
        }
        Ok(())
    }

    /// Number of dashed marking pairs that fit along the road.
    pub fn dash_count(&self) -> usize {
        (self.length / (DASH_LENGTH + DASH_GAP)).floor() as usize
    }
}

/// Road materials are shared by every road in a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoadMaterials {
    pub asphalt: MaterialId,
    pub line: MaterialId,
    pub sidewalk: MaterialId,
}

impl RoadMaterials {
    pub fn register(registry: &mut MaterialRegistry) -> Result<Self> {
        Ok(Self {
            asphalt: registry.get_or_create("Asphalt", MaterialParams::color([0.15; 3]).roughness(0.95))?,
            line: registry.get_or_create("RoadLine", MaterialParams::color([0.95, 0.95, 0.9]).roughness(0.5))?,
            sidewalk: registry.get_or_create("Sidewalk", MaterialParams::color([0.6; 3]).roughness(0.85))?,
        })
    }
}

/// Surface, centerline, dash pairs, then both sidewalks, in road-local coordinates.
pub fn layout_road(spec: &RoadSpec, materials: &RoadMaterials) -> Result<Vec<PlacedPrimitive>> {
    spec.validate()?;

    let (l, w) = (spec.length, spec.width);
    let dashes = spec.dash_count();
    let mut parts = Vec::with_capacity(4 + 2 * dashes);

    parts.push(PlacedPrimitive::new(
        "Road_Surface",
        Shape::cuboid(l, w, SURFACE_THICKNESS),
        Vec3::new(0.0, 0.0, -SURFACE_THICKNESS / 2.0),
        materials.asphalt,
    ));
    parts.push(PlacedPrimitive::new(
        "Road_CenterLine",
        Shape::cuboid(l, CENTERLINE_WIDTH, MARKING_THICKNESS),
        Vec3::new(0.0, 0.0, MARKING_Z),
        materials.line,
    ));

    for i in 0..dashes {
        let x = -l / 2.0 + (DASH_LENGTH + DASH_GAP) * i as f32 + DASH_LENGTH / 2.0 + 1.0;
        for (label, y) in [("Left", -w / 4.0), ("Right", w / 4.0)] {
            parts.push(PlacedPrimitive::new(
                format!("Road_Dash_{i}_{label}"),
                Shape::cuboid(DASH_LENGTH, DASH_WIDTH, MARKING_THICKNESS),
                Vec3::new(x, y, MARKING_Z),
                materials.line,
            ));
        }
    }

    let offset = w / 2.0 + SIDEWALK_WIDTH / 2.0;
    for (label, y) in [("Left", -offset), ("Right", offset)] {
        parts.push(PlacedPrimitive::new(
            format!("Sidewalk_{label}"),
            Shape::cuboid(l, SIDEWALK_WIDTH, SIDEWALK_HEIGHT),
            Vec3::new(0.0, y, SIDEWALK_Z),
            materials.sidewalk,
        ));
    }
    Ok(parts)
}

/// Generate the `Road` assembly at `spec.position`.
pub fn build_road(scene: &mut Scene, spec: &RoadSpec) -> Result<SceneNodeId> {
    spec.validate()?;

    let materials = RoadMaterials::register(scene.materials_mut())?;
    let parts = layout_road(spec, &materials)?;

    let parent = scene.root();
    let graph = scene.graph_mut();
    let root = graph.add_assembly(parent, "Road", spec.position);
    graph.add_primitives(root, parts);

    log::debug!(
        "road {}x{} at {:?}, {} dash pairs",
        spec.length,
        spec.width,
        spec.position.xy(),
        spec.dash_count()
    );
    Ok(root)
}
