//! Entrance generator: framed double glass doors with a canopy.
//!
//! The entrance is its own assembly under the building root, laid out in
//! building-local coordinates flush with the front face (y = -depth / 2).

use glam::Vec3;

use crate::core::{Error, Result};
use crate::scene::{MaterialId, MaterialParams, MaterialRegistry, PlacedPrimitive, Scene, SceneNodeId, Shape};

use super::{Building, BuildingParams};

/// Outer frame bar thickness.
pub const FRAME_THICKNESS: f32 = 0.1;
/// Outer frame depth (matches the wall it sits in).
pub const FRAME_DEPTH: f32 = 0.15;
/// Gap between the two leaves, filled by the mullion.
pub const LEAF_GAP: f32 = 0.06;
/// Leaf sub-frame bar thickness.
pub const LEAF_FRAME: f32 = 0.05;
pub const LEAF_DEPTH: f32 = 0.06;
/// Inset of the glass panel from the leaf edge.
pub const GLASS_MARGIN: f32 = 0.08;
pub const GLASS_THICKNESS: f32 = 0.02;
pub const HANDLE_RADIUS: f32 = 0.02;
pub const HANDLE_LENGTH: f32 = 0.3;
/// Handle distance in from the leaf's outer edge.
const HANDLE_INSET: f32 = 0.1;
/// Handle standoff in front of the leaf.
const HANDLE_STANDOFF: f32 = 0.04;
/// Handle height as a fraction of the leaf height.
const HANDLE_HEIGHT_RATIO: f32 = 0.45;
const CANOPY_PROJECTION: f32 = 0.6;
const CANOPY_RISE: f32 = 0.25;
const CANOPY_THICKNESS: f32 = 0.1;

/// Doorway opening size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntranceSpec {
    pub width: f32,
    pub height: f32,
}

impl Default for EntranceSpec {
    fn default() -> Self {
        Self { width: 2.0, height: 2.5 }
    }
}

impl EntranceSpec {
    /// Width of one door leaf.
    pub fn leaf_width(&self) -> f32 {
        (self.width - LEAF_GAP) / 2.0
    }

    /// Leaves run from the ground to the underside of the top frame bar.
    pub fn leaf_height(&self) -> f32 {
        self.height - FRAME_THICKNESS / 2.0
    }

    /// Check the opening against the building it is attached to.
    pub fn validate(&self, building: &BuildingParams) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0 && self.width < building.width) {
            return Err(Error::InvalidEntrance(format!(
                "width {} must lie in (0, building width {})",
                self.width, building.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0 && self.height < building.story_height) {
            return Err(Error::InvalidEntrance(format!(
                "height {} must lie in (0, story height {})",
                self.height, building.story_height
            )));
        }
        if self.leaf_width() - 2.0 * GLASS_MARGIN <= 0.0 {
            return Err(Error::InvalidEntrance(format!(
                "width {} leaves no room for glass panels",
                self.width
            )));
        }
        if self.leaf_height() - 2.0 * GLASS_MARGIN <= 0.0 {
            return Err(Error::InvalidEntrance(format!(
                "height {} leaves no room for glass panels",
                self.height
            )));
        }
        if building.entrance_width > 0.0 && (building.entrance_width - self.width).abs() > 1e-4 {
            return Err(Error::InvalidEntrance(format!(
                "width {} does not match the ground-floor wall gap {}",
                self.width, building.entrance_width
            )));
        }
        Ok(())
    }
}

/// Materials shared by every part of one building's entrance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntranceMaterials {
    pub frame: MaterialId,
    pub glass: MaterialId,
    pub handle: MaterialId,
}

impl EntranceMaterials {
    pub fn register(registry: &mut MaterialRegistry, building_name: &str) -> Result<Self> {
        Ok(Self {
            frame: registry.get_or_create(
                format!("{building_name}_EntranceFrame"),
                MaterialParams::color([0.2, 0.2, 0.25]).metallic(0.8),
            )?,
            glass: registry.get_or_create(
                format!("{building_name}_DoorGlass"),
                MaterialParams::color([0.6, 0.8, 0.9]).metallic(0.2).roughness(0.05).alpha(0.35),
            )?,
            handle: registry.get_or_create(
                format!("{building_name}_DoorHandle"),
                MaterialParams::color([0.75, 0.75, 0.78]).metallic(1.0).roughness(0.2),
            )?,
        })
    }
}

/// Lay out frame, leaves, mullion and canopy in building-local coordinates.
pub fn layout_entrance(
    name: &str,
    building: &BuildingParams,
    spec: &EntranceSpec,
    materials: &EntranceMaterials,
) -> Result<Vec<PlacedPrimitive>> {
    spec.validate(building)?;

    let EntranceSpec { width, height } = *spec;
    let face_y = -building.depth / 2.0;
    let frame_y = face_y + FRAME_DEPTH / 2.0;
    let leaf_w = spec.leaf_width();
    let leaf_h = spec.leaf_height();

    let mut out = Vec::new();

    // Outer frame
    out.push(PlacedPrimitive::new(
        format!("{name}_Entrance_TopFrame"),
        Shape::cuboid(width + FRAME_THICKNESS * 2.0, FRAME_DEPTH, FRAME_THICKNESS),
        Vec3::new(0.0, frame_y, height),
        materials.frame,
    ));
    for (label, sign) in [("Left", -1.0), ("Right", 1.0)] {
        out.push(PlacedPrimitive::new(
            format!("{name}_Entrance_{label}Frame"),
            Shape::cuboid(FRAME_THICKNESS, FRAME_DEPTH, height),
            Vec3::new(sign * (width / 2.0 + FRAME_THICKNESS / 2.0), frame_y, height / 2.0),
            materials.frame,
        ));
    }

    // Leaves: sub-frame, glass, handle
    for (i, sign) in [-1.0_f32, 1.0].into_iter().enumerate() {
        let cx = sign * (LEAF_GAP / 2.0 + leaf_w / 2.0);
        let leaf = format!("{name}_Door_{i}");

        let rail = Shape::cuboid(leaf_w, LEAF_DEPTH, LEAF_FRAME);
        out.push(PlacedPrimitive::new(
            format!("{leaf}_FrameTop"),
            rail.clone(),
            Vec3::new(cx, frame_y, leaf_h - LEAF_FRAME / 2.0),
            materials.frame,
        ));
        out.push(PlacedPrimitive::new(
            format!("{leaf}_FrameBottom"),
            rail,
            Vec3::new(cx, frame_y, LEAF_FRAME / 2.0),
            materials.frame,
        ));

        let stile = Shape::cuboid(LEAF_FRAME, LEAF_DEPTH, leaf_h - LEAF_FRAME * 2.0);
        for (label, side) in [("Left", -1.0), ("Right", 1.0)] {
            out.push(PlacedPrimitive::new(
                format!("{leaf}_Frame{label}"),
                stile.clone(),
                Vec3::new(cx + side * (leaf_w / 2.0 - LEAF_FRAME / 2.0), frame_y, leaf_h / 2.0),
                materials.frame,
            ));
        }

        out.push(PlacedPrimitive::new(
            format!("{leaf}_Glass"),
            Shape::cuboid(
                leaf_w - GLASS_MARGIN * 2.0,
                GLASS_THICKNESS,
                leaf_h - GLASS_MARGIN * 2.0,
            ),
            Vec3::new(cx, frame_y, leaf_h / 2.0),
            materials.glass,
        ));

        out.push(PlacedPrimitive::new(
            format!("{leaf}_Handle"),
            Shape::Cylinder { radius: HANDLE_RADIUS, height: HANDLE_LENGTH },
            Vec3::new(
                cx + sign * (leaf_w / 2.0 - HANDLE_INSET),
                frame_y - LEAF_DEPTH / 2.0 - HANDLE_STANDOFF,
                leaf_h * HANDLE_HEIGHT_RATIO,
            ),
            materials.handle,
        ));
    }

    out.push(PlacedPrimitive::new(
        format!("{name}_Entrance_Mullion"),
        Shape::cuboid(LEAF_GAP, FRAME_DEPTH, leaf_h),
        Vec3::new(0.0, frame_y, leaf_h / 2.0),
        materials.frame,
    ));

    // Canopy
    let canopy_y = face_y - CANOPY_PROJECTION;
    let canopy_z = height + CANOPY_RISE;
    out.push(PlacedPrimitive::new(
        format!("{name}_Canopy"),
        Shape::cuboid(width + 1.0, 1.2, CANOPY_THICKNESS),
        Vec3::new(0.0, canopy_y, canopy_z),
        materials.frame,
    ));
    out.push(PlacedPrimitive::new(
        format!("{name}_Canopy_Glass"),
        Shape::cuboid(width + 0.8, 1.0, GLASS_THICKNESS),
        Vec3::new(0.0, canopy_y, canopy_z + CANOPY_THICKNESS / 2.0 + GLASS_THICKNESS / 2.0),
        materials.glass,
    ));

    Ok(out)
}

/// Attach an entrance assembly to `building`'s front face.
pub fn build_entrance(scene: &mut Scene, building: &Building, spec: &EntranceSpec) -> Result<SceneNodeId> {
    spec.validate(&building.params)?;

    let materials = EntranceMaterials::register(scene.materials_mut(), &building.name)?;
    let parts = layout_entrance(&building.name, &building.params, spec, &materials)?;

    let graph = scene.graph_mut();
    let entrance = graph.add_assembly(building.root, format!("{}_Entrance", building.name), Vec3::ZERO);
    graph.add_primitives(entrance, parts);

    log::debug!("entrance {}x{} on {}", spec.width, spec.height, building.name);
    Ok(entrance)
}
