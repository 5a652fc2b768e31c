//! Parametric building generation
//!
//! - `floor`: slab, walls and windows of one story
//! - `composer`: stacks stories, adds the roof, owns the building assembly
//! - `entrance`: double glass door assembly on the front face
//! - `signage`: extruded text on a wall face or along the roof edge
//!
//! Coordinates are building-local and Z-up: the footprint is centered on the
//! origin, the front face looks down -Y, and the ground floor starts at z = 0.

pub mod composer;
pub mod entrance;
pub mod floor;
pub mod signage;

pub use composer::{build_building, layout_building, roof_top};
pub use entrance::{build_entrance, layout_entrance, EntranceMaterials, EntranceSpec};
pub use floor::{layout_floor, window_positions, FloorSpec};
pub use signage::{
    layout_roof_text, layout_wall_text, place_roof_text, place_wall_text, TextPlacement, WallSide,
};

use crate::core::{is_valid_extent, Error, Result, MAX_EXTENT};
use crate::scene::{MaterialId, MaterialParams, MaterialRegistry, SceneNodeId};

/// Floor slab thickness.
pub const SLAB_THICKNESS: f32 = 0.2;
/// Exterior wall thickness.
pub const WALL_THICKNESS: f32 = 0.15;
/// Window opening width.
pub const WINDOW_WIDTH: f32 = 1.2;
/// Window opening height.
pub const WINDOW_HEIGHT: f32 = 1.5;
/// Window panes poke slightly through both wall faces.
pub const WINDOW_DEPTH: f32 = WALL_THICKNESS + 0.02;
/// Roof overhang added to each footprint dimension.
pub const ROOF_OVERHANG: f32 = 0.3;
pub const ROOF_THICKNESS: f32 = 0.3;
/// Default wall color when none is configured.
pub const DEFAULT_WALL_COLOR: [f32; 3] = [0.85, 0.82, 0.78];

/// Dimensions of one building.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingParams {
    pub width: f32,
    pub depth: f32,
    pub story_height: f32,
    pub floor_count: u32,
    pub wall_color: [f32; 3],
    /// Gap left in the ground-floor front wall; 0 for none.
    pub entrance_width: f32,
}

impl Default for BuildingParams {
    fn default() -> Self {
        Self {
            width: 10.0,
            depth: 8.0,
            story_height: 3.5,
            floor_count: 2,
            wall_color: DEFAULT_WALL_COLOR,
            entrance_width: 0.0,
        }
    }
}

impl BuildingParams {
    /// Reject parameters that would produce degenerate or negative geometry.
    pub fn validate(&self) -> Result<()> {
        if ![self.width, self.depth, self.story_height].into_iter().all(is_valid_extent) {
            return Err(Error::InvalidDimension(format!(
                "width {}, depth {} and story height {} must lie in (0, {MAX_EXTENT}]",
                self.width, self.depth, self.story_height
            )));
        }
        if self.floor_count < 1 {
            return Err(Error::InvalidDimension("floor count must be at least 1".into()));
        }
        if self.width <= 2.0 * WALL_THICKNESS || self.depth <= 2.0 * WALL_THICKNESS {
            return Err(Error::InvalidDimension(format!(
                "footprint {} x {} must exceed twice the wall thickness ({})",
                self.width,
                self.depth,
                2.0 * WALL_THICKNESS
            )));
        }
        if self.story_height <= SLAB_THICKNESS {
            return Err(Error::InvalidDimension(format!(
                "story height {} must exceed the slab thickness {}",
                self.story_height, SLAB_THICKNESS
            )));
        }
        if !(self.entrance_width >= 0.0 && self.entrance_width < self.width) {
            return Err(Error::InvalidEntrance(format!(
                "entrance width {} must lie in [0, building width {})",
                self.entrance_width, self.width
            )));
        }
        Ok(())
    }

    /// Height of the walls between two slabs.
    pub fn wall_height(&self) -> f32 {
        self.story_height - SLAB_THICKNESS
    }
}

/// The four per-building materials.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildingMaterials {
    pub concrete: MaterialId,
    pub wall: MaterialId,
    pub glass: MaterialId,
    pub roof: MaterialId,
}

impl BuildingMaterials {
    /// Register `{name}_Concrete`, `{name}_Wall`, `{name}_Glass` and `{name}_Roof`.
    pub fn register(registry: &mut MaterialRegistry, name: &str, wall_color: [f32; 3]) -> Result<Self> {
        Ok(Self {
            concrete: registry.get_or_create(
                format!("{name}_Concrete"),
                MaterialParams::color([0.5, 0.5, 0.5]).roughness(0.9),
            )?,
            wall: registry.get_or_create(
                format!("{name}_Wall"),
                MaterialParams::color(wall_color).roughness(0.7),
            )?,
            glass: registry.get_or_create(
                format!("{name}_Glass"),
                MaterialParams::color([0.6, 0.8, 0.9]).metallic(0.9).roughness(0.1).alpha(0.5),
            )?,
            roof: registry.get_or_create(
                format!("{name}_Roof"),
                MaterialParams::color([0.3, 0.3, 0.35]).roughness(0.8),
            )?,
        })
    }
}

/// Handle to a generated building: its assembly root plus the dimensions
/// later generators (entrance, signage) need.
#[derive(Clone, Debug)]
pub struct Building {
    pub name: String,
    pub root: SceneNodeId,
    pub params: BuildingParams,
    pub materials: BuildingMaterials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(BuildingParams::default().validate().is_ok());
        assert!((BuildingParams::default().wall_height() - 3.3).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        for params in [
            BuildingParams { width: 0.0, ..Default::default() },
            BuildingParams { depth: -1.0, ..Default::default() },
            BuildingParams { story_height: 0.0, ..Default::default() },
            BuildingParams { width: f32::NAN, ..Default::default() },
            BuildingParams { width: f32::INFINITY, ..Default::default() },
            BuildingParams { story_height: 1e30, ..Default::default() },
        ] {
            assert!(matches!(params.validate(), Err(Error::InvalidDimension(_))));
        }
    }

    #[test]
    fn test_rejects_zero_floors() {
        let params = BuildingParams { floor_count: 0, ..Default::default() };
        assert!(matches!(params.validate(), Err(Error::InvalidDimension(_))));
    }

    #[test]
    fn test_rejects_footprint_thinner_than_walls() {
        let params = BuildingParams { depth: 0.3, ..Default::default() };
        assert!(matches!(params.validate(), Err(Error::InvalidDimension(_))));
    }

    #[test]
    fn test_rejects_entrance_as_wide_as_building() {
        let params = BuildingParams { entrance_width: 10.0, ..Default::default() };
        assert!(matches!(params.validate(), Err(Error::InvalidEntrance(_))));
        let params = BuildingParams { entrance_width: -1.0, ..Default::default() };
        assert!(matches!(params.validate(), Err(Error::InvalidEntrance(_))));
    }

    #[test]
    fn test_materials_scoped_by_building_name() {
        let mut reg = MaterialRegistry::new();
        let a = BuildingMaterials::register(&mut reg, "Office", [0.7, 0.75, 0.8]).unwrap();
        let b = BuildingMaterials::register(&mut reg, "Office_1", [0.2, 0.2, 0.2]).unwrap();
        assert_ne!(a.wall, b.wall);
        assert_eq!(reg.len(), 8);
        assert!(reg.get(a.glass).unwrap().params.is_blended());
    }
}
