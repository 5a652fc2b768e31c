//! Declarative scene configuration (JSON, camelCase keys).
//!
//! Every field is optional. Defaults fill in absent fields only; a field
//! that is present but malformed is a parse error.

use std::collections::HashSet;
use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::building::{BuildingParams, EntranceSpec, TextPlacement, WallSide, DEFAULT_WALL_COLOR};
use crate::core::{is_valid_extent, Error, Result};
use crate::environment::RoadSpec;

/// Default seed for configured random tree heights.
pub const DEFAULT_SEED: u64 = 12345;
pub const DEFAULT_TEXT_COLOR: [f32; 3] = [0.1, 0.1, 0.1];
pub const DEFAULT_TREE_HEIGHT: f32 = 4.0;

/// Root of a scene configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    pub scene: SceneSettings,
    pub buildings: Vec<BuildingConfig>,
    /// Absent means a default road; present with `enabled: false` means none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road: Option<RoadConfig>,
    pub trees: Vec<TreeConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneSettings {
    /// Output file stem.
    pub name: String,
    pub seed: u64,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            name: "scene".into(),
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildingConfig {
    pub name: String,
    pub width: f32,
    pub depth: f32,
    pub floor_height: f32,
    pub floors: u32,
    pub wall_color: [f32; 3],
    /// Ground-plane offset; buildings always stand on z = 0.
    pub position: [f32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub text_color: [f32; 3],
    /// `wall` or `roof`.
    pub text_position: String,
    /// `front`, `back`, `left` or `right`; wall text only.
    pub text_side: String,
    pub text_floor: u32,
    /// Glyph size for roof text.
    pub text_size: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrance: Option<EntranceConfig>,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        let params = BuildingParams::default();
        Self {
            name: "Building".into(),
            width: params.width,
            depth: params.depth,
            floor_height: params.story_height,
            floors: params.floor_count,
            wall_color: DEFAULT_WALL_COLOR,
            position: [0.0, 0.0],
            text: None,
            text_color: DEFAULT_TEXT_COLOR,
            text_position: "wall".into(),
            text_side: "front".into(),
            text_floor: 1,
            text_size: 1.0,
            entrance: None,
        }
    }
}

impl BuildingConfig {
    /// Building parameters, with the ground-floor gap sized to the entrance.
    pub fn params(&self) -> BuildingParams {
        BuildingParams {
            width: self.width,
            depth: self.depth,
            story_height: self.floor_height,
            floor_count: self.floors,
            wall_color: self.wall_color,
            entrance_width: self.entrance.as_ref().map_or(0.0, |e| e.width),
        }
    }

    pub fn entrance_spec(&self) -> Option<EntranceSpec> {
        self.entrance.as_ref().map(|e| EntranceSpec {
            width: e.width,
            height: e.height,
        })
    }

    pub fn placement(&self) -> Result<TextPlacement> {
        self.text_position.parse()
    }

    pub fn side(&self) -> Result<WallSide> {
        self.text_side.parse()
    }

    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.position[0], self.position[1], 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntranceConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for EntranceConfig {
    fn default() -> Self {
        let spec = EntranceSpec::default();
        Self {
            width: spec.width,
            height: spec.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoadConfig {
    pub enabled: bool,
    pub length: f32,
    pub width: f32,
    pub position: [f32; 3],
}

impl Default for RoadConfig {
    fn default() -> Self {
        let spec = RoadSpec::default();
        Self {
            enabled: true,
            length: spec.length,
            width: spec.width,
            position: spec.position.to_array(),
        }
    }
}

impl RoadConfig {
    pub fn spec(&self) -> RoadSpec {
        RoadSpec {
            length: self.length,
            width: self.width,
            position: Vec3::from_array(self.position),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeConfig {
    /// Defaults to `Tree_<index>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub position: [f32; 2],
    pub height: f32,
    /// `[min, max]`; overrides `height` with a seeded draw when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_range: Option<[f32; 2]>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            name: None,
            position: [0.0, 0.0],
            height: DEFAULT_TREE_HEIGHT,
            height_range: None,
        }
    }
}

impl TreeConfig {
    pub fn name_or_default(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("Tree_{index}"))
    }

    pub fn ground_position(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }
}

fn check_color(path: &str, color: [f32; 3]) -> Result<()> {
    if color.iter().all(|c| (0.0..=1.0).contains(c)) {
        Ok(())
    } else {
        Err(Error::Config(format!("{path}: color {color:?} must be within [0, 1]")))
    }
}

fn check_finite(path: &str, values: &[f32]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::Config(format!("{path}: {values:?} must be finite")))
    }
}

impl SceneConfig {
    /// Parse and validate a configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        log::debug!("loaded config {}", path.display());
        Self::from_json(&json)
    }

    /// Road to generate, if any.
    pub fn effective_road(&self) -> Option<RoadSpec> {
        match &self.road {
            None => Some(RoadSpec::default()),
            Some(road) if road.enabled => Some(road.spec()),
            Some(_) => None,
        }
    }

    /// Semantic checks serde cannot express. Errors name the offending
    /// field path, e.g. `buildings[1].textSide`.
    ///
    /// Dimension and entrance geometry checks stay with the generators and
    /// are reported by the composer with the same path prefix.
    pub fn validate(&self) -> Result<()> {
        if self.scene.name.trim().is_empty() {
            return Err(Error::Config("scene.name: must not be empty".into()));
        }

        let mut names = HashSet::new();
        for (i, b) in self.buildings.iter().enumerate() {
            let path = format!("buildings[{i}]");
            if b.name.trim().is_empty() {
                return Err(Error::Config(format!("{path}.name: must not be empty")));
            }
            if !names.insert(b.name.as_str()) {
                return Err(Error::Config(format!("{path}.name: duplicate building name {:?}", b.name)));
            }
            check_finite(&format!("{path}.position"), &b.position)?;
            check_color(&format!("{path}.wallColor"), b.wall_color)?;

            if b.text.is_some() {
                check_color(&format!("{path}.textColor"), b.text_color)?;
                let placement = b
                    .placement()
                    .map_err(|e| Error::Config(format!("{path}.textPosition: {e}")))?;
                match placement {
                    TextPlacement::Wall => {
                        b.side().map_err(|e| Error::Config(format!("{path}.textSide: {e}")))?;
                        if b.text_floor < 1 || b.text_floor > b.floors {
                            return Err(Error::Config(format!(
                                "{path}.textFloor: {} outside 1..={}",
                                b.text_floor, b.floors
                            )));
                        }
                    }
                    TextPlacement::Roof => {
                        if !is_valid_extent(b.text_size) {
                            return Err(Error::Config(format!(
                                "{path}.textSize: {} must be positive and finite",
                                b.text_size
                            )));
                        }
                    }
                }
            }
        }

        if let Some(road) = &self.road {
            check_finite("road.position", &road.position)?;
        }

        for (i, t) in self.trees.iter().enumerate() {
            let path = format!("trees[{i}]");
            check_finite(&format!("{path}.position"), &t.position)?;
            if let Some([lo, hi]) = t.height_range {
                if !(lo > 0.0 && lo <= hi && hi.is_finite()) {
                    return Err(Error::Config(format!(
                        "{path}.heightRange: [{lo}, {hi}] must satisfy 0 < min <= max"
                    )));
                }
            }
        }
        Ok(())
    }
}
