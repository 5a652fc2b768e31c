//! Scene composition from configuration
//!
//! - `config`: JSON model with defaults for absent fields
//! - `presets`: the canned scenes as configuration values
//!
//! [`compose_into`] clears the scene, generates every configured building
//! (walls, then signage, then entrance), moves each building root to its
//! configured offset, then adds the road and trees. [`SceneComposer`] adds
//! the export step.

pub mod config;
pub mod presets;

use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::building::{build_building, build_entrance, place_roof_text, place_wall_text, TextPlacement};
use crate::core::Result;
use crate::environment::{build_road, build_tree, TreeSpec};
use crate::export::{export_scene, ExportFormat, ExportSummary};
use crate::scene::Scene;

pub use config::{BuildingConfig, EntranceConfig, RoadConfig, SceneConfig, SceneSettings, TreeConfig};

/// Crate root, where `config/` and `output/` live.
pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn default_config_path() -> PathBuf {
    project_root().join("config").join("scene_config.json")
}

pub fn default_output_dir() -> PathBuf {
    project_root().join("output")
}

/// Check every building, the road and every tree before anything is
/// generated, so a bad entry aborts the run without a half-built scene.
fn preflight(config: &SceneConfig) -> Result<()> {
    config.validate()?;
    for (i, b) in config.buildings.iter().enumerate() {
        let path = format!("buildings[{i}]");
        let params = b.params();
        params.validate().map_err(|e| e.context(&path))?;
        if let Some(spec) = b.entrance_spec() {
            spec.validate(&params).map_err(|e| e.context(&format!("{path}.entrance")))?;
        }
    }
    if let Some(road) = config.effective_road() {
        road.validate().map_err(|e| e.context("road"))?;
    }
    for (i, tree) in tree_specs(config).iter().enumerate() {
        tree.validate().map_err(|e| e.context(&format!("trees[{i}]")))?;
    }
    Ok(())
}

/// Resolve each tree's height, drawing configured ranges from a generator
/// seeded with `scene.seed`. Trees are drawn in order, so the same config
/// always yields the same heights.
pub fn tree_specs(config: &SceneConfig) -> Vec<TreeSpec> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.scene.seed);
    config
        .trees
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let height = match t.height_range {
                Some([lo, hi]) => rng.gen_range(lo..=hi),
                None => t.height,
            };
            TreeSpec::new(t.name_or_default(i), t.ground_position(), height)
        })
        .collect()
}

/// Rebuild `scene` from scratch according to `config`.
pub fn compose_into(scene: &mut Scene, config: &SceneConfig) -> Result<()> {
    preflight(config)?;
    scene.clear();

    for (i, b) in config.buildings.iter().enumerate() {
        let path = format!("buildings[{i}]");
        let building = build_building(scene, &b.name, &b.params()).map_err(|e| e.context(&path))?;
        scene.graph_mut().set_position(building.root, b.world_position());

        if let Some(text) = &b.text {
            match b.placement()? {
                TextPlacement::Wall => {
                    place_wall_text(scene, &building, text, b.text_floor, b.side()?, b.text_color)
                }
                TextPlacement::Roof => place_roof_text(scene, &building, text, b.text_color, b.text_size),
            }
            .map_err(|e| e.context(&format!("{path}.text")))?;
        }

        if let Some(spec) = b.entrance_spec() {
            build_entrance(scene, &building, &spec).map_err(|e| e.context(&format!("{path}.entrance")))?;
        }
    }

    let road = config.effective_road();
    if let Some(spec) = &road {
        build_road(scene, spec)?;
    }

    let trees = tree_specs(config);
    for (i, spec) in trees.iter().enumerate() {
        build_tree(scene, spec).map_err(|e| e.context(&format!("trees[{i}]")))?;
    }

    log::info!(
        "composed {}: {} buildings, {}, {} trees, {} nodes, {} materials",
        config.scene.name,
        config.buildings.len(),
        if road.is_some() { "road" } else { "no road" },
        trees.len(),
        scene.graph().node_count(),
        scene.materials().len()
    );
    Ok(())
}

/// Build a fresh scene named after `config.scene.name`.
pub fn compose(config: &SceneConfig) -> Result<Scene> {
    let mut scene = Scene::new(config.scene.name.as_str());
    compose_into(&mut scene, config)?;
    Ok(scene)
}

/// Composes configured scenes and writes them as glTF.
#[derive(Clone, Debug)]
pub struct SceneComposer {
    output_dir: PathBuf,
    format: ExportFormat,
}

impl Default for SceneComposer {
    fn default() -> Self {
        Self::new(default_output_dir())
    }
}

impl SceneComposer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: ExportFormat::Separate,
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `<output dir>/<scene name>.gltf`
    pub fn output_path(&self, config: &SceneConfig) -> PathBuf {
        self.output_dir.join(format!("{}.gltf", config.scene.name))
    }

    /// Compose and export one scene.
    pub fn run(&self, config: &SceneConfig) -> Result<ExportSummary> {
        let scene = compose(config)?;
        export_scene(&scene, &self.output_path(config), self.format)
    }

    /// Load a configuration file, then compose and export it.
    pub fn run_file(&self, config_path: &Path) -> Result<ExportSummary> {
        log::info!("reading {}", config_path.display());
        let config = SceneConfig::load(config_path)?;
        self.run(&config)
    }
}
