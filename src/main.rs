//! Facade - builds the configured combined scene
//!
//! Reads `config/scene_config.json` under the crate root and writes
//! `output/<scene name>.gltf` (plus its `.bin`).

use facade::composer::{default_config_path, SceneComposer};
use facade::core::logging;

fn main() {
    logging::init();

    let config_path = default_config_path();
    let composer = SceneComposer::default();

    match composer.run_file(&config_path) {
        Ok(summary) => {
            log::info!(
                "done: {} primitives in {}",
                summary.primitive_count,
                summary.gltf_path.display()
            );
        }
        Err(e) => {
            log::error!("generation failed: {}", e);
            std::process::exit(1);
        }
    }
}
