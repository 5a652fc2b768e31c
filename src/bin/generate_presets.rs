//! Preset scene generator
//!
//! Writes every canned scene (basic building, office, shop, city block,
//! modern building) as glTF.
//!
//! Usage:
//!     generate_presets [OPTIONS] [OUTPUT_DIR]
//!
//! Options:
//!     --embedded      Inline the binary buffer as base64 instead of a .bin file
//!     -h, --help      Show this help message

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use facade::composer::{default_output_dir, presets, SceneComposer};
use facade::core::logging;
use facade::export::ExportFormat;

fn print_help() {
    eprintln!("generate_presets - Write all preset scenes as glTF");
    eprintln!();
    eprintln!("Usage: generate_presets [OPTIONS] [OUTPUT_DIR]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    --embedded      Inline the binary buffer as base64 instead of a .bin file");
    eprintln!("    -h, --help      Show this help message");
    eprintln!();
    eprintln!("OUTPUT_DIR defaults to <crate root>/output.");
}

#[derive(Debug)]
struct Args {
    output_dir: PathBuf,
    format: ExportFormat,
}

fn parse_args() -> Result<Args, String> {
    let mut output_dir: Option<PathBuf> = None;
    let mut format = ExportFormat::Separate;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--embedded" => format = ExportFormat::Embedded,
            other if other.starts_with('-') => {
                return Err(format!("Unknown option: {}", other));
            }
            path => {
                if output_dir.is_some() {
                    return Err("Multiple output directories specified".to_string());
                }
                output_dir = Some(PathBuf::from(path));
            }
        }
    }

    Ok(Args {
        output_dir: output_dir.unwrap_or_else(default_output_dir),
        format,
    })
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    let composer = SceneComposer::new(&args.output_dir).with_format(args.format);
    let scenes = presets::all();
    let start = Instant::now();

    for (i, config) in scenes.iter().enumerate() {
        log::info!("[{}/{}] {}", i + 1, scenes.len(), config.scene.name);
        if let Err(e) = composer.run(config) {
            log::error!("{} failed: {}", config.scene.name, e);
            std::process::exit(1);
        }
    }

    log::info!(
        "{} scenes written to {} in {:.2}s",
        scenes.len(),
        args.output_dir.display(),
        start.elapsed().as_secs_f64()
    );
}
