//! `lume` - render the Cornell box to a PNG.
//!
//! Usage: `lume [config.json] [-o out.png]`. Without a config file the
//! defaults of [`RenderConfig`] are used. Set `RUST_LOG=debug` for scene
//! statistics.

mod cornell;

use anyhow::{bail, Context, Result};
use lume_render::{render, Camera, ImageBuffer, RenderConfig, Scene};
use std::path::{Path, PathBuf};
use std::time::Instant;

const USAGE: &str = "usage: lume [config.json] [-o out.png]";

/// Command-line arguments
#[derive(Debug, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    output: PathBuf,
}

impl Args {
    /// Parse arguments, excluding the program name. `Ok(None)` means help
    /// was requested.
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Option<Self>> {
        let mut config = None;
        let mut output = PathBuf::from("cornell.png");

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "-o" | "--output" => {
                    let Some(path) = args.next() else {
                        bail!("{arg} needs a file name\n{USAGE}");
                    };
                    output = PathBuf::from(path);
                }
                flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
                path => {
                    if config.is_some() {
                        bail!("more than one config file given\n{USAGE}");
                    }
                    config = Some(PathBuf::from(path));
                }
            }
        }

        Ok(Some(Self { config, output }))
    }
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        log::info!("No config file given, using defaults");
        return Ok(RenderConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: RenderConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;

    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("Image buffer does not match its dimensions")?;
    rgba.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let Some(args) = Args::parse(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = load_config(args.config.as_deref())?;
    config.validate().context("Invalid render config")?;

    let start = Instant::now();
    let objects = cornell::build(config.trace.split_method).context("Failed to build scene")?;
    let scene = Scene::new(objects, config.trace.clone())?;
    log::info!(
        "Scene built in {:.2?} ({} objects, BVH depth {})",
        start.elapsed(),
        scene.objects().len(),
        scene.bvh().depth()
    );

    let camera = Camera::from_config(&config);
    let image = render(&camera, &scene, &config);

    save_png(&image, &args.output)?;
    log::info!("Wrote {}", args.output.display());

    Ok(())
}
