//! Headless driver for the GarmentStudio engine.
//!
//! Loads an optional part layout and base texture, uploads artwork files
//! onto garment parts, waits for the decodes, and writes the composited
//! texture (and optionally the preview) to disk.
//!
//! ```text
//! garmentstudio [--layout layout.json] [--base base.png] \
//!               --place front=logo.png [--place back=art.png ...] \
//!               [--preview preview.png] -o texture.png
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use garmentstudio::{init_logging, PartId, PartLayout, PartRegistry, StudioSession};

struct Args {
    layout: Option<PathBuf>,
    base: Option<PathBuf>,
    placements: Vec<(PartId, PathBuf)>,
    preview: Option<PathBuf>,
    output: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut layout = None;
    let mut base = None;
    let mut placements = Vec::new();
    let mut preview = None;
    let mut output = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--layout" => layout = Some(PathBuf::from(expect_value(&mut args, "--layout")?)),
            "--base" => base = Some(PathBuf::from(expect_value(&mut args, "--base")?)),
            "--place" => {
                let value = expect_value(&mut args, "--place")?;
                let (part, file) = value
                    .split_once('=')
                    .context("--place expects part=artwork.png")?;
                placements.push((PartId::new(part), PathBuf::from(file)));
            }
            "--preview" => preview = Some(PathBuf::from(expect_value(&mut args, "--preview")?)),
            "-o" | "--output" => output = Some(PathBuf::from(expect_value(&mut args, "-o")?)),
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("Unknown argument: {}", other),
        }
    }

    let Some(output) = output else {
        print_usage();
        bail!("Missing required -o/--output");
    };

    Ok(Args {
        layout,
        base,
        placements,
        preview,
        output,
    })
}

fn expect_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{} expects a value", flag))
}

fn print_usage() {
    eprintln!(
        "Usage: garmentstudio [--layout layout.json] [--base base.png] \
         --place part=artwork.png ... [--preview preview.png] -o texture.png"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let args = parse_args()?;

    let registry = match &args.layout {
        Some(path) => {
            let layout = PartLayout::load_from_file(path)
                .with_context(|| format!("Failed to load layout {}", path.display()))?;
            PartRegistry::from_layout(layout)?
        }
        None => PartRegistry::default(),
    };

    let mut session = StudioSession::with_registry(registry);

    if let Some(path) = &args.base {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read base texture {}", path.display()))?;
        session.upload_base(bytes)?;
    }

    for (part, path) in &args.placements {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read artwork {}", path.display()))?;
        session.upload_artwork(Some(part.clone()), bytes)?;
        tracing::info!("Placed {} on part {}", path.display(), part);
    }

    // Pump until every decode has landed.
    let deadline = Instant::now() + Duration::from_secs(30);
    while session.uploads_in_flight() > 0 {
        if Instant::now() > deadline {
            bail!("Timed out waiting for image decodes");
        }
        session.pump_uploads();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let texture = session.composite_now();
    texture
        .image()
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    tracing::info!(
        "Wrote {}x{} texture (revision {}) to {}",
        texture.width(),
        texture.height(),
        texture.revision(),
        args.output.display()
    );

    if let Some(path) = &args.preview {
        let preview = session.render_preview();
        preview
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote preview to {}", path.display());
    }

    Ok(())
}
