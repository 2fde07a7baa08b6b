/// Texture synthesis CLI entry point.
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use texture_pipeline::constants::DEFAULT_UPSCALE;
use texture_pipeline::{TexturePipeline, TextureSet};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <input image or directory> [scale] [composition text...]",
            args[0]
        );
        std::process::exit(1);
    }

    let input = PathBuf::from(&args[1]);
    let scale = args
        .get(2)
        .and_then(|arg| arg.parse::<f32>().ok())
        .unwrap_or(DEFAULT_UPSCALE);
    let composition = if args.len() > 3 {
        Some(args[3..].join(" "))
    } else {
        None
    };

    let pipeline = TexturePipeline::with_scale(scale);

    if input.is_dir() {
        process_directory(&pipeline, &input)?;
    } else {
        process_file(&pipeline, &input, composition.as_deref())?;
    }

    Ok(())
}

/// Process a single image and write its sibling texture files.
fn process_file(
    pipeline: &TexturePipeline,
    path: &Path,
    composition: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Processing {}...", path.display());

    let bytes = fs::read(path)?;
    let output = pipeline.process(&bytes, composition)?;
    write_texture_set(path, &output.textures)?;

    if let Some(material) = &output.material {
        println!("Resolved material preset: {}", material.preset_key);
        println!("{}", serde_json::to_string_pretty(material)?);
    }

    Ok(())
}

/// Batch-process every source image found directly in a directory.
fn process_directory(
    pipeline: &TexturePipeline,
    dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let sources = discover_source_images(dir)?;
    if sources.is_empty() {
        return Err(format!("No PNG/JPEG images found in {}", dir.display()).into());
    }
    println!("Found {} source images", sources.len());

    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.green/blue}] {pos}/{len} images ({percent}%) {msg}")
            .unwrap()
            .progress_chars("█▉▊▋▌▍▎▏"),
    );
    pb.set_message("Synthesizing textures");

    for path in &sources {
        if let Err(err) = process_batch_entry(pipeline, path) {
            eprintln!("Skipping {}: {}", path.display(), err);
        }
        pb.inc(1);
    }

    pb.finish_with_message("Textures generated");
    Ok(())
}

/// One batch item; failures are reported and skipped, not fatal.
fn process_batch_entry(
    pipeline: &TexturePipeline,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    let output = pipeline.process(&bytes, None)?;
    write_texture_set(path, &output.textures)?;
    Ok(())
}

/// Save the set next to the input with the `_4k`, `_normal` and `_disp`
/// suffixes, preserving the input's container format via its extension.
fn write_texture_set(
    input: &Path,
    set: &TextureSet,
) -> Result<(), texture_pipeline::TextureError> {
    let albedo_path = sibling_path(input, "_4k");
    set.albedo.save(&albedo_path)?;
    println!("Saved {}", albedo_path.display());

    match &set.normal {
        Some(normal) => {
            let path = sibling_path(input, "_normal");
            normal.save(&path)?;
            println!("Saved {}", path.display());
        }
        None => println!("Normal map unavailable for {}", input.display()),
    }

    match &set.displacement {
        Some(displacement) => {
            let path = sibling_path(input, "_disp");
            displacement.save(&path)?;
            println!("Saved {}", path.display());
        }
        None => println!("Displacement map unavailable for {}", input.display()),
    }

    Ok(())
}

fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let extension = input
        .extension()
        .map_or_else(|| "png".to_string(), |ext| ext.to_string_lossy().to_string());
    input.with_file_name(format!("{stem}{suffix}.{extension}"))
}

/// PNG/JPEG files directly under the directory, skipping files this
/// tool previously generated.
fn discover_source_images(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !matches!(extension.as_str(), "png" | "jpg" | "jpeg") {
            continue;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if stem.ends_with("_4k") || stem.ends_with("_normal") || stem.ends_with("_disp") {
            continue;
        }
        sources.push(path);
    }
    sources.sort();
    Ok(sources)
}
