use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use octa_renderer::{render, render_parallel, Camera, RayCaster, RenderOptions};

mod demo;

#[derive(Parser)]
#[command(name = "octa")]
#[command(about = "Render the Octa demo scene with a recursive ray tracer", long_about = None)]
struct Args {
    /// JSON render options; missing fields use production defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OBJ meshes to add to the scene
    #[arg(long)]
    obj: Vec<PathBuf>,

    /// Output PNG path (overrides the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Start from the quick preview preset instead of production
    #[arg(short, long)]
    development: bool,

    /// Render buckets in parallel
    #[arg(short, long)]
    parallel: bool,
}

fn load_options(args: &Args) -> Result<RenderOptions> {
    let mut options = match &args.config {
        Some(path) => RenderOptions::from_json_file(path)
            .with_context(|| format!("Failed to read render options from {}", path.display()))?,
        None if args.development => RenderOptions::development(),
        None => RenderOptions::production(),
    };

    if let Some(output) = &args.output {
        options.output_path = output.clone();
    }
    options.parallel |= args.parallel;
    Ok(options)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let options = load_options(&args)?;
    log::info!("Render options: {:?}", options);

    let start = Instant::now();
    let tracer = demo::build(&options, &args.obj)?;
    log::info!("Scene built in {:.2?}", start.elapsed());

    let caster = RayCaster::new(&options)?;
    let camera = Camera::from_options(&options);

    let image = if options.parallel {
        render_parallel(&tracer, &caster, &camera, &options)
    } else {
        render(&tracer, &caster, &camera, &options)
    };

    image
        .save_png(&options.output_path)
        .with_context(|| format!("Failed to save {}", options.output_path.display()))?;

    Ok(())
}
