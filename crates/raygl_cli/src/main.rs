use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use raygl_renderer::{
    build_scene, render_parallel, scene_names, CpuKernel, ImageBuffer, Integrator,
    ProgressiveRenderer, RenderConfig, Scene, SceneOptions, TileGrid,
};

#[derive(Parser, Debug)]
#[command(
    name = "raygl",
    about = "Stochastic ray tracer: offline PPM renders or progressive tiled passes"
)]
struct CliArguments {
    /// Scene to render (see --list)
    #[arg(long, default_value = "cornell_box")]
    scene: String,

    #[arg(short = 'W', long)]
    width: Option<u32>,

    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Samples per pixel (offline mode)
    #[arg(short = 's', long)]
    samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(short = 'd', long)]
    depth: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(short = 'o', long, default_value = "render.ppm")]
    output: PathBuf,

    /// JSON render config; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run this many progressive passes over the tile grid instead of an offline render
    #[arg(long)]
    progressive: Option<u64>,

    #[arg(long, default_value_t = 2)]
    tiles_x: u32,

    #[arg(long, default_value_t = 2)]
    tiles_y: u32,

    /// Image for textured scenes
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Print the available scenes and exit
    #[arg(long, action)]
    list: bool,

    #[arg(long)]
    threads: Option<usize>,
}

impl CliArguments {
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        anyhow::ensure!(
            config.width > 0 && config.height > 0,
            "image size must be non-zero, got {}x{}",
            config.width,
            config.height
        );
        Ok(config)
    }
}

fn render_progressive(
    scene: &Scene,
    config: &RenderConfig,
    args: &CliArguments,
    passes: u64,
) -> Result<ImageBuffer> {
    let grid = TileGrid::new(config.width, config.height, args.tiles_x, args.tiles_y)?;
    log::info!(
        "Progressive render: {}x{} in {}x{} tiles, {} passes",
        config.width,
        config.height,
        args.tiles_x,
        args.tiles_y,
        passes
    );

    let kernel = CpuKernel::new(
        Integrator::for_scene(scene, config),
        config.width,
        config.height,
        config.seed,
    );
    let mut progressive = ProgressiveRenderer::new(grid, kernel, &scene.camera.uniforms());
    let stats = progressive.run(|stats| stats.iterations >= passes)?;
    log::info!(
        "{} passes ({} dispatches) in {:.2?}",
        stats.iterations,
        stats.frames,
        stats.elapsed
    );

    Ok(progressive.into_backend().image())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = CliArguments::parse();

    if args.list {
        for name in scene_names() {
            println!("{name}");
        }
        return Ok(());
    }

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = args.render_config()?;

    let mut opts = SceneOptions {
        aspect: config.aspect(),
        texture: None,
    };
    if let Some(path) = &args.texture {
        opts.load_texture(path)
            .with_context(|| format!("Failed to load texture {}", path.display()))?;
    }
    let mut rng = StdRng::seed_from_u64(config.seed);
    let scene = build_scene(&args.scene, &opts, &mut rng)?;

    let image = match args.progressive {
        Some(passes) => render_progressive(&scene, &config, &args, passes)?,
        None => render_parallel(&scene, &config),
    };

    image
        .save_ppm(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
