use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::info;

use raytracer::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, OUT_FILE };
use raytracer::framebuffer::Framebuffer;
use raytracer::motion::{ Motion, ResolutionPolicy };
use raytracer::render::render;
use raytracer::scene::SceneDescription;

/// Renders a scene of spheres, optionally flying the camera first.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// JSON scene description; the classic four sphere scene if omitted.
    #[clap(short, long)]
    scene: Option<PathBuf>,

    /// Where to save the rendered PPM image.
    #[clap(short, long, default_value = OUT_FILE)]
    out: PathBuf,

    /// Overrides the image width.
    #[clap(long)]
    width: Option<usize>,

    /// Overrides the image height.
    #[clap(long)]
    height: Option<usize>,

    /// Camera motion applied for one frame, e.g. `yaw-left`. Repeatable.
    #[clap(short, long)]
    motion: Vec<Motion>,

    /// Seconds of input each motion frame stands for.
    #[clap(long, default_value = "0.033")]
    delta_time: f64,

    /// Save the low resolution preview instead of the full image.
    #[clap(long)]
    preview: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let SceneDescription { scene, mut camera } = match &args.scene {
        Some(path) => SceneDescription::load(path)?,
        None => SceneDescription::classic(CANVAS_WIDTH, CANVAS_HEIGHT),
    };
    if let Some(width) = args.width {
        camera.width = width;
    }
    if let Some(height) = args.height {
        camera.height = height;
    }

    let background = scene.background.to_pixel();
    let mut framebuffer = Framebuffer::try_new(camera.width, camera.height, background)?;
    let mut policy = ResolutionPolicy::new();

    // One frame per motion, then the frame where the camera comes to rest
    let frames = args.motion.iter().map(Some).chain(std::iter::once(None));
    for (n, motion) in frames.enumerate() {
        if let Some(motion) = motion {
            camera.apply(*motion, args.delta_time);
        }

        let low_resolution = match policy.next_frame(motion.is_some()).low_resolution() {
            Some(low) => low || args.preview,
            None => continue,
        };

        let start = Instant::now();
        framebuffer.clear(background);
        let stats = render(&scene, &camera, &mut framebuffer, low_resolution);
        info!("Frame {}: {} rays in {:?}{}", n, stats.rays, start.elapsed(),
            if low_resolution { " (preview)" } else { "" });
    }

    framebuffer.save(&args.out)?;
    info!("Saved render to {}", args.out.display());

    Ok(())
}
