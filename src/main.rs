use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use strata::gfx::input::FrameInput;
use strata::gfx::uniforms::ShadingLayer;
use strata::wgpu_utils::{
    headless_device, shape_bind_group_layout, world_bind_group_layout, GeometryBuffers,
    ShapeBindings,
};
use strata::{load_scene, SceneConfig, SceneDirector};

fn parse_shading(name: &str) -> Result<ShadingLayer, String> {
    ShadingLayer::from_name(name).ok_or_else(|| format!("unknown shading layer '{name}'"))
}

/// Loads every asset in a directory, lays out its descriptors and steps the
/// scene animation.
#[derive(Parser, Debug, Clone)]
#[command(name = "strata", version)]
struct Args {
    /// Directory scanned recursively for .obj, .gltf and .glb files
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Frames to animate
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Upload geometry and uniforms to a headless GPU device
    #[arg(long)]
    upload: bool,

    /// Force one shading layer on every object
    #[arg(long, value_parser = parse_shading)]
    shading: Option<ShadingLayer>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = SceneConfig::default().with_asset_dir(&args.assets);
    let mut director = load_scene(config)?;

    for (name, geometry) in director.library().iter() {
        info!(
            "{name}: {} shapes, {} vertices, {} triangles",
            geometry.shape_count(),
            geometry.vertex_count(),
            geometry.triangle_count()
        );
    }

    if args.upload {
        pollster::block_on(run_uploaded(&mut director, &args))
    } else {
        for frame in 0..args.frames {
            director.animate(&frame_input(frame, &args));
        }
        info!("Animated {} frames of {} objects", args.frames, director.object_names().count());
        Ok(())
    }
}

fn frame_input(frame: u32, args: &Args) -> FrameInput {
    FrameInput {
        time: frame as f32 * args.dt,
        shading_override: args.shading,
        ..Default::default()
    }
}

async fn run_uploaded(director: &mut SceneDirector, args: &Args) -> Result<()> {
    let (device, queue) = headless_device().await?;

    let buffers: Vec<GeometryBuffers> = director
        .library()
        .iter()
        .map(|(name, geometry)| GeometryBuffers::upload(&device, name, geometry))
        .collect();
    let world_layout = world_bind_group_layout(&device);
    let shape_layout = shape_bind_group_layout(&device);
    let mut bindings = ShapeBindings::new(
        &device,
        &world_layout,
        &shape_layout,
        director.table(),
        director.uniforms(),
    );
    info!(
        "Uploaded {} assets with {} descriptor sets",
        buffers.len(),
        bindings.len()
    );

    let mut writes = 0;
    for frame in 0..args.frames {
        director.animate(&frame_input(frame, args));
        writes += bindings.sync(&queue, director.uniforms(), director.table());
        queue.submit([]);
    }
    device
        .poll(wgpu::PollType::Wait)
        .context("failed to wait for queued uniform writes")?;
    info!("Animated {} frames with {writes} uniform writes", args.frames);
    Ok(())
}
