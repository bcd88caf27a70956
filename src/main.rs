use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use raytracer::{render, CameraOptions, RenderMode, RenderOptions, Vec3};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Depth,
    Normal,
    Full,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Depth => RenderMode::Depth,
            Mode::Normal => RenderMode::Normal,
            Mode::Full => RenderMode::Full,
        }
    }
}

/// Render a scene file to a PNG.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the scene file (mtllib/v/vn/usemtl/S/P/f).
    scene: PathBuf,

    /// Where to write the rendered image.
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    #[arg(long, default_value = "0,0,0")]
    look_from: Point,

    #[arg(long, default_value = "0,0,-1")]
    look_to: Point,

    /// Vertical field of view, in degrees.
    #[arg(long, default_value_t = 60.0)]
    fov: f64,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Maximum reflection/refraction recursion depth.
    #[arg(long, default_value_t = 4)]
    depth: u32,

    #[arg(long, value_enum, default_value_t = Mode::Full)]
    mode: Mode,
}

#[derive(Clone, Copy, Debug)]
struct Point(f64, f64, f64);

impl std::str::FromStr for Point {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').collect();
        anyhow::ensure!(parts.len() == 3, "expected `x,y,z`, got `{s}`");
        Ok(Point(parts[0].parse()?, parts[1].parse()?, parts[2].parse()?))
    }
}

impl From<Point> for Vec3 {
    fn from(p: Point) -> Self {
        Vec3::new(p.0, p.1, p.2)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let camera_options = CameraOptions {
        look_from: cli.look_from.into(),
        look_to: cli.look_to.into(),
        fov: cli.fov.to_radians(),
        screen_width: cli.width,
        screen_height: cli.height,
    };
    let render_options = RenderOptions {
        depth: cli.depth,
        mode: cli.mode.into(),
    };

    let image = render(&cli.scene, &camera_options, &render_options)?;
    image.save(&cli.output)?;

    tracing::info!(output = %cli.output.display(), "wrote image");
    Ok(())
}
