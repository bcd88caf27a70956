//! Top-level orchestration: `Render(scenePath, cameraOptions, renderOptions)
//! -> Image` (§6). Ties the loader, camera, integrator and tone mapper
//! together and parallelizes per-pixel work with `rayon`, following the
//! reference `render`'s `par_pixels_mut` pattern (§5 — pixels are
//! independent, no ordering guarantees).

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use indicatif::{ParallelProgressIterator, ProgressState, ProgressStyle};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::image::Image;
use crate::integrator::{closest_hit, shading_normal, trace};
use crate::options::{CameraOptions, RenderMode, RenderOptions};
use crate::scene::loader::load_scene;
use crate::tonemap::{max_channel, max_depth, tonemap_depth, tonemap_full, tonemap_normal};
use crate::vec3::Vec3;

fn progress_bar_style() -> ProgressStyle {
    let text = [
        "[{bar:48.cyan/blue}] {percent}% {spinner:.green}",
        "Elapsed Time     : {elapsed_precise}",
        "ETA              : {eta}",
        "Render Progress  : {pos}/{len} pixels",
        "Render Speed     : {per_sec}",
    ]
    .join("\n");

    ProgressStyle::with_template(&text)
        .unwrap()
        .with_key("per_sec", |state: &ProgressState, w: &mut dyn Write| {
            _ = write!(w, "{:.0} px/sec", state.per_sec());
        })
        .progress_chars("#>-")
}

pub fn render(
    scene_path: impl AsRef<Path>,
    camera_options: &CameraOptions,
    render_options: &RenderOptions,
) -> Result<Image> {
    let scene = load_scene(scene_path.as_ref())?;
    let camera = Camera::new(camera_options);
    let width = camera.width();
    let height = camera.height();
    let pixel_count = width as usize * height as usize;

    tracing::info!(width, height, mode = ?render_options.mode, "rendering");

    let mut image = Image::new(width, height);

    match render_options.mode {
        RenderMode::Full => {
            let colors: Vec<Vec3> = (0..pixel_count)
                .into_par_iter()
                .progress_with_style(progress_bar_style())
                .map(|idx| {
                    let (i, j) = pixel_coords(idx as u32, width);
                    let ray = camera.ray_for_pixel(i, j);
                    trace(&ray, render_options.depth as i64, false, &scene)
                })
                .collect();

            let vmax = max_channel(&colors);
            for (idx, color) in colors.into_iter().enumerate() {
                let (i, j) = pixel_coords(idx as u32, width);
                image.set_pixel(i, j, tonemap_full(color, vmax));
            }
        }
        RenderMode::Depth => {
            let depths: Vec<Option<f64>> = (0..pixel_count)
                .into_par_iter()
                .progress_with_style(progress_bar_style())
                .map(|idx| {
                    let (i, j) = pixel_coords(idx as u32, width);
                    let ray = camera.ray_for_pixel(i, j);
                    closest_hit(&ray, &scene).map(|hit| hit.intersection.distance)
                })
                .collect();

            let dmax = max_depth(&depths);
            for (idx, depth) in depths.into_iter().enumerate() {
                let (i, j) = pixel_coords(idx as u32, width);
                image.set_pixel(i, j, tonemap_depth(depth, dmax));
            }
        }
        RenderMode::Normal => {
            let normals: Vec<Option<Vec3>> = (0..pixel_count)
                .into_par_iter()
                .progress_with_style(progress_bar_style())
                .map(|idx| {
                    let (i, j) = pixel_coords(idx as u32, width);
                    let ray = camera.ray_for_pixel(i, j);
                    closest_hit(&ray, &scene).map(|hit| shading_normal(&hit))
                })
                .collect();

            for (idx, normal) in normals.into_iter().enumerate() {
                if let Some(normal) = normal {
                    let (i, j) = pixel_coords(idx as u32, width);
                    image.set_pixel(i, j, tonemap_normal(normal));
                }
            }
        }
    }

    Ok(image)
}

fn pixel_coords(idx: u32, width: u32) -> (u32, u32) {
    (idx / width, idx % width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_scene(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("raytracer-render-tests-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn default_camera() -> CameraOptions {
        CameraOptions {
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_to: Vec3::new(0.0, 0.0, -1.0),
            fov: std::f64::consts::FRAC_PI_2,
            screen_width: 20,
            screen_height: 20,
        }
    }

    // Invariant 7 — an empty scene renders without panicking.
    #[test]
    fn empty_scene_renders_to_background() {
        let scene_path = write_scene("scene_empty.txt", "# empty\n");
        let options = RenderOptions {
            depth: 2,
            mode: RenderMode::Full,
        };
        let image = render(scene_path, &default_camera(), &options).unwrap();
        assert_eq!(image.width(), 20);
        assert_eq!(image.height(), 20);
    }

    // Invariant 9 — image dimensions match CameraOptions.
    #[test]
    fn depth_mode_dimensions_match_camera_options() {
        let scene_path = write_scene("scene_depth.txt", "S 0 0 -5 1\n");
        let options = RenderOptions {
            depth: 0,
            mode: RenderMode::Depth,
        };
        let mut camera_options = default_camera();
        camera_options.screen_width = 32;
        camera_options.screen_height = 16;
        let image = render(scene_path, &camera_options, &options).unwrap();
        assert_eq!(image.width(), 32);
        assert_eq!(image.height(), 16);
    }

    // Invariant 8 — rendering the same scene twice is byte-identical
    // (parallel reductions over Vmax/Dmax are associative, so ordering
    // differences between runs must not change the result).
    #[test]
    fn full_mode_render_is_deterministic() {
        let scene_path = write_scene("scene_determinism.txt", "S 0 0 -5 1\nP 0 5 0 1 1 1\n");
        let options = RenderOptions {
            depth: 1,
            mode: RenderMode::Full,
        };
        let camera_options = default_camera();

        let a = render(&scene_path, &camera_options, &options).unwrap();
        let b = render(&scene_path, &camera_options, &options).unwrap();

        for i in 0..a.height() {
            for j in 0..a.width() {
                assert_eq!(a.get_pixel(i, j), b.get_pixel(i, j));
            }
        }
    }
}
