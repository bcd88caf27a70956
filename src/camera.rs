//! Component E: build a look-at basis and generate primary rays.
//!
//! Grounded on the reference `LookAt`/`MultDirMatrix` pair (§4.E):
//! `forward` points from the target back to the eye, `up` is rebuilt from
//! `forward` and a corrected `right`, and the basis is stored as rows of a
//! 4×4 matrix so a direction transforms through the upper-left 3×3 while a
//! point would go through the full affine transform with perspective
//! divide (§4.E) — though this renderer only ever transforms directions.

use nalgebra::Matrix4;

use crate::options::CameraOptions;
use crate::ray::Ray;
use crate::vec3::Vec3;

const UP_PARALLEL_EPS: f64 = 1e-9;

pub struct Camera {
    look_from: Vec3,
    basis: Matrix4<f64>,
    /// Half-height of the image plane at `z = -1` in camera space.
    half_height: f64,
    half_width: f64,
    pixel_size: f64,
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(options: &CameraOptions) -> Self {
        let basis = look_at(options.look_from, options.look_to);

        let height = 2.0 * (options.fov / 2.0).tan();
        let width = height * options.screen_width as f64 / options.screen_height as f64;
        let pixel_size = height / options.screen_height as f64;

        Self {
            look_from: options.look_from,
            basis,
            half_height: height / 2.0,
            half_width: width / 2.0,
            pixel_size,
            width: options.screen_width,
            height: options.screen_height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// World-space primary ray through pixel `(row i from top, column j from
    /// left)`.
    pub fn ray_for_pixel(&self, i: u32, j: u32) -> Ray {
        let x = -self.half_width + self.pixel_size / 2.0 + j as f64 * self.pixel_size;
        let y = self.half_height - self.pixel_size / 2.0 - i as f64 * self.pixel_size;
        let camera_space_dir = Vec3::new(x, y, -1.0).normalized();

        let world_dir = transform_direction(&self.basis, &camera_space_dir).normalized();
        Ray::new(self.look_from, world_dir)
    }
}

fn look_at(look_from: Vec3, look_to: Vec3) -> Matrix4<f64> {
    let forward = (look_from - look_to).normalized();

    let mut tmp = Vec3::new(0.0, 1.0, 0.0);
    if tmp.cross(&forward).length() < UP_PARALLEL_EPS {
        tmp = if tmp.dot(&forward) >= 0.0 {
            Vec3::new(0.0, 0.0, 1.0)
        } else {
            Vec3::new(0.0, 0.0, -1.0)
        };
    }

    if (look_to - look_from).z() < 0.0 {
        tmp = Vec3::new(tmp.x(), tmp.y(), -tmp.z());
    }

    let right = tmp.cross(&forward).normalized();
    let up = forward.cross(&right).normalized();

    let mut m = Matrix4::identity();
    for col in 0..3 {
        m[(0, col)] = right[col];
        m[(1, col)] = up[col];
        m[(2, col)] = forward[col];
        m[(3, col)] = look_from[col];
    }
    m
}

/// Transform a direction through the upper-left 3×3 of `m`, whose *rows*
/// are `right`, `up`, `forward` (§4.E): `ans[k] = sum_i dir[i] * m[i][k]`,
/// i.e. `dir.x * right + dir.y * up + dir.z * forward`.
fn transform_direction(m: &Matrix4<f64>, dir: &Vec3) -> Vec3 {
    let right = Vec3::new(m[(0, 0)], m[(0, 1)], m[(0, 2)]);
    let up = Vec3::new(m[(1, 0)], m[(1, 1)], m[(1, 2)]);
    let forward = Vec3::new(m[(2, 0)], m[(2, 1)], m[(2, 2)]);
    right * dir.x() + up * dir.y() + forward * dir.z()
}
