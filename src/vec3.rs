//! Component A: vector algebra.
//!
//! `Vec3` is the single value type used for positions, directions and linear
//! colors alike, following the reference `Vector` class rather than the
//! split `Position`/`Direction`/`Color` newtypes: the spec's shading math
//! freely mixes these roles (a reflected direction becomes a ray origin, a
//! material color gets dotted against a light direction) and a single type
//! keeps that math free of newtype noise.

use nalgebra::Vector3;
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

/// Self-intersection epsilon applied along the reflected ray.
pub const REFLECT_EPS: f64 = 1e-9;
/// Self-intersection epsilon applied along the refracted ray (intentionally
/// twice `REFLECT_EPS`, see spec.md §4.G).
pub const REFRACT_EPS: f64 = 2e-9;
/// Parallelism epsilon used by the Möller–Trumbore triangle test.
pub const PARALLEL_EPS: f64 = 1e-5;
/// Shadow-ray origin epsilon.
pub const SHADOW_EPS: f64 = 1e-10;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3(pub Vector3<f64>);

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.0.dot(&other.0)
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self(self.0.cross(&other.0))
    }

    pub fn length(&self) -> f64 {
        self.0.norm()
    }

    /// Componentwise (Hadamard) product, used throughout the shader for
    /// material color × light intensity.
    pub fn hadamard(&self, other: &Self) -> Self {
        Self(self.0.component_mul(&other.0))
    }

    pub fn max_component(&self) -> f64 {
        self.0.x.max(self.0.y).max(self.0.z)
    }

    /// Returns a unit vector. Undefined (divides by zero) for a zero vector;
    /// callers must not normalize a zero vector, per spec.md §3.
    pub fn normalized(&self) -> Self {
        Self(self.0 / self.0.norm())
    }

    /// Mirror `self` about unit normal `n`. `Reflect(Reflect(v, n), n) == v`
    /// for any unit `n`.
    pub fn reflect(&self, n: &Self) -> Self {
        *self - *n * (2.0 * self.dot(n))
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(Vector3::new(f(self.0.x), f(self.0.y), f(self.0.z)))
    }
}

pub fn distance(a: &Vec3, b: &Vec3) -> f64 {
    (*a - *b).length()
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Vec3 {
        rhs * self
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;
    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

impl Index<usize> for Vec3 {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalize_yields_unit_length() {
        let v = Vec3::new(3.0, 4.0, 0.0).normalized();
        assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-12);

        let v = Vec3::new(1.0, 2.0, -3.5).normalized();
        assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cross_is_right_handed() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn reflect_is_involutive() {
        let n = Vec3::new(0.0, 1.0, 0.0);
        let v = Vec3::new(1.0, -1.0, 0.5).normalized();
        let r = v.reflect(&n).reflect(&n);
        assert_abs_diff_eq!(r.x(), v.x(), epsilon = 1e-12);
        assert_abs_diff_eq!(r.y(), v.y(), epsilon = 1e-12);
        assert_abs_diff_eq!(r.z(), v.z(), epsilon = 1e-12);
    }

    #[test]
    fn distance_matches_length_of_difference() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert_abs_diff_eq!(distance(&a, &b), 5.0, epsilon = 1e-12);
    }
}
