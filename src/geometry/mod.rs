//! Component B: primitives (Sphere, Triangle) plus the barycentric helper.
//! Component C (ray–primitive intersection) lives in [`intersect`].

pub mod intersect;

use crate::vec3::Vec3;

pub use intersect::Intersection;

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Heron's formula.
    pub fn area(&self) -> f64 {
        let s1 = crate::vec3::distance(&self.a, &self.b);
        let s2 = crate::vec3::distance(&self.a, &self.c);
        let s3 = crate::vec3::distance(&self.c, &self.b);
        let p = (s1 + s2 + s3) / 2.0;
        (p * (p - s1) * (p - s2) * (p - s3)).sqrt()
    }

    /// Barycentric `(u, v, w)` of `p` via Ericson's "Cramer over edge dot
    /// products" formulation (§4.B). Undefined for degenerate triangles.
    pub fn barycentric(&self, p: &Vec3) -> (f64, f64, f64) {
        let v0 = self.b - self.a;
        let v1 = self.c - self.a;
        let v2 = *p - self.a;

        let d00 = v0.dot(&v0);
        let d01 = v0.dot(&v1);
        let d11 = v1.dot(&v1);
        let d20 = v2.dot(&v0);
        let d21 = v2.dot(&v1);
        let denom = d00 * d11 - d01 * d01;

        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        let u = 1.0 - v - w;
        (u, v, w)
    }
}
