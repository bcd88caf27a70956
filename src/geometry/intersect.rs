//! Component C: ray–primitive intersection.
//!
//! Both routines return "hit or miss"; they never panic. Grounded on the
//! reference `GetIntersection` overloads (geometric sphere test, Möller–
//! Trumbore triangle test), reproduced literally for numerical parity.

use super::{Sphere, Triangle};
use crate::ray::Ray;
use crate::vec3::{distance, Vec3, PARALLEL_EPS};

/// A typed hit: position, unit normal facing the incoming ray, and distance
/// from the ray origin. Invariant: `normal.dot(ray.direction) <= 0`.
#[derive(Clone, Copy, Debug)]
pub struct Intersection {
    pub position: Vec3,
    pub normal: Vec3,
    pub distance: f64,
}

impl Intersection {
    fn new(position: Vec3, normal: Vec3, distance: f64) -> Self {
        Self {
            position,
            normal,
            distance,
        }
    }
}

/// Ray ↔ sphere, geometric form (§4.C). `ray.direction` need not be
/// pre-normalized; it is normalized here.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> Option<Intersection> {
    let d = ray.direction.normalized();
    let l = sphere.center - ray.origin;
    let tca = l.dot(&d);
    let d2 = l.dot(&l) - tca * tca;
    let r2 = sphere.radius * sphere.radius;
    if d2 > r2 {
        return None;
    }

    let thc = (r2 - d2).sqrt();
    let (t0, t1) = (tca - thc, tca + thc);
    let (t0, t1) = if t0 > t1 { (t1, t0) } else { (t0, t1) };
    let t = if t0 < 0.0 {
        if t1 < 0.0 {
            return None;
        }
        t1
    } else {
        t0
    };

    let hit = ray.origin + d * t;
    let mut normal = (sphere.center - hit).normalized();
    if normal.dot(&d) >= 0.0 {
        normal = -normal;
    }
    let dist = distance(&hit, &ray.origin);

    Some(Intersection::new(hit, normal, dist))
}

/// Ray ↔ triangle, Möller–Trumbore variant in double precision (§4.C).
pub fn intersect_triangle(ray: &Ray, tri: &Triangle) -> Option<Intersection> {
    let d = ray.direction.normalized();
    let e1 = tri.b - tri.a;
    let e2 = tri.c - tri.a;
    let n = d.cross(&e2);
    if e1.dot(&n).abs() < PARALLEL_EPS {
        return None;
    }

    let t_vec = ray.origin - tri.a;
    let p = d.cross(&e2);
    let q = t_vec.cross(&e1);
    let div = p.dot(&e1);

    let t = q.dot(&e2) / div;
    let u = p.dot(&t_vec) / div;
    let v = q.dot(&d) / div;

    if t < 0.0 || u < 0.0 || u > 1.0 || v < 0.0 || u + v > 1.0 {
        return None;
    }

    let hit = ray.origin + d * t;
    let mut normal = (hit - tri.a).cross(&(hit - tri.b)).normalized();
    if normal.dot(&d) >= 0.0 {
        normal = -normal;
    }
    let dist = distance(&hit, &ray.origin);

    Some(Intersection::new(hit, normal, dist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // S1 — Ray/Sphere hit.
    #[test]
    fn sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = intersect_sphere(&ray, &sphere).expect("expected hit");

        assert_abs_diff_eq!(hit.position.x(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.position.y(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.position.z(), -4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.normal.x(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.normal.y(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.normal.z(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.distance, 4.0, epsilon = 1e-9);
    }

    // S2 — Ray/Sphere miss.
    #[test]
    fn sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_sphere(&ray, &sphere).is_none());
    }

    #[test]
    fn sphere_normal_faces_ray() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.2, 0.1, -1.0));
        let hit = intersect_sphere(&ray, &sphere).unwrap();
        assert!(hit.normal.dot(&ray.direction.normalized()) <= 1e-9);
    }

    // S3 — Triangle hit.
    #[test]
    fn triangle_hit() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(1.0, -1.0, -2.0),
            Vec3::new(0.0, 1.0, -2.0),
        );
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = intersect_triangle(&ray, &tri).expect("expected hit");

        assert_abs_diff_eq!(hit.position.x(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.position.y(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.position.z(), -2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.distance, 2.0, epsilon = 1e-9);
        assert!(hit.normal.z() < 0.0);
    }

    #[test]
    fn triangle_miss_outside_edges() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(1.0, -1.0, -2.0),
            Vec3::new(0.0, 1.0, -2.0),
        );
        let ray = Ray::new(Vec3::new(5.0, 5.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_triangle(&ray, &tri).is_none());
    }

    #[test]
    fn triangle_parallel_ray_misses() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(1.0, -1.0, -2.0),
            Vec3::new(0.0, 1.0, -2.0),
        );
        let ray = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_triangle(&ray, &tri).is_none());
    }

    #[test]
    fn intersection_normal_faces_incoming_ray_invariant() {
        let sphere = Sphere::new(Vec3::new(0.3, -0.2, -4.0), 1.3);
        for (ox, oy, dz) in [(0.0, 0.0, -1.0), (0.5, 0.2, -1.0), (-0.4, 0.1, -1.0)] {
            let ray = Ray::new(Vec3::new(ox, oy, 0.0), Vec3::new(0.0, 0.0, dz));
            if let Some(hit) = intersect_sphere(&ray, &sphere) {
                assert!(hit.normal.dot(&ray.direction.normalized()) <= 1e-9);
            }
        }
    }
}
