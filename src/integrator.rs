//! Component G: the recursive integrator — closest-hit scene traversal,
//! shading-normal resolution, and the reflection/refraction recursion.
//!
//! Grounded on the reference `GetPixelColor` (§4.G): reflection is only
//! traced while `insideFlag == 0`; refraction is always attempted, and its
//! `sin²θ₂ = η·√(1 − cos²θ₁)` test is reproduced literally rather than
//! "corrected" to `η²·sin²θ₁`, per spec.md's resolved open question.

use crate::geometry::intersect::{intersect_sphere, intersect_triangle, Intersection};
use crate::material::MaterialId;
use crate::ray::Ray;
use crate::scene::{Object, Scene, SphereObject};
use crate::shader::shade;
use crate::vec3::{Vec3, REFLECT_EPS, REFRACT_EPS};

enum HitKind<'a> {
    Triangle(&'a Object),
    Sphere(&'a SphereObject),
}

/// The nearest primitive a ray strikes, borrowed from the scene it came
/// from.
pub struct SceneHit<'a> {
    pub intersection: Intersection,
    kind: HitKind<'a>,
}

impl SceneHit<'_> {
    fn material_id(&self) -> MaterialId {
        match self.kind {
            HitKind::Triangle(obj) => obj.material,
            HitKind::Sphere(obj) => obj.material,
        }
    }

    fn is_sphere(&self) -> bool {
        matches!(self.kind, HitKind::Sphere(_))
    }
}

/// Linear scan over every triangle and sphere in the scene, keeping the
/// closest hit (§4.G step 1 — there is no acceleration structure).
pub fn closest_hit<'a>(ray: &Ray, scene: &'a Scene) -> Option<SceneHit<'a>> {
    let mut best: Option<SceneHit<'a>> = None;

    for obj in &scene.objects {
        if let Some(hit) = intersect_triangle(ray, &obj.triangle) {
            if best.as_ref().map_or(true, |b| hit.distance < b.intersection.distance) {
                best = Some(SceneHit {
                    intersection: hit,
                    kind: HitKind::Triangle(obj),
                });
            }
        }
    }

    for sphere_obj in &scene.sphere_objects {
        if let Some(hit) = intersect_sphere(ray, &sphere_obj.sphere) {
            if best.as_ref().map_or(true, |b| hit.distance < b.intersection.distance) {
                best = Some(SceneHit {
                    intersection: hit,
                    kind: HitKind::Sphere(sphere_obj),
                });
            }
        }
    }

    best
}

/// Resolve the shading normal: the sphere's geometric normal, the
/// triangle's geometric normal, or — when the triangle carries per-vertex
/// normals — the barycentric blend of them. The blend is left un-normalized
/// and un-flipped against the ray, matching the reference exactly (§4.G
/// step 2): interpolated normals are taken on faith from the source mesh.
/// Also used directly by normal-mode visualization (§4.H), which wants the
/// same interpolated normal the integrator shades with.
pub fn shading_normal(hit: &SceneHit) -> Vec3 {
    match hit.kind {
        HitKind::Sphere(_) => hit.intersection.normal,
        HitKind::Triangle(obj) => match &obj.normals {
            None => hit.intersection.normal,
            Some(normals) => {
                let (u, v, w) = obj.triangle.barycentric(&hit.intersection.position);
                normals[0] * u + normals[1] * v + normals[2] * w
            }
        },
    }
}

/// `Trace(ray, depth, insideFlag)` (§4.G). Returns black once `depth < 0`
/// or the ray escapes the scene.
pub fn trace(ray: &Ray, depth: i64, inside: bool, scene: &Scene) -> Vec3 {
    if depth < 0 {
        return Vec3::ZERO;
    }

    let hit = match closest_hit(ray, scene) {
        Some(hit) => hit,
        None => return Vec3::ZERO,
    };

    let material = scene.material(hit.material_id());
    let normal = shading_normal(&hit);
    let dir = ray.direction.normalized();
    let pos = hit.intersection.position;

    let mut color = shade(pos, normal, -dir, material, scene);

    if !inside {
        let reflected = dir.reflect(&normal);
        let origin = pos + normal * REFLECT_EPS;
        let reflected_color = trace(&Ray::new(origin, reflected), depth - 1, false, scene);
        color = color + reflected_color * material.albedo.kr;
    }

    let (eta, weight) = if inside {
        (material.refractive_index, 1.0)
    } else {
        (1.0 / material.refractive_index, material.albedo.kt)
    };

    let cos1 = -normal.dot(&dir);
    let sin2 = eta * (1.0 - cos1 * cos1).sqrt();
    if sin2 <= 1.0 {
        let cos2 = (1.0 - sin2 * sin2).sqrt();
        let refracted = dir * eta + normal * (eta * cos1 - cos2);
        let origin = pos - normal * REFRACT_EPS;
        let next_inside = hit.is_sphere() && !inside;
        let refracted_color = trace(&Ray::new(origin, refracted), depth - 1, next_inside, scene);
        color = color + refracted_color * weight;
    }

    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Sphere;
    use crate::material::{Albedo, Material};
    use crate::scene::SphereObject;
    use approx::assert_abs_diff_eq;

    fn opaque_white() -> Material {
        let mut m = Material::default();
        m.diffuse = Vec3::new(1.0, 1.0, 1.0);
        m.albedo = Albedo::new(1.0, 0.0, 0.0);
        m
    }

    #[test]
    fn miss_is_black() {
        let scene = Scene::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let color = trace(&ray, 4, false, &scene);
        assert_abs_diff_eq!(color.x(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(color.y(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(color.z(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn negative_depth_is_black_even_on_a_hit() {
        let mut scene = Scene::new();
        let mat = scene.push_material(opaque_white());
        scene.sphere_objects.push(SphereObject {
            sphere: Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0),
            material: mat,
        });
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let color = trace(&ray, -1, false, &scene);
        assert_abs_diff_eq!(color.x(), 0.0, epsilon = 1e-12);
    }

    // A fully opaque, non-reflective, non-refractive sphere with no lights
    // contributes only ambient/emissive — reflection and refraction weights
    // are both zero, so recursing deeper changes nothing.
    #[test]
    fn opaque_diffuse_sphere_ignores_recursion_depth() {
        let mut scene = Scene::new();
        let mat = scene.push_material(opaque_white());
        scene.sphere_objects.push(SphereObject {
            sphere: Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0),
            material: mat,
        });
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let shallow = trace(&ray, 0, false, &scene);
        let deep = trace(&ray, 8, false, &scene);
        assert_abs_diff_eq!(shallow.x(), deep.x(), epsilon = 1e-12);
        assert_abs_diff_eq!(shallow.y(), deep.y(), epsilon = 1e-12);
        assert_abs_diff_eq!(shallow.z(), deep.z(), epsilon = 1e-12);
    }
}
