//! Component F: direct (Phong) lighting with hard shadow visibility.

use crate::geometry::intersect::{intersect_sphere, intersect_triangle};
use crate::light::Light;
use crate::material::Material;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::vec3::{Vec3, SHADOW_EPS};

/// `Shade(pos, N, outDir, mat, scene)` — `out_dir` is the unit vector from
/// the hit point toward the camera (§4.F).
pub fn shade(pos: Vec3, normal: Vec3, out_dir: Vec3, material: &Material, scene: &Scene) -> Vec3 {
    let mut color = material.ambient + material.emissive;

    for light in &scene.lights {
        if !visible(pos, normal, light, scene) {
            continue;
        }

        let l_dir = (light.position - pos).normalized();
        let r = (normal * (2.0 * l_dir.dot(&normal)) - l_dir).normalized();

        let diff = material.diffuse.hadamard(&light.intensity) * l_dir.dot(&normal).max(0.0);
        let spec_term = r.dot(&out_dir).max(0.0).powf(material.specular_exponent);
        let spec = material.specular.hadamard(&light.intensity) * spec_term;

        color = color + (diff + spec) * material.albedo.kd;
    }

    color
}

/// Cast a shadow ray from `pos + eps * N` toward `light`; occluded iff any
/// primitive's hit distance is `<=` the distance to the light. No
/// transparency in shadows, by design (§4.F).
fn visible(pos: Vec3, normal: Vec3, light: &Light, scene: &Scene) -> bool {
    let to_light = light.position - pos;
    let dist = to_light.length();
    let ray = Ray::new(pos + normal * SHADOW_EPS, to_light.normalized());
    !occluded(&ray, dist, scene)
}

fn occluded(ray: &Ray, max_dist: f64, scene: &Scene) -> bool {
    for obj in &scene.objects {
        if let Some(hit) = intersect_triangle(ray, &obj.triangle) {
            if hit.distance <= max_dist {
                return true;
            }
        }
    }
    for sphere_obj in &scene.sphere_objects {
        if let Some(hit) = intersect_sphere(ray, &sphere_obj.sphere) {
            if hit.distance <= max_dist {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Albedo;
    use approx::assert_abs_diff_eq;

    // S6 — ambient-only triangle, no lights: shade() reduces to ambient + emissive.
    #[test]
    fn ambient_only_with_no_lights() {
        let scene = Scene::new();
        let mut material = Material::default();
        material.ambient = Vec3::new(0.2, 0.4, 0.6);
        material.albedo = Albedo::new(1.0, 0.0, 0.0);

        let color = shade(
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            &material,
            &scene,
        );

        assert_abs_diff_eq!(color.x(), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(color.y(), 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(color.z(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn light_behind_surface_is_not_visible() {
        let mut scene = Scene::new();
        scene
            .lights
            .push(Light::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(1.0, 1.0, 1.0)));

        let mut material = Material::default();
        material.diffuse = Vec3::new(1.0, 1.0, 1.0);

        // Normal points toward +z, light is behind the surface (at -z).
        let color = shade(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            &material,
            &scene,
        );
        assert_abs_diff_eq!(color.x(), 0.0, epsilon = 1e-12);
    }
}
