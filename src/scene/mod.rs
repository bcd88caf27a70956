//! Component D: the typed, read-only view over parsed geometry, materials
//! and lights that the renderer operates on.
//!
//! Materials are owned by the `Scene` in a flat `Vec` and referenced by
//! `Object`/`SphereObject` via `MaterialId` indices rather than raw
//! pointers or borrowed references, per spec.md §9 ("use indices ... rather
//! than raw back-pointers; the scene outlives the render").

pub mod loader;

use crate::geometry::{Sphere, Triangle};
use crate::light::Light;
use crate::material::{Material, MaterialId};
use crate::vec3::Vec3;

/// A triangle with a material handle and optional per-vertex shading
/// normals (either none, or exactly three, matching §3).
#[derive(Clone, Debug)]
pub struct Object {
    pub triangle: Triangle,
    pub material: MaterialId,
    pub normals: Option<[Vec3; 3]>,
}

#[derive(Clone, Debug)]
pub struct SphereObject {
    pub sphere: Sphere,
    pub material: MaterialId,
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub objects: Vec<Object>,
    pub sphere_objects: Vec<SphereObject>,
    pub lights: Vec<Light>,
    materials: Vec<Material>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `material`, returning the handle that refers to it for the
    /// scene's lifetime.
    pub fn push_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(material);
        id
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }
}
