//! An offline CPU ray tracer: point-sampled primary rays, Phong direct
//! lighting, and recursive mirror reflection / dielectric refraction.

pub mod camera;
pub mod geometry;
pub mod image;
pub mod integrator;
pub mod light;
pub mod material;
pub mod options;
pub mod ray;
pub mod render;
pub mod scene;
pub mod shader;
pub mod tonemap;
pub mod vec3;

pub use image::Image;
pub use options::{CameraOptions, RenderMode, RenderOptions};
pub use render::render;
pub use scene::loader::load_scene;
pub use vec3::Vec3;
