//! Component I (spec.md §6, out of core scope but required for a runnable
//! crate): the scene and material text-format parser.
//!
//! Grounded on the reference `ReadScene`/`ReadMaterials` functions — same
//! token grammar, same fan-triangulation and slash-index handling, same
//! "default material on an unresolved `usemtl`" behavior — re-expressed as
//! a line-oriented Rust parser returning `anyhow::Result` instead of
//! reading from an unbounded token stream.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::geometry::{Sphere, Triangle};
use crate::light::Light;
use crate::material::{Albedo, Material};
use crate::scene::{Object, Scene, SphereObject};
use crate::vec3::Vec3;

/// Strip a `#`-led comment and split the remainder on whitespace.
fn tokenize(line: &str) -> Vec<&str> {
    let code = match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    };
    code.split_whitespace().collect()
}

fn parse_f64(tok: &str, context: &str) -> Result<f64> {
    tok.parse::<f64>()
        .with_context(|| format!("expected a number for {context}, got {tok:?}"))
}

/// Resolve a 1-indexed (optionally negative, relative-from-end) OBJ index
/// against a table of length `len`. `0` and out-of-range indices are a
/// parse error (§7 "Out-of-bounds vertex index").
fn resolve_index(raw: i64, len: usize, what: &str) -> Result<usize> {
    if raw == 0 {
        bail!("{what} index 0 is invalid (OBJ indices are 1-based)");
    }
    let resolved = if raw > 0 { raw - 1 } else { len as i64 + raw };
    if resolved < 0 || resolved as usize >= len {
        bail!("{what} index {raw} is out of bounds for {len} entries");
    }
    Ok(resolved as usize)
}

/// Parsed face-vertex token: position index, optional normal index.
struct FaceVertex {
    position: i64,
    normal: Option<i64>,
}

fn parse_face_vertex(tok: &str) -> Result<FaceVertex> {
    if let Some((p, n)) = tok.split_once("//") {
        return Ok(FaceVertex {
            position: p
                .parse()
                .with_context(|| format!("bad face position index in {tok:?}"))?,
            normal: Some(
                n.parse()
                    .with_context(|| format!("bad face normal index in {tok:?}"))?,
            ),
        });
    }

    let parts: Vec<&str> = tok.split('/').collect();
    match parts.as_slice() {
        [p] => Ok(FaceVertex {
            position: p
                .parse()
                .with_context(|| format!("bad face position index in {tok:?}"))?,
            normal: None,
        }),
        [p, _t] => Ok(FaceVertex {
            position: p
                .parse()
                .with_context(|| format!("bad face position index in {tok:?}"))?,
            normal: None,
        }),
        [p, _t, n] => Ok(FaceVertex {
            position: p
                .parse()
                .with_context(|| format!("bad face position index in {tok:?}"))?,
            normal: Some(
                n.parse()
                    .with_context(|| format!("bad face normal index in {tok:?}"))?,
            ),
        }),
        _ => bail!("malformed face vertex token {tok:?}"),
    }
}

pub fn load_materials(path: &Path) -> Result<HashMap<String, Material>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading material file {}", path.display()))?;

    let mut materials = HashMap::new();
    let mut current: Option<Material> = None;

    for (lineno, line) in text.lines().enumerate() {
        let tokens = tokenize(line);
        let Some((&keyword, rest)) = tokens.split_first() else {
            continue;
        };

        let fail_context = || format!("{}:{}", path.display(), lineno + 1);

        match keyword {
            "newmtl" => {
                if let Some(mat) = current.take() {
                    materials.insert(mat.name.clone(), mat);
                }
                let name = rest
                    .first()
                    .with_context(|| format!("{}: newmtl missing a name", fail_context()))?;
                let mut mat = Material::default();
                mat.name = name.to_string();
                current = Some(mat);
            }
            "Ka" | "Kd" | "Ks" | "Ke" => {
                let mat = current
                    .as_mut()
                    .with_context(|| format!("{}: {keyword} before newmtl", fail_context()))?;
                let [x, y, z] = rest else {
                    bail!("{}: {keyword} needs 3 values", fail_context());
                };
                let v = Vec3::new(
                    parse_f64(x, keyword)?,
                    parse_f64(y, keyword)?,
                    parse_f64(z, keyword)?,
                );
                match keyword {
                    "Ka" => mat.ambient = v,
                    "Kd" => mat.diffuse = v,
                    "Ks" => mat.specular = v,
                    "Ke" => mat.emissive = v,
                    _ => unreachable!(),
                }
            }
            "Ns" => {
                let mat = current
                    .as_mut()
                    .with_context(|| format!("{}: Ns before newmtl", fail_context()))?;
                let [x] = rest else {
                    bail!("{}: Ns needs 1 value", fail_context());
                };
                mat.specular_exponent = parse_f64(x, "Ns")?;
            }
            "Ni" => {
                let mat = current
                    .as_mut()
                    .with_context(|| format!("{}: Ni before newmtl", fail_context()))?;
                let [x] = rest else {
                    bail!("{}: Ni needs 1 value", fail_context());
                };
                mat.refractive_index = parse_f64(x, "Ni")?;
            }
            "al" => {
                let mat = current
                    .as_mut()
                    .with_context(|| format!("{}: al before newmtl", fail_context()))?;
                let [kd, kr, kt] = rest else {
                    bail!("{}: al needs 3 values", fail_context());
                };
                mat.albedo = Albedo::new(
                    parse_f64(kd, "al")?,
                    parse_f64(kr, "al")?,
                    parse_f64(kt, "al")?,
                );
            }
            _ => {}
        }
    }

    if let Some(mat) = current.take() {
        materials.insert(mat.name.clone(), mat);
    }

    Ok(materials)
}

pub fn load_scene(path: &Path) -> Result<Scene> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading scene file {}", path.display()))?;
    let directory = path.parent().unwrap_or_else(|| Path::new("."));

    let mut scene = Scene::new();
    let mut materials: HashMap<String, Material> = HashMap::new();
    let mut material_ids: HashMap<String, crate::material::MaterialId> = HashMap::new();
    let mut points: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut current_material_name = String::new();

    // Materials referenced by `usemtl` but not found get a shared default,
    // created lazily (§7 "Missing material").
    let mut default_material_id: Option<crate::material::MaterialId> = None;

    for (lineno, line) in text.lines().enumerate() {
        let tokens = tokenize(line);
        let Some((&keyword, rest)) = tokens.split_first() else {
            continue;
        };
        let fail_context = || format!("{}:{}", path.display(), lineno + 1);

        match keyword {
            "mtllib" => {
                let rel = rest
                    .first()
                    .with_context(|| format!("{}: mtllib missing a path", fail_context()))?;
                materials = load_materials(&directory.join(rel))?;
            }
            "v" => {
                let [x, y, z] = rest else {
                    bail!("{}: v needs 3 values", fail_context());
                };
                points.push(Vec3::new(
                    parse_f64(x, "v")?,
                    parse_f64(y, "v")?,
                    parse_f64(z, "v")?,
                ));
            }
            "vn" => {
                let [x, y, z] = rest else {
                    bail!("{}: vn needs 3 values", fail_context());
                };
                normals.push(Vec3::new(
                    parse_f64(x, "vn")?,
                    parse_f64(y, "vn")?,
                    parse_f64(z, "vn")?,
                ));
            }
            "usemtl" => {
                let name = rest
                    .first()
                    .with_context(|| format!("{}: usemtl missing a name", fail_context()))?;
                current_material_name = name.to_string();
            }
            "S" => {
                let [x, y, z, r] = rest else {
                    bail!("{}: S needs 4 values", fail_context());
                };
                let sphere = Sphere::new(
                    Vec3::new(parse_f64(x, "S")?, parse_f64(y, "S")?, parse_f64(z, "S")?),
                    parse_f64(r, "S")?,
                );
                let material = resolve_material(
                    &current_material_name,
                    &materials,
                    &mut material_ids,
                    &mut default_material_id,
                    &mut scene,
                );
                scene.sphere_objects.push(SphereObject { sphere, material });
            }
            "P" => {
                let [x, y, z, r, g, b] = rest else {
                    bail!("{}: P needs 6 values", fail_context());
                };
                scene.lights.push(Light::new(
                    Vec3::new(parse_f64(x, "P")?, parse_f64(y, "P")?, parse_f64(z, "P")?),
                    Vec3::new(parse_f64(r, "P")?, parse_f64(g, "P")?, parse_f64(b, "P")?),
                ));
            }
            "f" => {
                if rest.len() < 3 {
                    bail!("{}: f needs at least 3 vertices", fail_context());
                }
                let verts: Vec<FaceVertex> = rest
                    .iter()
                    .map(|t| parse_face_vertex(t))
                    .collect::<Result<_>>()?;

                let has_normals = verts[0].normal.is_some();
                if verts.iter().any(|v| v.normal.is_some() != has_normals) {
                    bail!(
                        "{}: face normals must be either all present or all absent",
                        fail_context()
                    );
                }

                let position_at = |fv: &FaceVertex| -> Result<Vec3> {
                    Ok(points[resolve_index(fv.position, points.len(), "vertex")?])
                };
                let normal_at = |fv: &FaceVertex| -> Result<Vec3> {
                    Ok(normals[resolve_index(fv.normal.unwrap(), normals.len(), "normal")?])
                };

                let material = resolve_material(
                    &current_material_name,
                    &materials,
                    &mut material_ids,
                    &mut default_material_id,
                    &mut scene,
                );

                let v0 = &verts[0];
                for pair in verts[1..].windows(2) {
                    let (v1, v2) = (&pair[0], &pair[1]);
                    let triangle =
                        Triangle::new(position_at(v0)?, position_at(v1)?, position_at(v2)?);
                    let normals_triplet = if has_normals {
                        Some([normal_at(v0)?, normal_at(v1)?, normal_at(v2)?])
                    } else {
                        None
                    };
                    scene.objects.push(Object {
                        triangle,
                        material,
                        normals: normals_triplet,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(scene)
}

/// Resolve the current `usemtl` name against the parsed material table,
/// inserting it into the scene (deduplicated) and returning its handle. An
/// unknown name falls back to a single shared default material, logged once.
fn resolve_material(
    name: &str,
    materials: &HashMap<String, Material>,
    material_ids: &mut HashMap<String, crate::material::MaterialId>,
    default_material_id: &mut Option<crate::material::MaterialId>,
    scene: &mut Scene,
) -> crate::material::MaterialId {
    if let Some(&id) = material_ids.get(name) {
        return id;
    }

    if let Some(mat) = materials.get(name) {
        let id = scene.push_material(mat.clone());
        material_ids.insert(name.to_string(), id);
        return id;
    }

    if let Some(id) = *default_material_id {
        return id;
    }

    tracing::warn!(material = name, "usemtl refers to an unknown material, using default");
    let id = scene.push_material(Material::default());
    *default_material_id = Some(id);
    id
}
