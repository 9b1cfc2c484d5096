//! OBJ/MTL loading via `tobj`.
//!
//! Each named OBJ object becomes one [`Mesh`]; every material run inside it
//! becomes a [`Piece`]. Materials are resolved by name before the meshes are
//! returned, so a piece that names an undefined material fails the load.
//!
//! `tobj` drops `s` records, so smoothing groups come from a separate pass
//! over the file that tags every triangle in file order.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use octa_math::{Vec2, Vec3};

use crate::error::Result;
use crate::material::Material;
use crate::mesh::{Face, FaceVertex, Mesh, Piece};
use crate::texture::TextureCache;

/// Material name given to faces that have no `usemtl`.
pub const DEFAULT_MATERIAL_NAME: &str = "default";

/// Meshes and materials read from one OBJ file.
#[derive(Debug, Default)]
pub struct LoadedScene {
    pub meshes: Vec<Mesh>,
    pub materials: HashMap<String, Arc<Material>>,
}

impl LoadedScene {
    pub fn face_count(&self) -> usize {
        self.meshes.iter().map(Mesh::face_count).sum()
    }
}

/// Load an OBJ file and its material libraries.
///
/// Texture paths in the MTL file are resolved relative to the OBJ file.
pub fn load_obj(path: impl AsRef<Path>, textures: &mut TextureCache) -> Result<LoadedScene> {
    let path = path.as_ref();
    log::info!("Loading OBJ: {}", path.display());

    let (models, mtl_result) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ..Default::default()
        },
    )?;

    let mtl_materials = match mtl_result {
        Ok(materials) => materials,
        Err(e) => {
            log::warn!("No usable material library for {}: {}", path.display(), e);
            Vec::new()
        }
    };

    if let Some(dir) = path.parent() {
        textures.set_base_dir(dir);
    }

    let mut materials = HashMap::new();
    materials.insert(
        DEFAULT_MATERIAL_NAME.to_string(),
        Arc::new(Material::new(DEFAULT_MATERIAL_NAME, Vec3::ONE)),
    );
    for mtl in &mtl_materials {
        let material = convert_material(mtl, textures)?;
        materials.insert(material.name.clone(), Arc::new(material));
    }

    let total_faces: usize = models.iter().map(|m| m.mesh.indices.len() / 3).sum();
    let mut smoothing = scan_smoothing_groups(&std::fs::read_to_string(path)?);
    if smoothing.len() != total_faces {
        log::warn!(
            "Smoothing groups of {} don't line up with its faces ({} vs {}), loading flat",
            path.display(),
            smoothing.len(),
            total_faces
        );
        smoothing = vec![None; total_faces];
    }
    let mut groups = smoothing.as_slice();

    let mut meshes: Vec<Mesh> = Vec::new();
    for model in &models {
        let material_name = model
            .mesh
            .material_id
            .and_then(|id| mtl_materials.get(id))
            .map(|m| m.name.clone())
            .unwrap_or_else(|| DEFAULT_MATERIAL_NAME.to_string());

        let index = match meshes.iter().position(|m| m.name == model.name) {
            Some(index) => index,
            None => {
                meshes.push(Mesh::new(model.name.clone()));
                meshes.len() - 1
            }
        };
        let (model_groups, rest) = groups.split_at(model.mesh.indices.len() / 3);
        groups = rest;
        append_model(&mut meshes[index], &model.name, &material_name, &model.mesh, model_groups);
    }

    for mesh in &mut meshes {
        mesh.validate()?;
        mesh.resolve_materials(&materials)?;
        log::info!(
            "Loaded mesh '{}': {} vertices, {} faces, {} pieces",
            mesh.name,
            mesh.vertex_count(),
            mesh.face_count(),
            mesh.pieces.len()
        );
    }

    Ok(LoadedScene { meshes, materials })
}

/// Append one `tobj` model to a mesh as a new piece, offsetting its indices
/// past the vertex data already in the mesh. `groups` holds the smoothing
/// group of each triangle.
fn append_model(
    mesh: &mut Mesh,
    name: &str,
    material_name: &str,
    source: &tobj::Mesh,
    groups: &[Option<u32>],
) {
    let vertex_offset = mesh.vertices.len();
    let tex_coord_offset = mesh.tex_coords.len();
    let normal_offset = mesh.normals.len();

    mesh.vertices.extend(
        source
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2])),
    );
    mesh.normals.extend(
        source
            .normals
            .chunks_exact(3)
            .map(|n| Vec3::new(n[0], n[1], n[2])),
    );
    mesh.tex_coords.extend(
        source
            .texcoords
            .chunks_exact(2)
            .map(|t| Vec2::new(t[0], t[1])),
    );

    let corner = |i: usize| {
        let vertex = source.indices[i] as usize + vertex_offset;
        let tex_coord = source
            .texcoord_indices
            .get(i)
            .map(|&t| t as usize + tex_coord_offset);
        let normal = source
            .normal_indices
            .get(i)
            .map(|&n| n as usize + normal_offset);
        FaceVertex::new(vertex, tex_coord, normal)
    };

    let mut piece = Piece::new(name, material_name);
    for (f, group) in groups.iter().enumerate() {
        let face = Face::new([corner(3 * f), corner(3 * f + 1), corner(3 * f + 2)]);
        match group {
            Some(id) => piece.smoothing_groups.entry(*id).or_default().push(face),
            None => piece.flat_faces.push(face),
        }
    }
    mesh.pieces.push(piece);
}

/// Smoothing group of every triangle in an OBJ source, in file order.
///
/// `s off` and `usemtl` switch back to flat shading; any other `s` value is
/// a group id. A polygon of n corners counts as n - 2 triangles, matching
/// `tobj`'s fan triangulation.
fn scan_smoothing_groups(source: &str) -> Vec<Option<u32>> {
    let mut groups = Vec::new();
    let mut current = None;
    let mut pending = String::new();

    for raw in source.lines() {
        let line = raw.split('#').next().unwrap_or_default().trim_end();
        if let Some(head) = line.strip_suffix('\\') {
            pending.push_str(head);
            pending.push(' ');
            continue;
        }
        pending.push_str(line);

        let mut words = pending.split_whitespace();
        match words.next() {
            Some("s") => {
                current = match words.next() {
                    Some("off") | None => None,
                    Some(id) => id.parse().ok(),
                }
            }
            Some("usemtl") => current = None,
            Some("f") => {
                let corners = words.count();
                groups.extend(std::iter::repeat(current).take(corners.saturating_sub(2)));
            }
            _ => {}
        }
        pending.clear();
    }

    groups
}

fn convert_material(mtl: &tobj::Material, textures: &mut TextureCache) -> Result<Material> {
    let defaults = Material::default();
    let vec3 = |c: Option<[f32; 3]>, fallback: Vec3| c.map(Vec3::from_array).unwrap_or(fallback);
    let param = |key: &str| mtl.unknown_param.get(key).map(String::as_str);

    let mut material = Material {
        name: mtl.name.clone(),
        illumination_model: mtl.illumination_model.unwrap_or(defaults.illumination_model),
        ambient_colour: vec3(mtl.ambient, defaults.ambient_colour),
        diffuse_colour: vec3(mtl.diffuse, defaults.diffuse_colour),
        specular_colour: vec3(mtl.specular, defaults.specular_colour),
        emissive_colour: vec3(mtl.emissive, defaults.emissive_colour),
        transmission_filter: param("Tf")
            .and_then(parse_vec3)
            .unwrap_or(defaults.transmission_filter),
        specular_exponent: mtl.shininess.unwrap_or(defaults.specular_exponent),
        index_of_refraction: mtl.optical_density.unwrap_or(defaults.index_of_refraction),
        dissolve: mtl.dissolve.unwrap_or(defaults.dissolve),
        transparency: param("Tr")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.transparency),
        ..defaults
    };

    let mut load = |path: Option<&str>| path.map(|p| textures.load(p)).transpose();

    material.textures.ambient = load(mtl.ambient_texture.as_deref())?;
    material.textures.diffuse = load(mtl.diffuse_texture.as_deref())?;
    material.textures.specular = load(mtl.specular_texture.as_deref())?;
    material.textures.specular_exponent = load(mtl.shininess_texture.as_deref())?;
    material.textures.dissolve = load(mtl.dissolve_texture.as_deref())?;
    material.textures.emissive = load(param("map_Ke"))?;
    material.textures.index_of_refraction = load(param("map_Ni"))?;
    material.textures.transparency = load(param("map_Tr"))?;
    material.textures.transmission_filter = load(param("map_Tf"))?;

    log::debug!(
        "Material '{}': {} textures, illum {}",
        material.name,
        material.textures.count(),
        material.illumination_model
    );

    Ok(material)
}

fn parse_vec3(value: &str) -> Option<Vec3> {
    let parts: Vec<f32> = value
        .split_whitespace()
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [r, g, b] => Some(Vec3::new(*r, *g, *b)),
        // A single value applies to every channel
        [v] => Some(Vec3::splat(*v)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::fs;

    const CUBE_CORNER_OBJ: &str = "\
mtllib scene.mtl
o Wedge
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
v 0.0 0.0 1.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
usemtl Red
f 1/1/1 2/2/1 3/3/1
usemtl Blue
f 1/1/1 3/3/1 4/2/1
";

    const SCENE_MTL: &str = "\
newmtl Red
Kd 0.9 0.1 0.1
Ks 0.5 0.5 0.5
Ns 32
Ke 0.1 0.0 0.0
illum 2

newmtl Blue
Kd 0.1 0.1 0.9
Ni 1.45
d 0.5
";

    fn write_fixture(obj: &str, mtl: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("scene.obj"), obj).unwrap();
        fs::write(dir.path().join("scene.mtl"), mtl).unwrap();
        dir
    }

    #[test]
    fn test_load_obj_pieces_and_materials() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = write_fixture(CUBE_CORNER_OBJ, SCENE_MTL);
        let mut cache = TextureCache::new();

        let scene = load_obj(dir.path().join("scene.obj"), &mut cache).unwrap();

        assert_eq!(scene.meshes.len(), 1);
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.name, "Wedge");
        assert_eq!(mesh.pieces.len(), 2);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(scene.face_count(), 2);

        let red = mesh.pieces[0].material.as_ref().unwrap();
        assert_eq!(red.name, "Red");
        assert!((red.diffuse_colour - Vec3::new(0.9, 0.1, 0.1)).length() < 1e-6);
        assert!((red.emissive_colour - Vec3::new(0.1, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(red.specular_exponent, 32.0);

        let blue = mesh.pieces[1].material.as_ref().unwrap();
        assert_eq!(blue.name, "Blue");
        assert!((blue.index_of_refraction - 1.45).abs() < 1e-6);
        assert!((blue.dissolve - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_load_obj_face_indices_in_range() {
        let dir = write_fixture(CUBE_CORNER_OBJ, SCENE_MTL);
        let mut cache = TextureCache::new();

        let scene = load_obj(dir.path().join("scene.obj"), &mut cache).unwrap();
        let mesh = &scene.meshes[0];

        for piece in &mesh.pieces {
            for face in piece.faces() {
                let positions = face.positions(&mesh.vertices).unwrap();
                assert!(positions.iter().all(|p| p.length() <= 1.0 + 1e-6));
                assert!(face.tex_coords(&mesh.tex_coords).is_some());
            }
        }
    }

    #[test]
    fn test_load_obj_smoothing_groups() {
        let obj = "\
o Strip
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
v 0.0 0.0 1.0
s off
f 1 2 3
s 1
f 1 3 4
f 1 4 5
s 2
f 1 2 3 4
";
        let dir = write_fixture(obj, SCENE_MTL);
        let mut cache = TextureCache::new();

        let scene = load_obj(dir.path().join("scene.obj"), &mut cache).unwrap();
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.face_count(), 5);

        let piece = &mesh.pieces[0];
        assert_eq!(piece.material_name, DEFAULT_MATERIAL_NAME);
        assert_eq!(piece.flat_faces.len(), 1);
        assert_eq!(piece.smoothing_groups[&1].len(), 2);
        // The quad is split in two
        assert_eq!(piece.smoothing_groups[&2].len(), 2);
    }

    #[test]
    fn test_scan_smoothing_groups() {
        let source = "\
s 3
f 1 2 3 # trailing comment
usemtl Red
f 1 2 3
s 4
f 1 2 \\
  3 4 5
s off
f 1 2 3
";
        assert_eq!(
            scan_smoothing_groups(source),
            vec![Some(3), None, Some(4), Some(4), Some(4), None]
        );
    }

    #[test]
    fn test_load_obj_missing_file() {
        let mut cache = TextureCache::new();
        let result = load_obj("/no/such/file.obj", &mut cache);
        assert!(matches!(result, Err(CoreError::Obj(_))));
    }

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("0.5 0.25 1"), Some(Vec3::new(0.5, 0.25, 1.0)));
        assert_eq!(parse_vec3("0.5"), Some(Vec3::splat(0.5)));
        assert_eq!(parse_vec3("a b c"), None);
    }
}
