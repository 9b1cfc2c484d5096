//! The built-in demo scene: mirrored and textured spheres, wooden crates,
//! a painting on the wall, four coloured lights, plus any loaded OBJ meshes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use octa_core::{load_obj, Material, Texture, TextureCache};
use octa_math::{Transform, Vec3};
use octa_renderer::{
    BoundedPlane, Cuboid, Polyhedron, PositionalLight, RayTracer, RenderOptions, Scene, SceneObject,
    Sphere,
};

/// Colour used when the environment map can't be loaded.
const FALLBACK_SKY: Vec3 = Vec3::new(0.35, 0.45, 0.6);

/// Load a texture, or warn and carry on untextured.
fn optional_texture(textures: &mut TextureCache, name: &str) -> Option<Arc<Texture>> {
    match textures.load(name) {
        Ok(texture) => Some(texture),
        Err(err) => {
            log::warn!("Texture {name} unavailable, rendering untextured: {err}");
            None
        }
    }
}

fn lights() -> Result<Vec<PositionalLight>> {
    let lights = [
        (Vec3::new(1.0, 0.15, 0.15), Vec3::new(1.68, 10.75, -9.04), 0.55, 5.63),
        (Vec3::new(0.15, 1.0, 0.15), Vec3::new(-5.05, 8.6, -8.75), 0.65, 6.35),
        (Vec3::new(1.0, 1.0, 1.0), Vec3::new(-6.25, 4.74, -0.84), 0.85, 4.55),
        (Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.65, 2.15, 3.5), 1.0, 15.05),
    ];
    lights
        .into_iter()
        .map(|(colour, position, power, radius)| {
            PositionalLight::new(colour, position, power, radius).map_err(Into::into)
        })
        .collect()
}

/// Directory holding the demo textures: next to the environment map.
fn texture_dir(options: &RenderOptions) -> PathBuf {
    options
        .environment_map
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Assemble the demo scene and its tracer.
pub fn build(options: &RenderOptions, obj_paths: &[PathBuf]) -> Result<RayTracer> {
    let mut textures = TextureCache::with_base_dir(texture_dir(options));

    let environment = match octa_core::texture::load_texture_file(&options.environment_map) {
        Ok(texture) => Arc::new(texture),
        Err(err) => {
            log::warn!(
                "Environment map {} unavailable, using a flat sky: {err}",
                options.environment_map.display()
            );
            Arc::new(Texture::solid_color(FALLBACK_SKY))
        }
    };

    let mirror = Arc::new(Material::mirror());
    let glass = Arc::new(Material::glass());
    let mars = Arc::new(Material::mars(optional_texture(&mut textures, "Mars.jpg")));
    let crate_wood = Arc::new(Material::crate_wood(optional_texture(&mut textures, "Crate.jpg")));
    let old_painting = Arc::new(Material::old_painting(optional_texture(
        &mut textures,
        "OldPainting.jpg",
    )));

    let mut scene = Scene::new(options.texture_sampler());

    let spheres = [
        (Vec3::new(2.05, 3.5, -2.5), 1.1, mirror.clone()),
        (Vec3::new(-2.2, 1.1, -0.5), 1.15, mirror),
        (Vec3::new(-5.8, 5.2, -9.7), 1.25, Arc::new(Material::shiny_green())),
        (Vec3::new(-5.6, 1.21, -0.2), 1.28, mars),
        (Vec3::new(-3.9, 0.85, 0.8), 0.65, glass),
        (Vec3::new(-5.9, 0.6, 1.25), 0.55, Arc::new(Material::shiny_red())),
    ];
    for (i, (position, radius, material)) in spheres.into_iter().enumerate() {
        scene.add(SceneObject::new(
            format!("sphere_{i}"),
            Transform::from_position(position),
            Sphere::new(radius, material),
        ));
    }

    let boxes = [
        (
            Vec3::new(2.08, 0.5, 1.5),
            Vec3::new(0.0, 203.0, 0.0),
            Vec3::new(1.75, 1.0, 1.9),
            Arc::new(Material::blue_box()),
        ),
        (
            Vec3::new(1.15, 1.25, -3.5),
            Vec3::new(0.0, 25.0, 0.0),
            Vec3::splat(2.5),
            crate_wood.clone(),
        ),
        (
            Vec3::new(2.0, 1.2, -1.3),
            Vec3::new(0.0, -26.0, 0.0),
            Vec3::splat(2.25),
            crate_wood,
        ),
    ];
    for (i, (position, rotation, size, material)) in boxes.into_iter().enumerate() {
        scene.add(SceneObject::new(
            format!("box_{i}"),
            Transform::new(position, rotation),
            Cuboid::new(size, material),
        ));
    }

    for path in obj_paths {
        let loaded = load_obj(path, &mut textures)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        log::info!(
            "Loaded {}: {} meshes, {} faces, {} materials",
            path.display(),
            loaded.meshes.len(),
            loaded.face_count(),
            loaded.materials.len()
        );
        for mesh in loaded.meshes {
            let name = mesh.name.clone();
            let polyhedron = Polyhedron::from_mesh(Arc::new(mesh), options.bvh_max_depth)
                .with_context(|| format!("Failed to build BVH for mesh '{name}'"))?;
            scene.add(SceneObject::new(name, Transform::default(), polyhedron));
        }
    }

    scene.add(SceneObject::new(
        "painting",
        Transform::new(Vec3::new(-6.7, 9.6, -5.5), Vec3::new(90.0, 0.0, -90.0)),
        BoundedPlane::new(5.2, 7.1, old_painting),
    ));

    log::info!("Scene has {} objects, {} textures", scene.len(), textures.len());
    Ok(RayTracer::new(scene, lights()?, environment, options.ambient_light))
}
