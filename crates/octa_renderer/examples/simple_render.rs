//! Simple ray tracer example.
//!
//! Renders a mirror ball, a glass ball and a box on a floor under a flat sky,
//! and saves it to PNG. No textures needed.

use std::sync::Arc;

use octa_core::{Material, Texture};
use octa_renderer::{
    render_parallel, BoundedPlane, Camera, Cuboid, PositionalLight, RayCaster, RayTracer,
    RenderOptions, Result, Scene, SceneObject, Sphere, Transform, Vec3,
};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let options = RenderOptions {
        camera_position: Vec3::new(0.0, 2.0, 8.0),
        camera_rotation_degrees: Vec3::new(-8.0, 0.0, 0.0),
        output_path: "simple_render.png".into(),
        ..RenderOptions::development()
    };

    let start = std::time::Instant::now();
    let tracer = build_scene(&options)?;
    log::info!("Scene built in {:?}", start.elapsed());

    let caster = RayCaster::new(&options)?;
    let camera = Camera::from_options(&options);
    let image = render_parallel(&tracer, &caster, &camera, &options);

    image.save_png(&options.output_path)
}

fn build_scene(options: &RenderOptions) -> Result<RayTracer> {
    let mut scene = Scene::new(options.texture_sampler());

    scene.add(SceneObject::new(
        "mirror",
        Transform::from_position(Vec3::new(-1.5, 1.0, 0.0)),
        Sphere::new(1.0, Arc::new(Material::mirror())),
    ));
    scene.add(SceneObject::new(
        "glass",
        Transform::from_position(Vec3::new(1.2, 0.8, 1.5)),
        Sphere::new(0.8, Arc::new(Material::glass())),
    ));
    scene.add(SceneObject::new(
        "box",
        Transform::new(Vec3::new(2.0, 0.75, -1.5), Vec3::new(0.0, 30.0, 0.0)),
        Cuboid::new(Vec3::splat(1.5), Arc::new(Material::blue_box())),
    ));
    scene.add(SceneObject::new(
        "floor",
        Transform::default(),
        BoundedPlane::new(12.0, 12.0, Arc::new(Material::new("floor", Vec3::splat(0.8)))),
    ));

    let lights = vec![
        PositionalLight::new(Vec3::ONE, Vec3::new(0.0, 6.0, 4.0), 1.0, 15.0)?,
        PositionalLight::new(Vec3::new(1.0, 0.9, 0.8), Vec3::new(-4.0, 4.0, -2.0), 0.6, 8.0)?,
    ];

    let sky = Arc::new(Texture::solid_color(Vec3::new(0.5, 0.7, 1.0)));
    Ok(RayTracer::new(scene, lights, sky, options.ambient_light))
}
