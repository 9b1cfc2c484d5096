//! Recursive Whitted-style shading.
//!
//! Each hit spawns a reflection ray and a refraction ray with one bounce
//! less, plus one shadow ray per light in range. Rays that miss everything,
//! or run out of bounces, take their colour from the environment map.

use std::sync::Arc;

use octa_core::{spherical, Texture};
use octa_math::{reflect, refract, Ray, Vec3};

use crate::hittable::Intersection;
use crate::light::PositionalLight;
use crate::scene::Scene;
use crate::zbuffer::ZBuffer;

/// Offset applied along the normal to keep spawned rays off their surface.
const SURFACE_OFFSET: f32 = 1e-3;

/// Direct lighting at one hit.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Lighting {
    ambient: Vec3,
    diffuse: Vec3,
    specular: Vec3,
}

pub struct RayTracer {
    scene: Scene,
    lights: Vec<PositionalLight>,
    environment: Arc<Texture>,
    ambient_light: Vec3,
}

impl RayTracer {
    pub fn new(
        scene: Scene,
        lights: Vec<PositionalLight>,
        environment: Arc<Texture>,
        ambient_light: Vec3,
    ) -> Self {
        Self {
            scene,
            lights,
            environment,
            ambient_light,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn lights(&self) -> &[PositionalLight] {
        &self.lights
    }

    /// Colour seen along `ray` with `depth` bounces left.
    ///
    /// Every ray spawned here keeps the sample coordinate of `ray`, so they
    /// all compete in the same z-buffer slot.
    pub fn trace_ray(&self, ray: &Ray, depth: i32, zbuffer: &mut ZBuffer) -> Vec3 {
        if depth <= 0 {
            return self.environment_colour(ray);
        }
        let Some(hit) = self.scene.intersect(ray, zbuffer) else {
            return self.environment_colour(ray);
        };

        // Order matters: each of these claims z-buffer depth
        let reflection = self.trace_reflection(ray, depth, &hit, zbuffer);
        let refraction = self.trace_refraction(ray, depth, &hit, zbuffer);
        let lighting = self.trace_lighting(ray, &hit, zbuffer);

        hit.diffuse_colour
            * (lighting.ambient + lighting.diffuse + lighting.specular + reflection + refraction)
    }

    fn environment_colour(&self, ray: &Ray) -> Vec3 {
        self.scene
            .sampler()
            .sample_uv(spherical(ray.direction), &self.environment)
    }

    /// Ray from just off the hit surface, on the side `direction` points to.
    fn spawn_ray(ray: &Ray, hit: &Intersection, direction: Vec3, side: f32) -> Ray {
        let step = hit.normal * SURFACE_OFFSET;
        let origin = if side < 0.0 {
            hit.point - step
        } else {
            hit.point + step
        };
        Ray::new(origin, direction, ray.sample)
    }

    fn trace_reflection(&self, ray: &Ray, depth: i32, hit: &Intersection, zbuffer: &mut ZBuffer) -> Vec3 {
        let direction = reflect(ray.direction, hit.normal).normalize_or_zero();
        let reflected = Self::spawn_ray(ray, hit, direction, direction.dot(hit.normal));
        self.trace_ray(&reflected, depth - 1, zbuffer) * hit.material.albedo.reflective
    }

    fn trace_refraction(&self, ray: &Ray, depth: i32, hit: &Intersection, zbuffer: &mut ZBuffer) -> Vec3 {
        let direction = refract(ray.direction, hit.normal, hit.material.index_of_refraction, 1.0)
            .normalize_or_zero();
        let refracted = Self::spawn_ray(ray, hit, direction, direction.dot(hit.normal));
        self.trace_ray(&refracted, depth - 1, zbuffer) * hit.material.albedo.refractive
    }

    fn trace_lighting(&self, ray: &Ray, hit: &Intersection, zbuffer: &mut ZBuffer) -> Lighting {
        let material = &hit.material;
        let mut diffuse_power = 0.0;
        let mut specular_power = 0.0;
        let mut light_colour = Vec3::ONE;

        for light in &self.lights {
            let to_light = light.position - hit.point;
            let distance = to_light.length();
            if !light.in_range(distance) {
                continue;
            }

            let direction = to_light.normalize_or_zero();
            let attenuation = light.attenuation(distance);
            let light_dot = direction.dot(hit.normal);
            if self.is_shadowed(ray, hit, direction, light_dot, distance, zbuffer) {
                continue;
            }

            diffuse_power += light.power * light_dot.max(0.0) * attenuation;
            light_colour *= light.colour;

            let specular = reflect(direction, hit.normal).dot(ray.direction).max(0.0);
            specular_power += specular.powf(material.specular_exponent) * light.power * attenuation;
        }

        Lighting {
            ambient: material.diffuse_colour * self.ambient_light,
            diffuse: material.diffuse_colour * light_colour * diffuse_power * material.albedo.diffuse,
            specular: material.specular_colour * specular_power * material.albedo.specular,
        }
    }

    fn is_shadowed(
        &self,
        ray: &Ray,
        hit: &Intersection,
        direction: Vec3,
        light_dot: f32,
        light_distance: f32,
        zbuffer: &mut ZBuffer,
    ) -> bool {
        let shadow_ray = Self::spawn_ray(ray, hit, direction, light_dot);
        self.scene
            .intersect(&shadow_ray, zbuffer)
            .is_some_and(|blocker| (blocker.point - shadow_ray.origin).length() < light_distance)
    }
}
