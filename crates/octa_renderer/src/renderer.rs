//! Sequential renderer and image output.

use std::path::Path;
use std::time::{Duration, Instant};

use octa_math::Vec3;

use crate::camera::{Camera, RayCaster};
use crate::options::RenderOptions;
use crate::sampler::AntiAliasing;
use crate::tracer::RayTracer;
use crate::zbuffer::ZBuffer;
use crate::{RenderError, Result};

/// RGB color type (linear, unbounded).
pub type Color = Vec3;

/// How often progress is logged.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(3);

/// Scale a colour down so its largest channel is at most 1.
pub fn prevent_overflow(color: Color) -> Color {
    let max = color.max_element();
    if max > 1.0 {
        color / max
    } else {
        color
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let color = prevent_overflow(color).clamp(Vec3::ZERO, Vec3::ONE);
    let r = (255.0 * color.x) as u8;
    let g = (255.0 * color.y) as u8;
    let b = (255.0 * color.z) as u8;
    [r, g, b, 255]
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgba(*color))
            .collect()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let image = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba())
            .ok_or(RenderError::InvalidImageSize {
                width: self.width,
                height: self.height,
            })?;
        image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| RenderError::ImageWrite {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Logs completed pixels at a fixed interval.
pub(crate) struct Progress {
    total: u64,
    started: Instant,
    last_report: Instant,
}

impl Progress {
    pub(crate) fn new(total: u64) -> Self {
        let now = Instant::now();
        Self {
            total,
            started: now,
            last_report: now,
        }
    }

    pub(crate) fn update(&mut self, done: u64) {
        if self.last_report.elapsed() < PROGRESS_INTERVAL {
            return;
        }
        self.last_report = Instant::now();
        let percent = 100.0 * done as f64 / self.total.max(1) as f64;
        log::info!("Rendered {}/{} pixels ({:.1}%)", done, self.total, percent);
    }

    pub(crate) fn finish(&self) {
        log::info!(
            "Render complete: {} pixels in {:.2?}",
            self.total,
            self.started.elapsed()
        );
    }
}

/// Everything needed to shade one pixel.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub tracer: &'a RayTracer,
    pub caster: &'a RayCaster,
    pub camera: &'a Camera,
    pub anti_aliasing: AntiAliasing,
    pub bounces: i32,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        tracer: &'a RayTracer,
        caster: &'a RayCaster,
        camera: &'a Camera,
        options: &RenderOptions,
    ) -> Self {
        Self {
            tracer,
            caster,
            camera,
            anti_aliasing: options.anti_aliasing,
            bounces: options.ray_bounces,
        }
    }

    /// Colour of pixel `(x, y)`: the sampler's mean over its sample points.
    pub fn render_pixel(&self, x: u32, y: u32, zbuffer: &mut ZBuffer) -> Color {
        self.anti_aliasing.take_sample(x, y, |sample| {
            let ray = self.caster.cast_ray(sample.x, sample.y, self.camera);
            self.tracer.trace_ray(&ray, self.bounces, zbuffer)
        })
    }
}

/// Render the whole image on the calling thread, row by row.
pub fn render(
    tracer: &RayTracer,
    caster: &RayCaster,
    camera: &Camera,
    options: &RenderOptions,
) -> ImageBuffer {
    let context = RenderContext::new(tracer, caster, camera, options);
    let (width, height) = (caster.width(), caster.height());
    let mut image = ImageBuffer::new(width, height);
    let mut zbuffer = options.anti_aliasing.zbuffer(width, height);
    let mut progress = Progress::new(u64::from(width) * u64::from(height));

    log::info!(
        "Rendering {}x{} with {:?}, {} bounces",
        width,
        height,
        options.anti_aliasing,
        options.ray_bounces
    );

    for y in 0..height {
        for x in 0..width {
            image.set(x, y, context.render_pixel(x, y, &mut zbuffer));
        }
        progress.update(u64::from(y + 1) * u64::from(width));
    }

    progress.finish();
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Scene, SceneObject, Sphere};
    use octa_core::{Material, Texture};
    use octa_math::Transform;
    use std::sync::Arc;

    fn single_sphere_tracer(sky: Vec3) -> RayTracer {
        let mut scene = Scene::default();
        scene.add(SceneObject::new(
            "ball",
            Transform::default(),
            Sphere::new(1.0, Arc::new(Material::new("grey", Vec3::splat(0.5)))),
        ));
        RayTracer::new(scene, vec![], Arc::new(Texture::solid_color(sky)), Vec3::splat(0.5))
    }

    fn small_options() -> RenderOptions {
        RenderOptions {
            width: 9,
            height: 9,
            camera_position: Vec3::new(0.0, 0.0, 5.0),
            camera_vfov_degrees: 40.0,
            anti_aliasing: AntiAliasing::None,
            ..RenderOptions::development()
        }
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Vec3::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Vec3::ONE), [255, 255, 255, 255]);
        // Overflowing colours keep their hue
        assert_eq!(color_to_rgba(Vec3::new(2.0, 1.0, 0.0)), [255, 127, 0, 255]);
        assert_eq!(color_to_rgba(Vec3::new(-1.0, 0.5, 0.0)), [0, 127, 0, 255]);
    }

    #[test]
    fn test_image_buffer() {
        let mut image = ImageBuffer::new(3, 2);
        assert_eq!(image.pixels.len(), 6);

        image.set(2, 1, Vec3::ONE);
        assert_eq!(image.get(2, 1), Vec3::ONE);
        assert_eq!(image.get(0, 0), Vec3::ZERO);

        let rgba = image.to_rgba();
        assert_eq!(rgba.len(), 24);
        assert_eq!(&rgba[20..24], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_render_sphere_in_centre() {
        let sky = Vec3::new(0.0, 0.0, 1.0);
        let tracer = single_sphere_tracer(sky);
        let options = small_options();
        let caster = RayCaster::new(&options).unwrap();
        let camera = Camera::from_options(&options);

        let image = render(&tracer, &caster, &camera, &options);

        // Centre pixel: ambient 0.5 * diffuse 0.5
        assert!((image.get(4, 4) - Vec3::splat(0.25)).length() < 1e-4);
        // Corner pixel sees the sky
        assert!((image.get(0, 0) - sky).length() < 1e-4);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let mut image = ImageBuffer::new(4, 2);
        image.set(1, 1, Vec3::new(1.0, 0.0, 0.0));
        image.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (4, 2));
        assert_eq!(loaded.get_pixel(1, 1).0, [255, 0, 0, 255]);
    }
}
