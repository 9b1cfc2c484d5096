//! Bucket-based tile rendering for Octa.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon. Each bucket owns a z-buffer
//! covering only its own pixels, so no depth slot is ever shared between
//! threads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use rayon::prelude::*;

use crate::camera::{Camera, RayCaster};
use crate::options::RenderOptions;
use crate::renderer::{Color, ImageBuffer, Progress, RenderContext};
use crate::tracer::RayTracer;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets are rendered from the center outward so the middle of the
/// image finishes first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy the bucket's pixels into their place in `image`.
    pub fn write_to(&self, image: &mut ImageBuffer) {
        let rows = self.pixels.chunks(self.bucket.width.max(1) as usize);
        for (local_y, row) in (0..self.bucket.height).zip(rows) {
            for (local_x, color) in (0..self.bucket.width).zip(row) {
                image.set(self.bucket.x + local_x, self.bucket.y + local_y, *color);
            }
        }
    }
}

/// Render a single bucket with its own region z-buffer.
pub fn render_bucket(bucket: &Bucket, context: &RenderContext) -> BucketResult {
    let mut zbuffer = context
        .anti_aliasing
        .region_zbuffer(bucket.x, bucket.y, bucket.width, bucket.height);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = context.render_pixel(bucket.x + local_x, bucket.y + local_y, &mut zbuffer);
            pixels.push(color);
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Render the whole image in buckets on the rayon thread pool.
pub fn render_parallel(
    tracer: &RayTracer,
    caster: &RayCaster,
    camera: &Camera,
    options: &RenderOptions,
) -> ImageBuffer {
    let context = RenderContext::new(tracer, caster, camera, options);
    let (width, height) = (caster.width(), caster.height());
    let buckets = generate_buckets(width, height, DEFAULT_BUCKET_SIZE);
    let total = u64::from(width) * u64::from(height);
    let progress = Mutex::new(Progress::new(total));
    let done = AtomicU64::new(0);

    log::info!(
        "Rendering {}x{} in {} buckets on {} threads",
        width,
        height,
        buckets.len(),
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, &context);
            let pixels = u64::from(bucket.pixel_count());
            let finished = done.fetch_add(pixels, Ordering::Relaxed) + pixels;
            log::debug!("Bucket {} done ({}/{} pixels)", bucket.index, finished, total);
            if let Ok(mut progress) = progress.lock() {
                progress.update(finished);
            }
            result
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        result.write_to(&mut image);
    }

    if let Ok(progress) = progress.lock() {
        progress.finish();
    }
    image
}
