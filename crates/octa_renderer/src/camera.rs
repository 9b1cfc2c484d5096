//! Camera and primary ray generation.

use octa_math::{Mat3, Ray, Vec2, Vec3};

use crate::options::RenderOptions;
use crate::{RenderError, Result};

/// Eye position and orientation.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Camera {
    pub position: Vec3,
    /// Euler angles in degrees; only pitch (x) and yaw (y) are used
    pub rotation: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn from_options(options: &RenderOptions) -> Self {
        Self::new(options.camera_position, options.camera_rotation_degrees)
    }

    /// Yaw then pitch.
    fn orientation(&self) -> Mat3 {
        Mat3::from_rotation_y(self.rotation.y.to_radians())
            * Mat3::from_rotation_x(self.rotation.x.to_radians())
    }
}

/// Turns continuous image coordinates into world-space rays.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RayCaster {
    width: u32,
    height: u32,
    aspect_ratio: f32,
    /// tan(vfov / 2)
    scale: f32,
}

impl RayCaster {
    /// Fails on a zero image dimension.
    pub fn new(options: &RenderOptions) -> Result<Self> {
        let (width, height) = (options.width, options.height);
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidImageSize { width, height });
        }

        Ok(Self {
            width,
            height,
            aspect_ratio: width as f32 / height as f32,
            scale: (options.camera_vfov_degrees.to_radians() / 2.0).tan(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Ray through image coordinate `(x, y)`, with `(0, 0)` the top-left
    /// pixel and `(w - 1, h - 1)` the bottom-right. The ray remembers the
    /// coordinate as its sample.
    pub fn cast_ray(&self, x: f32, y: f32, camera: &Camera) -> Ray {
        let last_x = (self.width - 1).max(1) as f32;
        let last_y = (self.height - 1).max(1) as f32;

        let ndc_x = 2.0 * x / last_x - 1.0;
        let ndc_y = 2.0 * y / last_y - 1.0;
        let direction = Vec3::new(
            ndc_x * self.scale * self.aspect_ratio,
            -ndc_y * self.scale,
            -1.0,
        );

        Ray::new(
            camera.position,
            camera.orientation() * direction,
            Vec2::new(x, y),
        )
    }
}
