//! Per-pixel sampling strategies.
//!
//! Each strategy decides where inside a pixel rays are cast and how their
//! colours are combined, and owns the mapping from a sample coordinate to a
//! z-buffer slot so the buffer is sized and indexed to match.

use octa_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::zbuffer::{SampleIndexFn, ZBuffer};

/// Sub-pixel offsets for 2x2 super-sampling.
const SUB_PIXEL_BIASES: [f32; 2] = [0.25, 0.75];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntiAliasing {
    /// One ray through the pixel centre
    None,
    /// Four rays on a 2x2 grid, averaged
    #[default]
    SuperSampling,
}

fn single_sample_index(_x: f32, _y: f32) -> usize {
    0
}

fn super_sample_index(x: f32, y: f32) -> usize {
    let fract_x = x - x.trunc();
    let fract_y = y - y.trunc();
    match (fract_x < 0.5, fract_y < 0.5) {
        (true, true) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    }
}

impl AntiAliasing {
    pub fn num_samples(self) -> usize {
        match self {
            AntiAliasing::None => 1,
            AntiAliasing::SuperSampling => SUB_PIXEL_BIASES.len() * SUB_PIXEL_BIASES.len(),
        }
    }

    pub fn sample_index_fn(self) -> SampleIndexFn {
        match self {
            AntiAliasing::None => single_sample_index,
            AntiAliasing::SuperSampling => super_sample_index,
        }
    }

    /// Continuous image coordinates sampled for pixel `(x, y)`, row by row.
    pub fn sample_points(self, x: u32, y: u32) -> Vec<Vec2> {
        let (x, y) = (x as f32, y as f32);
        match self {
            AntiAliasing::None => vec![Vec2::new(x + 0.5, y + 0.5)],
            AntiAliasing::SuperSampling => SUB_PIXEL_BIASES
                .iter()
                .flat_map(|&row| SUB_PIXEL_BIASES.iter().map(move |&col| Vec2::new(x + col, y + row)))
                .collect(),
        }
    }

    /// Colour of pixel `(x, y)`: the equally weighted mean of `trace` over
    /// the strategy's sample points.
    pub fn take_sample(self, x: u32, y: u32, mut trace: impl FnMut(Vec2) -> Vec3) -> Vec3 {
        let points = self.sample_points(x, y);
        let scale = 1.0 / points.len() as f32;
        points.into_iter().map(&mut trace).sum::<Vec3>() * scale
    }

    /// Depth buffer for the whole image, sized for this strategy.
    pub fn zbuffer(self, width: u32, height: u32) -> ZBuffer {
        ZBuffer::new(width, height, self.num_samples(), self.sample_index_fn())
    }

    /// Depth buffer for one image region, sized for this strategy.
    pub fn region_zbuffer(self, x: u32, y: u32, width: u32, height: u32) -> ZBuffer {
        ZBuffer::for_region(x, y, width, height, self.num_samples(), self.sample_index_fn())
    }
}
