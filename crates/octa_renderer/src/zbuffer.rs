//! Per-sample depth buffer used to pick the nearest primitive.
//!
//! Every candidate hit for a sample coordinate goes through
//! [`ZBuffer::test_and_update`]; a hit wins only if it is strictly nearer
//! than anything recorded before it in the same slot. Depths only ever
//! decrease during a render.

/// Maps a continuous image coordinate to a sample slot.
pub type SampleIndexFn = fn(f32, f32) -> usize;

pub struct ZBuffer {
    /// Top-left pixel of the covered region
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    /// One depth array per sample slot
    depths: Vec<Vec<f32>>,
    sample_index: SampleIndexFn,
}

impl ZBuffer {
    /// Depth buffer covering a whole image.
    pub fn new(width: u32, height: u32, num_samples: usize, sample_index: SampleIndexFn) -> Self {
        Self::for_region(0, 0, width, height, num_samples, sample_index)
    }

    /// Depth buffer covering only the pixels of one image region.
    ///
    /// Coordinates passed to the buffer stay in whole-image space.
    pub fn for_region(
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        num_samples: usize,
        sample_index: SampleIndexFn,
    ) -> Self {
        let len = width as usize * height as usize;
        Self {
            x,
            y,
            width,
            height,
            depths: vec![vec![f32::MAX; len]; num_samples],
            sample_index,
        }
    }

    pub fn num_samples(&self) -> usize {
        self.depths.len()
    }

    fn slot(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let local_x = x - self.x as f32;
        let local_y = y - self.y as f32;
        if local_x < 0.0
            || local_y < 0.0
            || local_x >= self.width as f32
            || local_y >= self.height as f32
        {
            return None;
        }

        let index = (self.sample_index)(x, y);
        if index >= self.depths.len() {
            return None;
        }
        let offset = local_y as usize * self.width as usize + local_x as usize;
        Some((index, offset))
    }

    /// Record `value` at the sample coordinate if it is nearer than the
    /// stored depth. Returns whether it was recorded.
    pub fn test_and_update(&mut self, x: f32, y: f32, value: f32) -> bool {
        let Some((index, offset)) = self.slot(x, y) else {
            return false;
        };
        let stored = &mut self.depths[index][offset];
        if value >= *stored {
            return false;
        }
        *stored = value;
        true
    }

    /// Stored depth at the sample coordinate; `f32::MAX` outside the buffer.
    pub fn depth_at(&self, x: f32, y: f32) -> f32 {
        match self.slot(x, y) {
            Some((index, offset)) => self.depths[index][offset],
            None => f32::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(_x: f32, _y: f32) -> usize {
        0
    }

    #[test]
    fn test_initial_depth() {
        let zbuffer = ZBuffer::new(4, 3, 1, single);
        assert_eq!(zbuffer.depth_at(1.5, 1.5), f32::MAX);
        assert_eq!(zbuffer.num_samples(), 1);
    }

    #[test]
    fn test_nearer_hits_win() {
        let mut zbuffer = ZBuffer::new(4, 4, 1, single);

        assert!(zbuffer.test_and_update(2.5, 2.5, 10.0));
        assert!(zbuffer.test_and_update(2.5, 2.5, 4.0));
        // Farther and equal depths are rejected
        assert!(!zbuffer.test_and_update(2.5, 2.5, 7.0));
        assert!(!zbuffer.test_and_update(2.5, 2.5, 4.0));

        assert_eq!(zbuffer.depth_at(2.5, 2.5), 4.0);
        // Other pixels are untouched
        assert_eq!(zbuffer.depth_at(1.5, 2.5), f32::MAX);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut zbuffer = ZBuffer::new(4, 4, 1, single);

        assert!(!zbuffer.test_and_update(-0.5, 1.0, 1.0));
        assert!(!zbuffer.test_and_update(4.0, 1.0, 1.0));
        assert!(!zbuffer.test_and_update(1.0, 4.5, 1.0));
        assert_eq!(zbuffer.depth_at(10.0, 10.0), f32::MAX);
    }

    #[test]
    fn test_sample_slots_are_independent() {
        fn by_half(x: f32, _y: f32) -> usize {
            if x.fract() < 0.5 {
                0
            } else {
                1
            }
        }
        let mut zbuffer = ZBuffer::new(2, 2, 2, by_half);

        assert!(zbuffer.test_and_update(0.25, 0.25, 5.0));
        assert!(zbuffer.test_and_update(0.75, 0.25, 8.0));

        assert_eq!(zbuffer.depth_at(0.25, 0.25), 5.0);
        assert_eq!(zbuffer.depth_at(0.75, 0.25), 8.0);
    }

    #[test]
    fn test_region_buffer() {
        let mut zbuffer = ZBuffer::for_region(64, 32, 16, 16, 1, single);

        assert!(zbuffer.test_and_update(70.5, 40.5, 3.0));
        assert_eq!(zbuffer.depth_at(70.5, 40.5), 3.0);

        // Outside the region
        assert!(!zbuffer.test_and_update(10.5, 40.5, 3.0));
        assert!(!zbuffer.test_and_update(80.5, 40.5, 3.0));
    }
}
