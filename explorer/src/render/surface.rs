use image::{Rgba, RgbaImage};
use rayon::prelude::*;

/// Drawing surface for the fog overlay: one solid color with a per-pixel alpha
/// channel. Stored as `f32` so repeated erasures do not accumulate rounding.
#[derive(Debug, Clone)]
pub struct FogSurface {
    width: u32,
    height: u32,
    color: [u8; 3],
    alpha: Vec<f32>,
}

impl FogSurface {
    pub fn new(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            width,
            height,
            color,
            alpha: vec![0.0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Reallocates to the new size; contents are cleared. Returns false when
    /// the size was already current.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.alpha = vec![0.0; width as usize * height as usize];
        true
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.alpha.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Rows of the alpha channel with their y index, for parallel painting.
    pub(crate) fn rows_mut(&mut self) -> impl IndexedParallelIterator<Item = (usize, &mut [f32])> + '_ {
        let width = (self.width as usize).max(1);
        self.alpha.par_chunks_mut(width).enumerate()
    }

    pub fn to_image(&self) -> RgbaImage {
        let [r, g, b] = self.color;
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let alpha = self.alpha_at(x, y).unwrap_or(0.0);
            Rgba([r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8])
        })
    }
}
