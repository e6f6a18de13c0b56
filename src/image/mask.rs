//! Binary track mask.
//!
//! One byte per pixel, canonical values `0` (background) and `255` (track) so
//! the buffer can be written straight to a grayscale PNG. Any non-zero byte
//! reads as track.
use image::{GrayImage, Luma};

pub const MASK_ON: u8 = 255;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Mask {
    /// All-background mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Build from raw bytes, canonicalizing non-zero entries to [`MASK_ON`].
    pub fn from_raw(width: usize, height: usize, mut data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        for v in &mut data {
            if *v != 0 {
                *v = MASK_ON;
            }
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Build by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    mask.data[y * width + x] = MASK_ON;
                }
            }
        }
        mask
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Copy into an `image::GrayImage` for the `imageproc` routines.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Luma([self.data[y as usize * self.width + x as usize]])
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    /// Out-of-range coordinates read as background.
    #[inline]
    pub fn get_signed(&self, x: isize, y: isize) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && self.get(x as usize, y as usize)
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.width + x] = if on { MASK_ON } else { 0 };
    }

    #[inline]
    pub fn is_set_idx(&self, idx: usize) -> bool {
        self.data[idx] != 0
    }

    #[inline]
    pub fn set_idx(&mut self, idx: usize, on: bool) {
        self.data[idx] = if on { MASK_ON } else { 0 };
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// Fraction of pixels marked as track.
    pub fn coverage(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.count() as f32 / self.data.len() as f32
    }

    /// Pixel-wise intersection with a mask of the same size.
    pub fn and(&self, other: &Mask) -> Mask {
        debug_assert_eq!(self.data.len(), other.data.len());
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| if a != 0 && b != 0 { MASK_ON } else { 0 })
            .collect();
        Mask {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Coordinates of all set pixels in row-major order.
    pub fn set_pixels(&self) -> Vec<(usize, usize)> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(|(i, _)| (i % self.width, i / self.width))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_canonicalizes() {
        let mask = Mask::from_raw(2, 2, vec![0, 1, 200, 0]).unwrap();
        assert_eq!(mask.as_raw(), &[0, 255, 255, 0]);
        assert_eq!(mask.count(), 2);
        assert!((mask.coverage() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn signed_access_outside_is_background() {
        let mask = Mask::from_fn(3, 3, |_, _| true);
        assert!(mask.get_signed(0, 0));
        assert!(!mask.get_signed(-1, 0));
        assert!(!mask.get_signed(3, 1));
    }

    #[test]
    fn gray_image_keeps_layout() {
        let mask = Mask::from_fn(3, 2, |x, y| x == 2 && y == 1);
        let gray = mask.to_gray_image();
        assert_eq!(gray.dimensions(), (3, 2));
        assert_eq!(gray.get_pixel(2, 1).0, [MASK_ON]);
        assert_eq!(gray.get_pixel(0, 1).0, [0]);
    }
}
