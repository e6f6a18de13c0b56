//! Edge processing: Sobel gradients and a Canny detector.
//!
//! - Gradient computation returning `gx`, `gy` and magnitude with border
//!   clamping (replicate).
//! - Canny edges: Gaussian smoothing, direction-aligned non-maximum
//!   suppression and two-threshold hysteresis, producing a binary [`Mask`].
//!
//! Used by the texture classifier (gradient magnitude) and by the edge-based
//! boundary fallback (Canny).
//!
//! [`Mask`]: crate::image::Mask

pub mod canny;
pub mod grad;

pub use canny::{canny, non_max_suppression, CannyParams};
pub use grad::{sobel_gradients, Grad};
