//! Surface classifier: colour image → binary track mask.
//!
//! The image is first assigned a [`LightingRegime`] from its brightness
//! statistics. Five independent candidate masks are then computed and
//! combined by a regime-weighted vote:
//!
//! - `range`: HSV value/saturation window derived from the regime,
//! - `otsu`: dark side of the Otsu split of the smoothed CIELAB lightness,
//! - `adaptive`: Gaussian local-mean threshold on lightness,
//! - `texture`: low Sobel gradient magnitude,
//! - `kmeans`: dark, unsaturated colour clusters.
//!
//! When the vote yields a degenerate mask (nearly empty or nearly full) the
//! single-classifier alternates are tried in order before giving up.

pub mod ensemble;
pub mod kmeans;
pub mod regime;
pub mod texture;
pub mod threshold;

pub use ensemble::{vote, Candidates};
pub use kmeans::KMeansParams;
pub use regime::{EnsembleWeights, ImageStats, LightingRegime, RegimeParams, RegimeThresholds};
pub use texture::TextureParams;
pub use threshold::{AdaptiveParams, HueBand};

use crate::error::{TrackError, TrackResult};
use crate::filters::{self, GaussianKernel};
use crate::image::{ColorImage, HsvPlanes, ImageF32, ImageU8, Mask};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// How the track mask is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierMethod {
    Ensemble,
    Range,
    Otsu,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    pub method: ClassifierMethod,
    /// Tried in order when `method` yields a degenerate mask.
    pub alternates: Vec<ClassifierMethod>,
    pub regimes: RegimeThresholds,
    pub vote_cutoff: f32,
    pub hue_band: HueBand,
    /// Window of the Gaussian applied to lightness before Otsu and texture.
    pub smoothing_window: usize,
    pub adaptive: AdaptiveParams,
    pub texture: TextureParams,
    pub kmeans: KMeansParams,
    /// Masks covering less than this fraction are degenerate.
    pub min_foreground_fraction: f32,
    /// Masks covering more than this fraction are degenerate.
    pub max_foreground_fraction: f32,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            method: ClassifierMethod::Ensemble,
            alternates: vec![ClassifierMethod::Range, ClassifierMethod::Otsu],
            regimes: RegimeThresholds::default(),
            vote_cutoff: 0.4,
            hue_band: HueBand::default(),
            smoothing_window: 5,
            adaptive: AdaptiveParams::default(),
            texture: TextureParams::default(),
            kmeans: KMeansParams::default(),
            min_foreground_fraction: 0.001,
            max_foreground_fraction: 0.98,
        }
    }
}

/// Result of one classification.
#[derive(Clone, Debug)]
pub struct Classification {
    pub mask: Mask,
    pub method: ClassifierMethod,
    pub stats: ImageStats,
    pub regime: LightingRegime,
    /// Individual votes, only for [`ClassifierMethod::Ensemble`].
    pub candidates: Option<Candidates>,
}

impl Classification {
    pub fn coverage(&self) -> f32 {
        self.mask.coverage()
    }
}

/// Channels shared by all candidate classifiers.
struct Channels {
    width: usize,
    height: usize,
    hsv: HsvPlanes,
    lightness: ImageF32,
    smoothed: ImageF32,
}

#[derive(Clone, Debug, Default)]
pub struct SurfaceClassifier {
    params: ClassifierParams,
}

impl SurfaceClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    /// Classify with the configured method, then the alternates.
    ///
    /// Returns [`TrackError::SegmentationDegenerate`] when every method
    /// produced a nearly empty or nearly full mask.
    pub fn segment(&self, image: &ColorImage) -> TrackResult<Classification> {
        let channels = self.channels(image);
        let mut last_fraction = 0.0;
        let methods = std::iter::once(self.params.method).chain(
            self.params
                .alternates
                .iter()
                .copied()
                .filter(|&m| m != self.params.method),
        );
        for method in methods {
            let result = self.classify_channels(image, &channels, method);
            let fraction = result.coverage();
            if !self.is_degenerate(fraction) {
                debug!(
                    "SurfaceClassifier::segment method={:?} regime={} coverage={:.3}",
                    method,
                    result.regime.name(),
                    fraction
                );
                return Ok(result);
            }
            warn!(
                "SurfaceClassifier::segment method={:?} degenerate (coverage {:.5})",
                method, fraction
            );
            last_fraction = fraction;
        }
        Err(TrackError::SegmentationDegenerate {
            foreground_fraction: last_fraction,
        })
    }

    /// Run a single method. Degenerate images produce an all-zero mask.
    pub fn classify(&self, image: &ColorImage, method: ClassifierMethod) -> Classification {
        let channels = self.channels(image);
        self.classify_channels(image, &channels, method)
    }

    fn is_degenerate(&self, fraction: f32) -> bool {
        fraction < self.params.min_foreground_fraction || fraction > self.params.max_foreground_fraction
    }

    fn channels(&self, image: &ColorImage) -> Channels {
        let (width, height) = (image.width(), image.height());
        let lab = image.to_lab_lightness();
        let lightness = ImageF32::from_u8(&ImageU8::packed(width, height, &lab));
        let smoothed = filters::apply(&GaussianKernel::for_window(self.params.smoothing_window), &lightness);
        Channels {
            width,
            height,
            hsv: image.to_hsv(),
            lightness,
            smoothed,
        }
    }

    fn classify_channels(&self, image: &ColorImage, ch: &Channels, method: ClassifierMethod) -> Classification {
        let p = &self.params;
        let lab = ch.lightness.to_u8_clamped();
        let stats = ImageStats::compute(&ch.hsv.value, &lab);
        let regime = LightingRegime::select(&stats, &p.regimes);
        let rp = regime.params();

        let range = || threshold::range_mask(&ch.hsv, ch.width, ch.height, rp, p.hue_band);
        let (mask, candidates) = match method {
            ClassifierMethod::Range => (range(), None),
            ClassifierMethod::Otsu => (threshold::otsu_mask(&ch.smoothed), None),
            ClassifierMethod::Ensemble => {
                let candidates = Candidates {
                    range: range(),
                    otsu: threshold::otsu_mask(&ch.smoothed),
                    adaptive: threshold::adaptive_mask(&ch.lightness, &p.adaptive),
                    texture: texture::texture_mask(&ch.smoothed, &p.texture),
                    kmeans: kmeans::kmeans_mask(image, &p.kmeans),
                };
                for (name, m) in candidates.iter() {
                    debug!("SurfaceClassifier candidate {name}: coverage={:.3}", m.coverage());
                }
                (vote(&candidates, &rp.weights, p.vote_cutoff), Some(candidates))
            }
        };

        Classification {
            mask,
            method,
            stats,
            regime,
            candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_band_on_white() -> ColorImage {
        let mut img = ColorImage::filled(60, 40, [250, 250, 250]);
        for y in 12..28 {
            for x in 0..60 {
                img.put_pixel(x, y, [45, 45, 50]);
            }
        }
        img
    }

    #[test]
    fn ensemble_finds_dark_band() {
        let classifier = SurfaceClassifier::default();
        let result = classifier.segment(&dark_band_on_white()).unwrap();
        assert_eq!(result.method, ClassifierMethod::Ensemble);
        assert_eq!(result.regime.name(), "bright");
        assert!(result.mask.get(30, 20));
        assert!(!result.mask.get(30, 3));
    }

    #[test]
    fn blank_image_is_degenerate() {
        let classifier = SurfaceClassifier::default();
        let img = ColorImage::filled(32, 32, [255, 255, 255]);
        assert!(classifier.classify(&img, ClassifierMethod::Ensemble).mask.is_empty());
        assert!(matches!(
            classifier.segment(&img),
            Err(TrackError::SegmentationDegenerate { .. })
        ));
    }
}
