//! Image statistics and lighting-regime selection.
use crate::image::color::{channel_stats, percentile_u8};
use serde::{Deserialize, Serialize};

/// Global brightness statistics of an image.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub value_mean: f32,
    pub value_std: f32,
    pub lightness_mean: f32,
    pub lightness_std: f32,
    /// 30th percentile of HSV value.
    pub dark_threshold: f32,
    /// 70th percentile of HSV value.
    pub bright_threshold: f32,
}

impl ImageStats {
    pub fn compute(value: &[u8], lightness: &[u8]) -> Self {
        let v = channel_stats(value);
        let l = channel_stats(lightness);
        Self {
            value_mean: v.mean,
            value_std: v.std,
            lightness_mean: l.mean,
            lightness_std: l.std,
            dark_threshold: percentile_u8(value, 30.0),
            bright_threshold: percentile_u8(value, 70.0),
        }
    }
}

/// Relative weight of each candidate classifier in the vote.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleWeights {
    pub range: f32,
    pub otsu: f32,
    pub adaptive: f32,
    pub texture: f32,
    pub kmeans: f32,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl EnsembleWeights {
    pub const DARK: Self = Self {
        range: 0.1,
        otsu: 0.25,
        adaptive: 0.35,
        texture: 0.1,
        kmeans: 0.2,
    };
    pub const STANDARD: Self = Self {
        range: 0.15,
        otsu: 0.3,
        adaptive: 0.2,
        texture: 0.1,
        kmeans: 0.25,
    };
    pub const BRIGHT: Self = Self {
        range: 0.15,
        otsu: 0.35,
        adaptive: 0.1,
        texture: 0.1,
        kmeans: 0.3,
    };

    /// Weights scaled to sum to one; all-zero weights become uniform.
    pub fn normalized(&self) -> Self {
        let total = self.range + self.otsu + self.adaptive + self.texture + self.kmeans;
        if total <= 0.0 || !total.is_finite() {
            return Self {
                range: 0.2,
                otsu: 0.2,
                adaptive: 0.2,
                texture: 0.2,
                kmeans: 0.2,
            };
        }
        Self {
            range: self.range / total,
            otsu: self.otsu / total,
            adaptive: self.adaptive / total,
            texture: self.texture / total,
            kmeans: self.kmeans / total,
        }
    }
}

/// Cut points on the mean HSV value that select the regime.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeThresholds {
    pub very_dark_below: f32,
    pub dark_below: f32,
    pub bright_above: f32,
    pub dark_weights: EnsembleWeights,
    pub standard_weights: EnsembleWeights,
    pub bright_weights: EnsembleWeights,
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            very_dark_below: 80.0,
            dark_below: 120.0,
            bright_above: 160.0,
            dark_weights: EnsembleWeights::DARK,
            standard_weights: EnsembleWeights::STANDARD,
            bright_weights: EnsembleWeights::BRIGHT,
        }
    }
}

/// Parameters derived for one regime.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeParams {
    pub upper_value: f32,
    pub lower_value: f32,
    pub saturation_cap: f32,
    pub brightness_factor: f32,
    pub weights: EnsembleWeights,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "params", rename_all = "camelCase")]
pub enum LightingRegime {
    VeryDark(RegimeParams),
    Dark(RegimeParams),
    Standard(RegimeParams),
    Bright(RegimeParams),
}

impl LightingRegime {
    pub fn select(stats: &ImageStats, thresholds: &RegimeThresholds) -> Self {
        let mean = stats.value_mean;
        let std = stats.value_std;
        let dark = |upper: f32, factor: f32, weights: EnsembleWeights| RegimeParams {
            upper_value: upper,
            lower_value: 0.0,
            saturation_cap: 150.0,
            brightness_factor: factor,
            weights,
        };
        if mean < thresholds.very_dark_below {
            Self::VeryDark(dark(
                (stats.dark_threshold + 2.0 * std).min(60.0),
                1.4,
                thresholds.dark_weights,
            ))
        } else if mean < thresholds.dark_below {
            Self::Dark(dark(
                (stats.dark_threshold + 1.8 * std).min(100.0),
                1.2,
                thresholds.dark_weights,
            ))
        } else if mean > thresholds.bright_above {
            Self::Bright(RegimeParams {
                upper_value: (stats.bright_threshold - 0.5 * std).min(180.0),
                lower_value: (stats.dark_threshold - 20.0).max(20.0),
                saturation_cap: 120.0,
                brightness_factor: 0.8,
                weights: thresholds.bright_weights,
            })
        } else {
            Self::Standard(dark(
                (stats.dark_threshold + 2.5 * std).min(110.0),
                1.0,
                thresholds.standard_weights,
            ))
        }
    }

    pub fn params(&self) -> &RegimeParams {
        match self {
            Self::VeryDark(p) | Self::Dark(p) | Self::Standard(p) | Self::Bright(p) => p,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::VeryDark(_) => "very_dark",
            Self::Dark(_) => "dark",
            Self::Standard(_) => "standard",
            Self::Bright(_) => "bright",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: f32, std: f32, dark: f32, bright: f32) -> ImageStats {
        ImageStats {
            value_mean: mean,
            value_std: std,
            dark_threshold: dark,
            bright_threshold: bright,
            ..Default::default()
        }
    }

    #[test]
    fn regime_cut_points() {
        let t = RegimeThresholds::default();
        let very_dark = LightingRegime::select(&stats(50.0, 10.0, 30.0, 70.0), &t);
        assert_eq!(very_dark.name(), "very_dark");
        assert_eq!(very_dark.params().upper_value, 50.0);

        let dark = LightingRegime::select(&stats(100.0, 40.0, 60.0, 140.0), &t);
        assert_eq!(dark.name(), "dark");
        assert_eq!(dark.params().upper_value, 100.0);

        let standard = LightingRegime::select(&stats(140.0, 10.0, 70.0, 200.0), &t);
        assert_eq!(standard.name(), "standard");
        assert_eq!(standard.params().upper_value, 95.0);

        let bright = LightingRegime::select(&stats(200.0, 40.0, 150.0, 230.0), &t);
        assert_eq!(bright.name(), "bright");
        assert_eq!(bright.params().upper_value, 180.0);
        assert_eq!(bright.params().lower_value, 130.0);
    }

    #[test]
    fn bright_lower_bound_follows_dark_percentile() {
        let t = RegimeThresholds::default();
        let floor = LightingRegime::select(&stats(170.0, 30.0, 25.0, 220.0), &t);
        assert_eq!(floor.name(), "bright");
        assert_eq!(floor.params().lower_value, 20.0);

        let raised = LightingRegime::select(&stats(170.0, 30.0, 90.0, 220.0), &t);
        assert_eq!(raised.params().lower_value, 70.0);
    }

    #[test]
    fn weights_normalize() {
        let w = EnsembleWeights {
            range: 1.0,
            otsu: 1.0,
            adaptive: 0.0,
            texture: 0.0,
            kmeans: 2.0,
        }
        .normalized();
        assert!((w.kmeans - 0.5).abs() < 1e-6);
        assert!((w.range + w.otsu + w.kmeans - 1.0).abs() < 1e-6);
    }
}
