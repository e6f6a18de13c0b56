//! Owned RGB buffer and the color-space channels the classifier consumes.
//!
//! Conversions follow the 8-bit conventions of common vision libraries:
//! hue is stored as degrees / 2 (0..180), saturation and value as 0..255 and
//! CIELAB lightness is rescaled from 0..100 to 0..255.

/// Owned 8-bit RGB image, row-major, three interleaved channels.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

/// HSV planes of a [`ColorImage`].
#[derive(Clone, Debug)]
pub struct HsvPlanes {
    pub hue: Vec<u8>,
    pub saturation: Vec<u8>,
    pub value: Vec<u8>,
}

/// Mean and (population) standard deviation of a channel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelStats {
    pub mean: f32,
    pub std: f32,
}

impl ColorImage {
    /// Wrap interleaved RGB bytes; `None` when the length does not match.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height * 3).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Expand a single-channel buffer into three equal channels.
    pub fn from_gray(width: usize, height: usize, gray: &[u8]) -> Option<Self> {
        if gray.len() != width * height {
            return None;
        }
        let data = gray.iter().flat_map(|&g| [g, g, g]).collect();
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Uniformly colored image.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let data = std::iter::repeat(rgb)
            .take(width * height)
            .flatten()
            .collect();
        Self {
            width,
            height,
            data,
        }
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

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Iterator over RGB triplets in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Luma with BT.601 weights, rounded.
    pub fn to_gray(&self) -> Vec<u8> {
        self.pixels().map(luma).collect()
    }

    pub fn to_hsv(&self) -> HsvPlanes {
        let n = self.area();
        let mut planes = HsvPlanes {
            hue: Vec::with_capacity(n),
            saturation: Vec::with_capacity(n),
            value: Vec::with_capacity(n),
        };
        for px in self.pixels() {
            let [h, s, v] = rgb_to_hsv(px);
            planes.hue.push(h);
            planes.saturation.push(s);
            planes.value.push(v);
        }
        planes
    }

    /// CIELAB lightness scaled to 0..255.
    pub fn to_lab_lightness(&self) -> Vec<u8> {
        let lut = srgb_linear_lut();
        self.pixels()
            .map(|[r, g, b]| {
                let y = 0.212_671 * lut[r as usize]
                    + 0.715_160 * lut[g as usize]
                    + 0.072_169 * lut[b as usize];
                lightness_u8(y)
            })
            .collect()
    }
}

#[inline]
pub fn luma([r, g, b]: [u8; 3]) -> u8 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// RGB → (hue/2, saturation, value), all in 0..255 (hue in 0..180).
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = v - min;
    let s = if v > 0.0 { 255.0 * delta / v } else { 0.0 };
    let mut h = if delta <= 0.0 {
        0.0
    } else if v == rf {
        60.0 * (gf - bf) / delta
    } else if v == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }
    [
        (h / 2.0).round().min(179.0) as u8,
        s.round().min(255.0) as u8,
        v as u8,
    ]
}

fn srgb_linear_lut() -> [f32; 256] {
    let mut lut = [0.0f32; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let c = i as f32 / 255.0;
        *slot = if c <= 0.040_45 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        };
    }
    lut
}

fn lightness_u8(y: f32) -> u8 {
    let l = if y > 0.008_856 {
        116.0 * y.cbrt() - 16.0
    } else {
        903.3 * y
    };
    (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8
}

/// Mean and population standard deviation of an 8-bit channel.
pub fn channel_stats(values: &[u8]) -> ChannelStats {
    if values.is_empty() {
        return ChannelStats::default();
    }
    let n = values.len() as f64;
    let (sum, sum_sq) = values.iter().fold((0.0f64, 0.0f64), |(s, sq), &v| {
        let v = v as f64;
        (s + v, sq + v * v)
    });
    let mean = sum / n;
    let var = (sum_sq / n - mean * mean).max(0.0);
    ChannelStats {
        mean: mean as f32,
        std: var.sqrt() as f32,
    }
}

/// 256-bin histogram of an 8-bit channel.
pub fn histogram(values: &[u8]) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for &v in values {
        hist[v as usize] += 1;
    }
    hist
}

/// Nearest-rank percentile (`p` in 0..=100) of an 8-bit channel.
pub fn percentile_u8(values: &[u8], p: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let hist = histogram(values);
    let rank = ((p.clamp(0.0, 100.0) / 100.0) * values.len() as f32).ceil() as u64;
    let rank = rank.max(1);
    let mut acc = 0u64;
    for (v, &count) in hist.iter().enumerate() {
        acc += count;
        if acc >= rank {
            return v as f32;
        }
    }
    255.0
}
