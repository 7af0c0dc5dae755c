// Gamma-correct alpha compositing with table lookups instead of powf.
// Visual: coating edges and the reveal fade blend without dark fringes.

use crate::types::{rgb, unpack_rgb};

/// Linear-light quantization steps for the reverse table.
const LINEAR_STEPS: usize = 4096;

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1)
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255), index = (linear * (LINEAR_STEPS - 1)).round()
    linear_to_srgb: [u8; LINEAR_STEPS],
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaLut {
    /// Build both tables once at startup.
    pub fn new() -> Self {
        let srgb_to_linear = std::array::from_fn(|v| {
            let c = v as f32 / 255.0;
            if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
        });
        let linear_to_srgb = std::array::from_fn(|i| {
            let l = i as f32 / (LINEAR_STEPS - 1) as f32;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            (s * 255.0).round().clamp(0.0, 255.0) as u8
        });
        Self { srgb_to_linear, linear_to_srgb }
    }

    #[inline]
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * (LINEAR_STEPS - 1) as f32).round() as usize;
        self.linear_to_srgb[idx]
    }

    /// Source-over: `src` (RGB) at coverage `alpha` onto `dst` (0x00RRGGBB).
    /// Visual: alpha 1 paints the source, alpha 0 leaves the pixel alone.
    #[inline]
    pub fn over(&self, dst: u32, src: (u8, u8, u8), alpha: f32) -> u32 {
        if alpha <= 0.0 { return dst; }
        if alpha >= 1.0 { return rgb(src.0, src.1, src.2); }
        let (dr, dg, db) = unpack_rgb(dst);
        let inv = 1.0 - alpha;
        let mix = |s: u8, d: u8| {
            self.linear_to_srgb_u8(alpha * self.srgb_u8_to_linear(s) + inv * self.srgb_u8_to_linear(d))
        };
        rgb(mix(src.0, dr), mix(src.1, dg), mix(src.2, db))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_round_trip_every_byte() {
        let lut = GammaLut::new();
        for v in 0..=255u8 {
            assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(v)), v);
        }
    }

    #[test]
    fn over_respects_extremes() {
        let lut = GammaLut::new();
        assert_eq!(lut.over(0x00_10_20_30, (200, 100, 50), 0.0), 0x00_10_20_30);
        assert_eq!(lut.over(0x00_10_20_30, (200, 100, 50), 1.0), 0x00_C8_64_32);
    }

    #[test]
    fn half_blend_is_brighter_than_naive_average() {
        // Black over white at 50%: linear-light mid-gray is ~188 in sRGB, not 128.
        let lut = GammaLut::new();
        let (r, _, _) = unpack_rgb(lut.over(0x00_FF_FF_FF, (0, 0, 0), 0.5));
        assert!(r > 180 && r < 195, "r = {r}");
    }
}
