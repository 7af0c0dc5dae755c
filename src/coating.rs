// The erasable coating: an owned RGBA buffer that the pointer scratches away.
// Visual outcomes:
// - After `paint`, a gold glitter heart sits on top of the card, fully opaque.
// - Every `erase_circle` punches a hard-edged transparent disc into it.
// - `measure_transparent_fraction` reads the alpha channel back to tell how much is gone.

use crate::error::{Error, Result};
use crate::silhouette::Silhouette;
use crate::types::SurfacePoint;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// How much bigger than the card the decorative image is drawn (centered),
/// so the silhouette edge never lands on a transparent image border.
pub const IMAGE_OVERSCAN: f32 = 1.2;

/// Highlight gradient stops (offset, white alpha) from the top-left corner
/// towards the card center. Gives the coating a raised, embossed look.
const HIGHLIGHT_STOPS: [(f32, f32); 3] = [(0.0, 0.15), (0.5, 0.05), (1.0, 0.0)];

/// Base color under the decorative image; translucent image pixels land on this.
pub const COATING_BASE: [u8; 3] = [0xC9, 0xA2, 0x4B];

pub struct CoatingBuffer {
    pixels: RgbaImage,   // straight (non-premultiplied) RGBA
    coated: Vec<bool>,   // which pixels were painted opaque by `paint`
    coated_total: usize, // number of `true` entries in `coated`
}

impl CoatingBuffer {
    /// Create an empty (fully transparent, unpainted) buffer.
    /// Visual: nothing covers the card yet.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels: RgbaImage::new(width, height),
            coated: vec![false; (width as usize) * (height as usize)],
            coated_total: 0,
        })
    }

    pub fn width(&self) -> u32 { self.pixels.width() }
    pub fn height(&self) -> u32 { self.pixels.height() }

    /// True once `paint` has laid down the coating.
    pub fn is_painted(&self) -> bool { self.coated_total > 0 }

    /// Paint the opaque coating inside `silhouette` from `decor`.
    /// Visual: the glitter image appears, scaled 120% and centered, clipped to the heart,
    /// with a soft white sheen fading from the top-left.
    pub fn paint(&mut self, decor: &RgbaImage, silhouette: &Silhouette) {
        let (w, h) = (self.width(), self.height());
        let sw = ((w as f32) * IMAGE_OVERSCAN).round().max(1.0) as u32;
        let sh = ((h as f32) * IMAGE_OVERSCAN).round().max(1.0) as u32;
        let scaled = imageops::resize(decor, sw, sh, FilterType::Triangle);
        let ox = (sw - w) / 2;
        let oy = (sh - h) / 2;

        // Gradient axis: (0,0) -> (w/2, h/2)
        let (gx, gy) = (w as f32 * 0.5, h as f32 * 0.5);
        let glen2 = (gx * gx + gy * gy).max(1.0);

        let mut total = 0;
        for y in 0..h {
            for x in 0..w {
                let idx = y as usize * w as usize + x as usize;
                if !silhouette.contains_pixel(x as i32, y as i32) {
                    self.pixels.put_pixel(x, y, Rgba([0, 0, 0, 0]));
                    self.coated[idx] = false;
                    continue;
                }

                // Image over the base color, then forced opaque
                let src = scaled.get_pixel(x + ox, y + oy).0;
                let a = src[3] as f32 / 255.0;
                let mut rgb = [0f32; 3];
                for c in 0..3 {
                    rgb[c] = src[c] as f32 * a + COATING_BASE[c] as f32 * (1.0 - a);
                }

                // Sheen
                let t = (((x as f32 + 0.5) * gx + (y as f32 + 0.5) * gy) / glen2).clamp(0.0, 1.0);
                let sheen = highlight_alpha(t);
                for v in &mut rgb {
                    *v = *v * (1.0 - sheen) + 255.0 * sheen;
                }

                self.pixels.put_pixel(
                    x,
                    y,
                    Rgba([
                        rgb[0].round().clamp(0.0, 255.0) as u8,
                        rgb[1].round().clamp(0.0, 255.0) as u8,
                        rgb[2].round().clamp(0.0, 255.0) as u8,
                        255,
                    ]),
                );
                self.coated[idx] = true;
                total += 1;
            }
        }
        self.coated_total = total;
        tracing::debug!(width = w, height = h, coated = total, "coating painted");
    }

    /// Make every pixel whose center lies within `radius` of `center` fully transparent.
    /// Pixels outside the disc (and outside the buffer) are untouched.
    /// Returns how many pixels changed; a second call at the same spot returns 0.
    pub fn erase_circle(&mut self, center: SurfacePoint, radius: f32) -> usize {
        if radius <= 0.0 || !center.x.is_finite() || !center.y.is_finite() {
            return 0;
        }
        let (w, h) = (self.width() as i64, self.height() as i64);
        let r2 = radius * radius;

        // Scan just the bounding box, clamped to the buffer
        let x0 = ((center.x - radius).floor() as i64).max(0);
        let x1 = ((center.x + radius).ceil() as i64).min(w - 1);
        let y0 = ((center.y - radius).floor() as i64).max(0);
        let y1 = ((center.y + radius).ceil() as i64).min(h - 1);

        let mut changed = 0;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy > r2 { continue; }
                let px = self.pixels.get_pixel_mut(x as u32, y as u32);
                if px.0[3] != 0 {
                    *px = Rgba([0, 0, 0, 0]);
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Fraction (0.0..=1.0) of the painted coating whose alpha is exactly zero.
    /// Read straight from the pixel buffer on every call. An unpainted buffer reports 0.
    pub fn measure_transparent_fraction(&self) -> f32 {
        if self.coated_total == 0 {
            return 0.0;
        }
        let cleared = self
            .pixels
            .pixels()
            .zip(&self.coated)
            .filter(|(px, coated)| **coated && px.0[3] == 0)
            .count();
        cleared as f32 / self.coated_total as f32
    }

    /// RGBA at (x, y); transparent outside the buffer.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> [u8; 4] {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return [0, 0, 0, 0];
        }
        self.pixels.get_pixel(x as u32, y as u32).0
    }
}

fn highlight_alpha(t: f32) -> f32 {
    for pair in HIGHLIGHT_STOPS.windows(2) {
        let (t0, a0) = pair[0];
        let (t1, a1) = pair[1];
        if t <= t1 {
            let k = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            return a0 + (a1 - a0) * k;
        }
    }
    HIGHLIGHT_STOPS[HIGHLIGHT_STOPS.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted(w: u32, h: u32) -> (CoatingBuffer, Silhouette) {
        let sil = Silhouette::heart(w, h);
        let mut c = CoatingBuffer::new(w, h).unwrap();
        c.paint(&RgbaImage::from_pixel(8, 8, Rgba([200, 160, 60, 255])), &sil);
        (c, sil)
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            CoatingBuffer::new(0, 10),
            Err(Error::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn painted_coating_is_opaque_exactly_inside_the_heart() {
        let (c, sil) = painted(120, 110);
        assert!(c.is_painted());
        for y in 0..110 {
            for x in 0..120 {
                let a = c.pixel(x, y)[3];
                if sil.contains_pixel(x, y) { assert_eq!(a, 255); } else { assert_eq!(a, 0); }
            }
        }
        assert_eq!(c.measure_transparent_fraction(), 0.0);
    }

    #[test]
    fn translucent_decor_still_paints_opaque() {
        let sil = Silhouette::heart(60, 60);
        let mut c = CoatingBuffer::new(60, 60).unwrap();
        c.paint(&RgbaImage::new(4, 4), &sil);
        let px = c.pixel(30, 30);
        assert_eq!(px[3], 255);
        assert_ne!([px[0], px[1], px[2]], [0, 0, 0]);
    }

    #[test]
    fn erase_is_idempotent() {
        let (mut c, _) = painted(120, 110);
        let p = SurfacePoint::new(60.0, 55.0);
        let first = c.erase_circle(p, 10.0);
        let f1 = c.measure_transparent_fraction();
        assert!(first > 0);
        assert_eq!(c.erase_circle(p, 10.0), 0);
        assert_eq!(c.measure_transparent_fraction(), f1);
    }

    #[test]
    fn erase_clears_a_disc_and_leaves_the_rest() {
        let (mut c, _) = painted(120, 110);
        c.erase_circle(SurfacePoint::new(60.0, 60.0), 5.0);
        assert_eq!(c.pixel(60, 60)[3], 0);
        assert_eq!(c.pixel(63, 60)[3], 0);
        assert_eq!(c.pixel(60, 70)[3], 255);
    }

    #[test]
    fn erase_outside_the_buffer_is_harmless() {
        let (mut c, _) = painted(50, 50);
        assert_eq!(c.erase_circle(SurfacePoint::new(-100.0, -100.0), 22.0), 0);
        assert_eq!(c.erase_circle(SurfacePoint::new(f32::NAN, 3.0), 22.0), 0);
        // Partially overlapping the edge clips cleanly
        c.erase_circle(SurfacePoint::new(-5.0, 25.0), 22.0);
        assert!(c.measure_transparent_fraction() > 0.0);
    }

    #[test]
    fn unpainted_buffer_measures_zero_even_after_erase() {
        let mut c = CoatingBuffer::new(40, 40).unwrap();
        assert_eq!(c.erase_circle(SurfacePoint::new(20.0, 20.0), 22.0), 0);
        assert_eq!(c.measure_transparent_fraction(), 0.0);
        assert!(!c.is_painted());
    }

    #[test]
    fn erasing_everything_reaches_one() {
        let (mut c, _) = painted(40, 40);
        c.erase_circle(SurfacePoint::new(20.0, 20.0), 100.0);
        assert_eq!(c.measure_transparent_fraction(), 1.0);
    }

    #[test]
    fn highlight_fades_along_the_axis() {
        assert!((highlight_alpha(0.0) - 0.15).abs() < 1e-6);
        assert!((highlight_alpha(0.5) - 0.05).abs() < 1e-6);
        assert_eq!(highlight_alpha(1.0), 0.0);
        assert!(highlight_alpha(0.25) < 0.15 && highlight_alpha(0.25) > 0.05);
    }
}
