// Core types shared by the card, the coating, and the window.

/// What the window shows: one u32 per pixel, 0x00RRGGBB for minifb.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Paint every pixel with one color.
    /// Visual: the whole window turns that color (used as the page background).
    pub fn fill(&mut self, color: u32) {
        for p in &mut self.pixels { *p = color; }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 { return None; }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height { return None; }
        Some(self.pixels[y * self.width + x])
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 { return; }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height { return; }
        self.pixels[y * self.width + x] = color;
    }
}

/// A point in surface-local backing-buffer pixels (already scaled from client space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub x: f32,
    pub y: f32,
}

impl SurfacePoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pack 8-bit channels into 0x00RRGGBB.
#[inline]
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split 0x00RRGGBB into channels.
#[inline]
pub fn unpack_rgb(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.set(-1, 0, 0xFF);
        fb.set(4, 0, 0xFF);
        fb.set(0, 3, 0xFF);
        assert!(fb.pixels.iter().all(|&p| p == 0));
        assert_eq!(fb.get(9, 9), None);

        fb.set(3, 2, 0x123456);
        assert_eq!(fb.get(3, 2), Some(0x123456));
    }

    #[test]
    fn rgb_packing_matches_minifb_layout() {
        assert_eq!(rgb(0x12, 0x34, 0x56), 0x0012_3456);
        assert_eq!(unpack_rgb(0x00AB_CDEF), (0xAB, 0xCD, 0xEF));
    }
}
