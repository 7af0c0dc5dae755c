//! Heart-shaped clip region shared by the coating and the revealed content.
//!
//! The outline is six cubic segments laid out proportionally to the card
//! size, so the same shape works for every configured width/height. The
//! path is rasterised once into a per-pixel coverage mask; lookups during
//! painting and compositing are then a single index.

use kurbo::{BezPath, Point, Shape};

#[derive(Debug, Clone)]
pub struct Silhouette {
    width: u32,
    height: u32,
    inside: Vec<bool>, // width * height, true where the pixel center is inside the heart
    area: usize,
}

/// Build the heart outline for a `width` x `height` box.
pub fn heart_path(width: f64, height: f64) -> BezPath {
    let (w, h) = (width, height);
    let mut p = BezPath::new();
    p.move_to((w / 2.0, h * 0.92));
    p.curve_to((w * 0.15, h * 0.65), (w * 0.05, h * 0.4), (w * 0.05, h * 0.3));
    p.curve_to((w * 0.05, h * 0.12), (w * 0.2, h * 0.05), (w * 0.35, h * 0.05));
    p.curve_to((w * 0.45, h * 0.05), (w * 0.48, h * 0.12), (w / 2.0, h * 0.2));
    p.curve_to((w * 0.52, h * 0.12), (w * 0.55, h * 0.05), (w * 0.65, h * 0.05));
    p.curve_to((w * 0.8, h * 0.05), (w * 0.95, h * 0.12), (w * 0.95, h * 0.3));
    p.curve_to((w * 0.95, h * 0.4), (w * 0.85, h * 0.65), (w / 2.0, h * 0.92));
    p.close_path();
    p
}

impl Silhouette {
    pub fn heart(width: u32, height: u32) -> Self {
        let path = heart_path(width as f64, height as f64);
        let mut inside = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                inside.push(path.contains(Point::new(x as f64 + 0.5, y as f64 + 0.5)));
            }
        }
        let area = inside.iter().filter(|&&v| v).count();
        Self { width, height, inside, area }
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    /// Number of pixels covered by the shape.
    pub fn area(&self) -> usize { self.area }

    /// True when pixel (x, y) lies inside the shape. Out-of-range pixels are outside.
    #[inline]
    pub fn contains_pixel(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.inside[y as usize * self.width as usize + x as usize]
    }
}
