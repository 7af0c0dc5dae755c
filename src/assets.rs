// The decorative coating image: loaded off the UI thread, delivered exactly once.
// Visual: the card stays plain until the image arrives, then the gold coating appears.

use crate::error::{Error, Result};
use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Decode an image file into RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .map_err(|e| Error::image_load(format!("{}: {e}", path.display())))?;
    Ok(img.to_rgba8())
}

/// An image on its way. Poll it once per frame; it yields its result exactly once.
pub struct PendingImage {
    rx: Option<Receiver<Result<RgbaImage>>>,
}

impl PendingImage {
    /// Start decoding `path` on a worker thread.
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = load_rgba(&path);
            // Receiver gone means the card was torn down first; nothing to do.
            let _ = tx.send(result);
        });
        Self { rx: Some(rx) }
    }

    /// Already available (e.g. generated in-process). Still delivered through `poll`.
    pub fn ready(image: RgbaImage) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(Ok(image));
        Self { rx: Some(rx) }
    }

    /// Non-blocking. `Some` on the one call where the load finished, `None` otherwise.
    pub fn poll(&mut self) -> Option<Result<RgbaImage>> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.rx = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.rx = None;
                Some(Err(Error::image_load("image loader stopped without a result")))
            }
        }
    }

    /// True once the result has been handed out.
    pub fn is_done(&self) -> bool {
        self.rx.is_none()
    }
}

/// Built-in gold glitter: warm base with scattered bright and dark specks.
/// Visual: a sparkly gold foil texture, used when no image file is configured.
pub fn glitter_image(width: u32, height: u32, seed: u64) -> RgbaImage {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let (w, h) = (width.max(1), height.max(1));
    RgbaImage::from_fn(w, h, |x, y| {
        // Diagonal sheen band across the foil
        let t = (x as f32 / w as f32 + y as f32 / h as f32) * 0.5;
        let band = 0.85 + 0.15 * (t * std::f32::consts::PI * 3.0).sin();
        let grain: f32 = rng.random_range(0.9..1.1);
        let k = (band * grain).clamp(0.0, 1.3);

        let speck: f32 = rng.random();
        let (r, g, b) = if speck > 0.985 {
            (255.0, 248.0, 220.0) // sparkle
        } else if speck < 0.01 {
            (120.0 * k, 90.0 * k, 40.0 * k) // shadowed flake
        } else {
            (212.0 * k, 175.0 * k, 85.0 * k)
        };
        Rgba([
            r.clamp(0.0, 255.0) as u8,
            g.clamp(0.0, 255.0) as u8,
            b.clamp(0.0, 255.0) as u8,
            255,
        ])
    })
}
