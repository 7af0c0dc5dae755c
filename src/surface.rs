//! The reveal surface: owns the coating and turns erase calls into a scratch
//! percentage and a one-shot "revealed" transition.
//!
//! Until the coating is painted every erase is a no-op and the percentage
//! stays at zero, so input that arrives before the decorative image has
//! loaded can never count toward completion.

use crate::coating::CoatingBuffer;
use crate::config::RevealTuning;
use crate::error::Result;
use crate::silhouette::Silhouette;
use crate::types::SurfacePoint;
use image::RgbaImage;

/// Invoked with no arguments, at most once, when the card is revealed.
pub type CompletionCallback = Box<dyn FnMut()>;

/// Result of one erase call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraseOutcome {
    /// Pixels that went from visible to transparent on this call.
    pub cleared: usize,
    /// Scratched share of the coating after this call, in percent.
    pub percent: f32,
    /// True only on the call that crossed the threshold.
    pub revealed_now: bool,
}

pub struct RevealSurface {
    coating: CoatingBuffer,
    silhouette: Silhouette,
    tuning: RevealTuning,
    scratch_percent: f32,
    revealed: bool,
    on_complete: Option<CompletionCallback>,
    coating_opacity: f32, // 1.0 until revealed, then fades to 0.0
}

impl RevealSurface {
    pub fn new(width: u32, height: u32, tuning: RevealTuning) -> Result<Self> {
        Ok(Self {
            coating: CoatingBuffer::new(width, height)?,
            silhouette: Silhouette::heart(width, height),
            tuning,
            scratch_percent: 0.0,
            revealed: false,
            on_complete: None,
            coating_opacity: 1.0,
        })
    }

    /// Register the completion callback. Ignored once the surface is revealed.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        if !self.revealed {
            self.on_complete = Some(Box::new(callback));
        }
    }

    pub fn width(&self) -> u32 { self.coating.width() }
    pub fn height(&self) -> u32 { self.coating.height() }
    pub fn silhouette(&self) -> &Silhouette { &self.silhouette }
    pub fn coating(&self) -> &CoatingBuffer { &self.coating }
    pub fn tuning(&self) -> &RevealTuning { &self.tuning }

    pub fn is_painted(&self) -> bool { self.coating.is_painted() }
    pub fn is_revealed(&self) -> bool { self.revealed }
    pub fn scratch_percent(&self) -> f32 { self.scratch_percent }

    /// Lay down the coating from the decorative image. Only the first paint counts;
    /// repainting would restore scratched pixels.
    pub fn paint(&mut self, decor: &RgbaImage) {
        if self.coating.is_painted() {
            tracing::debug!("coating already painted; ignoring repaint");
            return;
        }
        self.coating.paint(decor, &self.silhouette);
        self.scratch_percent = self.coating.measure_transparent_fraction() * 100.0;
        tracing::info!(
            width = self.width(),
            height = self.height(),
            "scratch coating ready"
        );
    }

    /// Cut a disc of `erase_radius` out of the coating at `at` and re-measure.
    pub fn erase(&mut self, at: SurfacePoint) -> EraseOutcome {
        let cleared = self.coating.erase_circle(at, self.tuning.erase_radius);
        let measured = self.coating.measure_transparent_fraction() * 100.0;
        // The buffer only ever loses alpha, so this is a no-op guard against float noise.
        self.scratch_percent = self.scratch_percent.max(measured);

        let mut revealed_now = false;
        if !self.revealed && self.scratch_percent > self.tuning.threshold_percent {
            self.revealed = true;
            revealed_now = true;
            if self.tuning.fade_frames == 0 {
                self.coating_opacity = 0.0;
            }
            tracing::info!(percent = self.scratch_percent, "card revealed");
            if let Some(mut cb) = self.on_complete.take() {
                cb();
            }
        }

        EraseOutcome { cleared, percent: self.scratch_percent, revealed_now }
    }

    /// Opacity applied to the remaining coating when composing.
    pub fn coating_opacity(&self) -> f32 { self.coating_opacity }

    /// True while the post-reveal fade still has frames to run.
    pub fn is_fading(&self) -> bool {
        self.revealed && self.coating_opacity > 0.0
    }

    /// One frame of the fade. Returns whether more frames are needed.
    pub fn advance_fade(&mut self) -> bool {
        if !self.is_fading() {
            return false;
        }
        let step = 1.0 / self.tuning.fade_frames.max(1) as f32;
        self.coating_opacity = (self.coating_opacity - step).max(0.0);
        self.coating_opacity > 0.0
    }

    /// Whether the "scratch to reveal" prompt should be shown.
    pub fn shows_hint(&self) -> bool {
        !self.revealed && self.scratch_percent < self.tuning.hint_below_percent
    }
}
