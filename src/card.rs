//! The scratch card: one parameterised component tying the reveal surface,
//! the gesture tracker, the glitter simulator and the frame loop together.
//!
//! Input flows `handle_event` -> gesture -> erase + spawn. Time flows
//! `on_frame` -> (image delivery, glitter step, reveal fade). Drawing is a
//! separate, read-only `render` pass into the page framebuffer.

use crate::assets::{glitter_image, PendingImage};
use crate::coating::COATING_BASE;
use crate::config::CardConfig;
use crate::draw::{draw_text_centered, draw_text_centered_clipped};
use crate::error::Result;
use crate::gamma::GammaLut;
use crate::gesture::{GestureOutcome, GestureTracker, PointerEvent, SurfaceGeometry};
use crate::particles::{Particle, ParticleSimulator};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::surface::RevealSurface;
use crate::types::{unpack_rgb, FrameBuffer};

/// Offset and opacity of the drop shadow under the coating.
const COATING_SHADOW: (i32, i32, f32) = (4, 6, 0.3);
/// Soft gray layers behind the white heart, (dx, dy, gray, opacity).
const HEART_SHADOWS: [(i32, i32, u8, f32); 2] = [(8, 12, 0xA0, 0.3), (4, 6, 0xC0, 0.4)];
/// Vertical gap between message lines, in pixels.
const LINE_GAP: i32 = 5;

pub struct ScratchCard {
    config: CardConfig,
    surface: RevealSurface,
    particles: ParticleSimulator,
    gesture: GestureTracker,
    frames: FrameScheduler,
    frame: Option<FrameHandle>,
    geometry: SurfaceGeometry,
    image: Option<PendingImage>,
    lut: GammaLut,
    mounted: bool,
}

impl ScratchCard {
    /// Mount a card at (0, 0). The coating image starts loading right away;
    /// input is accepted immediately but erases nothing until it has painted.
    pub fn new(config: CardConfig) -> Result<Self> {
        Self::with_seed(config, rand::random())
    }

    /// Like `new`, with deterministic glitter (particles and built-in coating).
    pub fn with_seed(config: CardConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let (w, h) = (config.width, config.height);
        let image = match &config.image {
            Some(path) => PendingImage::spawn(path.clone()),
            None => PendingImage::ready(glitter_image(w, h, seed)),
        };
        tracing::debug!(width = w, height = h, image = ?config.image, "scratch card mounted");
        Ok(Self {
            surface: RevealSurface::new(w, h, config.reveal.clone())?,
            particles: ParticleSimulator::with_seed(config.particles.clone(), seed),
            gesture: GestureTracker::new(),
            frames: FrameScheduler::new(),
            frame: None,
            geometry: SurfaceGeometry::unscaled(0.0, 0.0, w, h),
            image: Some(image),
            lut: GammaLut::new(),
            mounted: true,
            config,
        })
    }

    /// Completion callback: called once, with no arguments, when the card is revealed.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.surface.on_complete(callback);
    }

    /// Where the card sits in client space and how large it is displayed.
    pub fn set_geometry(&mut self, geometry: SurfaceGeometry) {
        self.geometry = geometry;
    }

    pub fn geometry(&self) -> &SurfaceGeometry { &self.geometry }
    pub fn config(&self) -> &CardConfig { &self.config }
    pub fn surface(&self) -> &RevealSurface { &self.surface }
    pub fn particles(&self) -> &[Particle] { self.particles.particles() }
    pub fn scratch_percent(&self) -> f32 { self.surface.scratch_percent() }
    pub fn is_revealed(&self) -> bool { self.surface.is_revealed() }
    pub fn is_mounted(&self) -> bool { self.mounted }

    /// Whether the per-frame task is currently armed.
    pub fn frame_loop_active(&self) -> bool { self.frames.is_active() }

    /// Route one pointer/touch event. Each erase also throws a glitter batch.
    pub fn handle_event(&mut self, event: &PointerEvent) -> GestureOutcome {
        if !self.mounted {
            return GestureOutcome::default();
        }
        let outcome = self.gesture.handle(event, &self.geometry);
        if let Some(at) = outcome.erase_at {
            let erased = self.surface.erase(at);
            self.particles.spawn(at);
            tracing::trace!(x = at.x, y = at.y, percent = erased.percent, "scratch");
            if !self.particles.is_empty() || self.surface.is_fading() {
                self.frame = Some(self.frames.start());
            }
        }
        outcome
    }

    /// Call once per display refresh. Delivers the coating image when it lands and,
    /// while the frame task is armed, steps the glitter and the reveal fade.
    /// Returns whether the frame task is still armed.
    pub fn on_frame(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        self.poll_image();

        if !self.frame.is_some_and(|h| self.frames.owns(h)) {
            return false;
        }
        if !self.particles.is_empty() {
            self.particles.advance();
        }
        self.surface.advance_fade();
        if self.particles.is_empty() && !self.surface.is_fading() {
            self.frames.cancel();
            self.frame = None;
        }
        self.frames.is_active()
    }

    fn poll_image(&mut self) {
        let Some(pending) = self.image.as_mut() else { return };
        match pending.poll() {
            None => {}
            Some(Ok(decor)) => {
                self.surface.paint(&decor);
                self.image = None;
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "coating image failed to load; card stays sealed");
                self.image = None;
            }
        }
    }

    /// Tear down: release the frame task, drop in-flight glitter and input state.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.frames.cancel();
        self.frame = None;
        self.particles.clear();
        self.gesture.reset();
        self.image = None;
        self.mounted = false;
        tracing::debug!("scratch card unmounted");
    }

    /// Draw the card into `fb` at its geometry's (left, top).
    /// Visual: white heart with the message, the gold coating over it (minus the
    /// scratched holes), glitter on top, and the hint underneath.
    pub fn render(&self, fb: &mut FrameBuffer) {
        let ox = self.geometry.left.round() as i32;
        let oy = self.geometry.top.round() as i32;
        self.render_content(fb, ox, oy);
        self.render_coating(fb, ox, oy);
        self.particles.render(fb, ox, oy);

        if self.surface.shows_hint() {
            let cx = ox + self.config.width as i32 / 2;
            let y = oy + self.config.height as i32 + 14;
            draw_text_centered(fb, cx, y, &self.config.style.hint, self.config.style.muted_ink_color, 1);
        }
    }

    /// The embossed white heart and the invitation text, clipped to the silhouette.
    fn render_content(&self, fb: &mut FrameBuffer, ox: i32, oy: i32) {
        let sil = self.surface.silhouette();
        let (w, h) = (self.config.width as i32, self.config.height as i32);

        for &(dx, dy, gray, alpha) in &HEART_SHADOWS {
            for y in 0..h {
                for x in 0..w {
                    if !sil.contains_pixel(x, y) { continue; }
                    let (px, py) = (ox + x + dx, oy + y + dy);
                    if let Some(dst) = fb.get(px, py) {
                        fb.set(px, py, self.lut.over(dst, (gray, gray, gray), alpha));
                    }
                }
            }
        }

        let base = unpack_rgb(self.config.style.heart_color);
        let diag = (w + h).max(1) as f32;
        let (hx, hy) = (w as f32 * 0.4, h as f32 * 0.35);
        let hr = (w.max(h) as f32 * 0.5).max(1.0);
        for y in 0..h {
            for x in 0..w {
                if !sil.contains_pixel(x, y) { continue; }
                // Top-left white to bottom-right shade
                let t = (x + y) as f32 / diag;
                let shade = 1.0 - 0.10 * t;
                let mut c = (
                    (base.0 as f32 * shade + 255.0 * (1.0 - shade) * (1.0 - t)) as u8,
                    (base.1 as f32 * shade + 255.0 * (1.0 - shade) * (1.0 - t)) as u8,
                    (base.2 as f32 * shade + 255.0 * (1.0 - shade) * (1.0 - t)) as u8,
                );
                // Raised highlight
                let d = (((x as f32 - hx).powi(2) + (y as f32 - hy).powi(2)).sqrt() / hr).min(1.0);
                let glow = 0.4 * (1.0 - d);
                let lift = |v: u8| (v as f32 + (255.0 - v as f32) * glow) as u8;
                c = (lift(c.0), lift(c.1), lift(c.2));
                fb.set(ox + x, oy + y, crate::types::rgb(c.0, c.1, c.2));
            }
        }

        // Nothing to read until a coating exists to hide it.
        if !self.surface.is_painted() && !self.surface.is_revealed() {
            return;
        }
        let style = &self.config.style;
        let scale_of = |emph: bool| if emph { 2 } else { 1 };
        let block: i32 = style.message.iter().map(|l| 7 * scale_of(l.emphasis) + LINE_GAP).sum::<i32>() - LINE_GAP;
        // Content box is padded 15% top / 10% bottom.
        let mid = (h as f32 * (0.15 + (1.0 - 0.10)) * 0.5) as i32;
        let mut y = oy + mid - block / 2;
        let keep = |px: i32, py: i32| sil.contains_pixel(px - ox, py - oy);
        for line in &style.message {
            let s = scale_of(line.emphasis);
            let color = if line.emphasis { style.ink_color } else { style.muted_ink_color };
            draw_text_centered_clipped(fb, ox + w / 2, y, &line.text, color, s, &keep);
            y += 7 * s + LINE_GAP;
        }
    }

    /// The remaining coating, faded by the post-reveal opacity.
    fn render_coating(&self, fb: &mut FrameBuffer, ox: i32, oy: i32) {
        let opacity = self.surface.coating_opacity();
        if opacity <= 0.0 {
            return;
        }
        if !self.surface.is_painted() {
            self.render_flat_coating(fb, ox, oy);
            return;
        }
        let coating = self.surface.coating();
        let (w, h) = (coating.width() as i32, coating.height() as i32);

        if self.config.style.coating_shadow {
            let (dx, dy, alpha) = COATING_SHADOW;
            for y in 0..h {
                for x in 0..w {
                    let a = coating.pixel(x, y)[3];
                    if a == 0 { continue; }
                    let (px, py) = (ox + x + dx, oy + y + dy);
                    if let Some(dst) = fb.get(px, py) {
                        let k = alpha * opacity * a as f32 / 255.0;
                        fb.set(px, py, self.lut.over(dst, (0, 0, 0), k));
                    }
                }
            }
        }

        for y in 0..h {
            for x in 0..w {
                let [r, g, b, a] = coating.pixel(x, y);
                if a == 0 { continue; }
                let (px, py) = (ox + x, oy + y);
                if let Some(dst) = fb.get(px, py) {
                    fb.set(px, py, self.lut.over(dst, (r, g, b), opacity * a as f32 / 255.0));
                }
            }
        }
    }

    /// Plain gold heart shown while the coating image is pending or failed to load.
    fn render_flat_coating(&self, fb: &mut FrameBuffer, ox: i32, oy: i32) {
        let sil = self.surface.silhouette();
        let [r, g, b] = COATING_BASE;
        let gold = crate::types::rgb(r, g, b);
        for y in 0..sil.height() as i32 {
            for x in 0..sil.width() as i32 {
                if sil.contains_pixel(x, y) {
                    fb.set(ox + x, oy + y, gold);
                }
            }
        }
    }
}

impl Drop for ScratchCard {
    fn drop(&mut self) {
        self.unmount();
    }
}
