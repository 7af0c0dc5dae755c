// Glitter: short-lived gold flakes thrown off wherever the coating is scratched.
// Visual outcomes:
// - Each scratch throws a small burst of flakes outward with a slight upward kick.
// - Flakes fall under gravity, spin, and fade out over ~50 frames.
//
// Motion is per display frame (px/frame), not per second: one `advance` = one frame.

use crate::config::ParticleTuning;
use crate::types::{rgb, unpack_rgb, FrameBuffer, SurfacePoint};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// One flake. Visual: a tiny gold square or dot that drifts, spins, and fades.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: u64,                   // never reused
    pub x: f32, pub y: f32,        // position in surface pixels
    pub vx: f32, pub vy: f32,      // velocity in px/frame
    pub size: f32,                 // edge length in pixels
    pub opacity: f32,              // always equal to `life`
    pub rotation: f32,             // degrees
    pub rotation_speed: f32,       // degrees/frame
    pub life: f32,                 // 1.0 at birth, removed at <= 0
}

/// Owns the live flakes. Spawn and advance are the only mutators.
pub struct ParticleSimulator {
    rng: Xoshiro256PlusPlus,
    particles: Vec<Particle>, // oldest first
    next_id: u64,
    tuning: ParticleTuning,
}

impl ParticleSimulator {
    /// Same seed, same flakes. Visual: no immediate effect.
    pub fn with_seed(tuning: ParticleTuning, seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            particles: Vec::with_capacity(tuning.max_particles + tuning.batch),
            next_id: 0,
            tuning,
        }
    }

    pub fn particles(&self) -> &[Particle] { &self.particles }
    pub fn len(&self) -> usize { self.particles.len() }
    pub fn is_empty(&self) -> bool { self.particles.is_empty() }

    /// Throw one batch of flakes from `at`, then drop the oldest so at most
    /// `max_particles` remain. Returns how many were created.
    /// Visual: a sparkle burst appears at the scratch point.
    pub fn spawn(&mut self, at: SurfacePoint) -> usize {
        let t = &self.tuning;
        for _ in 0..t.batch {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = range(&mut self.rng, t.min_speed, t.max_speed);
            let p = Particle {
                id: self.next_id,
                x: at.x,
                y: at.y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed - t.upward_bias, // upward kick
                size: range(&mut self.rng, t.min_size, t.max_size),
                opacity: 1.0,
                rotation: self.rng.random_range(0.0..360.0),
                rotation_speed: range(&mut self.rng, -t.max_rotation_speed, t.max_rotation_speed),
                life: 1.0,
            };
            self.next_id += 1;
            self.particles.push(p);
        }

        // Newest win: trim from the front
        let max = t.max_particles;
        if self.particles.len() > max {
            let excess = self.particles.len() - max;
            self.particles.drain(..excess);
        }
        t.batch
    }

    /// Step every flake by one frame and drop the expired ones.
    /// Returns how many are still alive.
    /// Visual: flakes move, spin, fall, and fade a little.
    pub fn advance(&mut self) -> usize {
        let (gravity, decay) = (self.tuning.gravity, self.tuning.decay);
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += gravity;
            p.rotation += p.rotation_speed;
            p.life -= decay;
            p.opacity = p.life;
        }
        self.particles.retain(|p| p.life > 0.0);
        self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Draw every flake into `fb`, with surface (0,0) placed at (ox, oy).
    /// Visual: gold flakes with a faint warm glow over whatever is beneath.
    pub fn render(&self, fb: &mut FrameBuffer, ox: i32, oy: i32) {
        for p in &self.particles {
            let cx = ox as f32 + p.x;
            let cy = oy as f32 + p.y;
            let glow = (p.size * 0.5 + 4.0) as i32;
            draw_halo(fb, cx as i32, cy as i32, glow, HALO_TINT, 0.35 * p.opacity);
            draw_flake(fb, cx, cy, p);
        }
    }
}

#[inline]
fn range(rng: &mut Xoshiro256PlusPlus, min: f32, max: f32) -> f32 {
    if max > min { rng.random_range(min..max) } else { min }
}

// ----------------------------- drawing helpers --------------------------------

/// Gradient stops across a flake, corner to corner.
const FLAKE_STOPS: [(u8, u8, u8); 3] = [(0xD4, 0xC4, 0xA8), (0xC9, 0xB8, 0x96), (0xB8, 0xA6, 0x7D)];

/// Warm halo colour laid under each flake.
const HALO_TINT: (u8, u8, u8) = (201, 184, 150);

/// Brighten the page pixel at (x, y) by `tint`, clamping each channel.
#[inline]
fn brighten(fb: &mut FrameBuffer, x: i32, y: i32, tint: (f32, f32, f32)) {
    let Some(old) = fb.get(x, y) else { return };
    let (r, g, b) = unpack_rgb(old);
    let lift = |c: u8, t: f32| (c as f32 + t).round().min(255.0) as u8;
    fb.set(x, y, rgb(lift(r, tint.0), lift(g, tint.1), lift(b, tint.2)));
}

/// Halo behind a flake: `tint` scaled by `strength` at the centre, dying out
/// towards `radius` on a Gaussian curve.
fn draw_halo(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, tint: (u8, u8, u8), strength: f32) {
    if radius <= 0 || strength <= 0.0 { return; }
    let reach = (radius * radius) as f32;
    // sigma = radius / 2
    let falloff = 2.0 * (radius as f32 * 0.5).powi(2);

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = (dx * dx + dy * dy) as f32;
            if d2 > reach { continue; }
            let k = strength * (-d2 / falloff).exp();
            brighten(fb, cx + dx, cy + dy, (tint.0 as f32 * k, tint.1 as f32 * k, tint.2 as f32 * k));
        }
    }
}

/// Rotated square (size > 3) or round dot, shaded with the gold gradient, alpha = opacity.
fn draw_flake(fb: &mut FrameBuffer, cx: f32, cy: f32, p: &Particle) {
    let alpha = p.opacity.clamp(0.0, 1.0);
    if alpha <= 0.0 { return; }
    let half = p.size * 0.5;
    let reach = (half * std::f32::consts::SQRT_2).ceil() as i32;
    let (sin, cos) = (-p.rotation.to_radians()).sin_cos();
    let square = p.size > 3.0;

    for y in (cy as i32 - reach)..=(cy as i32 + reach) {
        for x in (cx as i32 - reach)..=(cx as i32 + reach) {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            // Into the flake's own frame
            let u = dx * cos - dy * sin;
            let v = dx * sin + dy * cos;
            let inside = if square {
                u.abs() <= half && v.abs() <= half
            } else {
                u * u + v * v <= half * half
            };
            if !inside { continue; }

            let t = (((u + v) / (2.0 * p.size.max(1e-3))) + 0.5).clamp(0.0, 1.0);
            let (r, g, b) = gradient(t);
            let Some(old) = fb.get(x, y) else { continue };
            let (or, og, ob) = unpack_rgb(old);
            let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u32;
            fb.set(x, y, (mix(r, or) << 16) | (mix(g, og) << 8) | mix(b, ob));
        }
    }
}

fn gradient(t: f32) -> (u8, u8, u8) {
    let (a, b, k) = if t < 0.5 {
        (FLAKE_STOPS[0], FLAKE_STOPS[1], t * 2.0)
    } else {
        (FLAKE_STOPS[1], FLAKE_STOPS[2], (t - 0.5) * 2.0)
    };
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * k).round() as u8;
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> ParticleSimulator {
        ParticleSimulator::with_seed(ParticleTuning::default(), 7)
    }

    #[test]
    fn spawn_creates_a_full_batch_at_the_point() {
        let mut s = sim();
        assert_eq!(s.spawn(SurfacePoint::new(10.0, 20.0)), 8);
        assert_eq!(s.len(), 8);
        for p in s.particles() {
            assert_eq!((p.x, p.y), (10.0, 20.0));
            assert_eq!(p.life, 1.0);
            assert_eq!(p.opacity, 1.0);
            assert!(p.size >= 2.0 && p.size < 6.0);
            assert!(p.rotation >= 0.0 && p.rotation < 360.0);
            assert!(p.rotation_speed >= -10.0 && p.rotation_speed < 10.0);
            // speed in [2, 6) once the upward kick is taken back out
            let speed = (p.vx * p.vx + (p.vy + 2.0) * (p.vy + 2.0)).sqrt();
            assert!(speed >= 2.0 - 1e-4 && speed < 6.0 + 1e-4, "speed = {speed}");
        }
    }

    #[test]
    fn ids_are_monotonic_and_unique() {
        let mut s = sim();
        for _ in 0..10 {
            s.spawn(SurfacePoint::new(0.0, 0.0));
        }
        let ids: Vec<u64> = s.particles().iter().map(|p| p.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*ids.last().unwrap(), 79);
    }

    #[test]
    fn cap_keeps_the_newest() {
        let mut s = sim();
        for _ in 0..7 {
            s.spawn(SurfacePoint::new(0.0, 0.0));
            assert!(s.len() <= 50);
        }
        assert_eq!(s.len(), 50);
        // 56 spawned, 6 oldest dropped
        assert_eq!(s.particles()[0].id, 6);
    }

    #[test]
    fn advance_applies_kinematics() {
        let mut s = sim();
        s.spawn(SurfacePoint::new(50.0, 50.0));
        let before = s.particles()[0].clone();
        s.advance();
        let after = &s.particles()[0];
        assert_eq!(after.x, before.x + before.vx);
        assert_eq!(after.y, before.y + before.vy);
        assert_eq!(after.vy, before.vy + 0.15);
        assert_eq!(after.vx, before.vx);
        assert_eq!(after.rotation, before.rotation + before.rotation_speed);
        assert_eq!(after.life, before.life - 0.02);
        assert_eq!(after.opacity, after.life);
    }

    #[test]
    fn particles_expire_and_never_return() {
        let mut s = sim();
        s.spawn(SurfacePoint::new(0.0, 0.0));
        let ids: Vec<u64> = s.particles().iter().map(|p| p.id).collect();
        let mut ticks = 0;
        while !s.is_empty() {
            s.advance();
            ticks += 1;
            assert!(ticks <= 51);
        }
        assert!(ticks >= 50);
        s.spawn(SurfacePoint::new(0.0, 0.0));
        assert!(s.particles().iter().all(|p| !ids.contains(&p.id)));
    }

    #[test]
    fn empty_batch_config_spawns_nothing() {
        let tuning = ParticleTuning { batch: 0, ..ParticleTuning::default() };
        let mut s = ParticleSimulator::with_seed(tuning, 1);
        assert_eq!(s.spawn(SurfacePoint::new(1.0, 1.0)), 0);
        assert!(s.is_empty());
    }

    #[test]
    fn render_draws_near_the_flakes_only() {
        let mut s = sim();
        s.spawn(SurfacePoint::new(20.0, 20.0));
        let mut fb = FrameBuffer::new(100, 100);
        s.render(&mut fb, 0, 0);
        assert_ne!(fb.get(20, 20), Some(0));
        assert_eq!(fb.get(90, 90), Some(0));
    }

    #[test]
    fn halo_brightens_inside_its_radius_and_saturates() {
        let mut fb = FrameBuffer::new(20, 20);
        fb.fill(rgb(250, 10, 10));
        draw_halo(&mut fb, 10, 10, 4, HALO_TINT, 1.0);
        let (r, g, _) = unpack_rgb(fb.get(10, 10).unwrap());
        assert_eq!(r, 255);
        assert!(g > 150);
        let (_, g_edge, _) = unpack_rgb(fb.get(13, 10).unwrap());
        assert!(g_edge > 10 && g_edge < g);
        assert_eq!(fb.get(15, 10), Some(rgb(250, 10, 10)));
    }

    #[test]
    fn gradient_hits_its_stops() {
        assert_eq!(gradient(0.0), FLAKE_STOPS[0]);
        assert_eq!(gradient(0.5), FLAKE_STOPS[1]);
        assert_eq!(gradient(1.0), FLAKE_STOPS[2]);
    }
}
