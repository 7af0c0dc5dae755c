use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use scratch_heart::gesture::GestureTracker;
use scratch_heart::particles::ParticleSimulator;
use scratch_heart::surface::RevealSurface;
use scratch_heart::{
    CardConfig, ParticleTuning, PointerEvent, RevealTuning, ScratchCard, SurfaceGeometry, SurfacePoint,
};
use std::cell::Cell;
use std::rc::Rc;

fn painted_surface(w: u32, h: u32) -> RevealSurface {
    let mut s = RevealSurface::new(w, h, RevealTuning::default()).unwrap();
    s.paint(&RgbaImage::from_pixel(16, 16, Rgba([205, 170, 80, 255])));
    s
}

fn ready_card() -> ScratchCard {
    let mut card = ScratchCard::with_seed(CardConfig::classic(), 2024).unwrap();
    card.on_frame();
    card
}

#[test]
fn erosion_never_decreases() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
    let mut s = painted_surface(280, 260);
    let mut last = s.scratch_percent();
    for _ in 0..200 {
        let p = SurfacePoint::new(rng.random_range(-30.0..310.0), rng.random_range(-30.0..290.0));
        let now = s.erase(p).percent;
        assert!(now >= last, "{now} < {last}");
        last = now;
    }
}

#[test]
fn completion_fires_once_on_first_crossing() {
    let fired = Rc::new(Cell::new(0u32));
    let seen_at = Rc::new(Cell::new(None::<f32>));
    let mut s = painted_surface(280, 260);
    let f = fired.clone();
    s.on_complete(move || f.set(f.get() + 1));

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
    let mut prev = 0.0;
    for _ in 0..400 {
        let out = s.erase(SurfacePoint::new(rng.random_range(0.0..280.0), rng.random_range(0.0..260.0)));
        if out.revealed_now {
            assert!(prev <= 50.0 && out.percent > 50.0);
            seen_at.set(Some(out.percent));
        }
        prev = out.percent;
    }
    assert!(s.scratch_percent() > 50.0);
    assert_eq!(fired.get(), 1);
    assert!(seen_at.get().is_some());
    assert!(s.is_revealed());
}

#[test]
fn repeated_erase_at_one_point_changes_nothing() {
    let mut s = painted_surface(280, 260);
    let p = SurfacePoint::new(120.0, 140.0);
    let first = s.erase(p);
    let second = s.erase(p);
    assert!(first.cleared > 0);
    assert_eq!(second.cleared, 0);
    assert_eq!(first.percent, second.percent);
}

#[test]
fn particle_life_decays_then_particle_is_gone() {
    let tuning = ParticleTuning::default();
    let decay = tuning.decay;
    let mut sim = ParticleSimulator::with_seed(tuning, 3);
    sim.spawn(SurfacePoint::new(40.0, 40.0));
    let tracked = sim.particles()[0].id;

    let mut life = 1.0f32;
    loop {
        sim.advance();
        let expected = life - decay;
        match sim.particles().iter().find(|p| p.id == tracked) {
            Some(p) => {
                assert!(p.life < life);
                assert!((p.life - expected).abs() < 1e-6);
                assert!(p.life > 0.0);
                life = p.life;
            }
            None => {
                assert!(expected <= 1e-6, "removed while life was {expected}");
                break;
            }
        }
    }
    for _ in 0..10 {
        sim.spawn(SurfacePoint::new(0.0, 0.0));
        sim.advance();
        assert!(sim.particles().iter().all(|p| p.id != tracked));
    }
}

#[test]
fn particle_set_stays_bounded() {
    let mut sim = ParticleSimulator::with_seed(ParticleTuning::default(), 9);
    for i in 0..100 {
        sim.spawn(SurfacePoint::new(i as f32, 0.0));
        assert!(sim.len() <= 50);
        if i % 3 == 0 {
            sim.advance();
        }
    }
}

#[test]
fn move_after_release_erases_nothing() {
    let geo = SurfaceGeometry::unscaled(0.0, 0.0, 280, 260);
    let mut g = GestureTracker::new();
    let erases: Vec<SurfacePoint> = [
        PointerEvent::mouse_down(10.0, 10.0),
        PointerEvent::mouse_move(20.0, 20.0),
        PointerEvent::mouse_up(),
        PointerEvent::mouse_move(30.0, 30.0),
    ]
    .iter()
    .filter_map(|e| g.handle(e, &geo).erase_at)
    .collect();
    assert_eq!(erases, vec![SurfacePoint::new(10.0, 10.0), SurfacePoint::new(20.0, 20.0)]);

    // Same sequence through the card: two batches of glitter, nothing after release.
    let mut card = ready_card();
    card.handle_event(&PointerEvent::mouse_down(10.0, 10.0));
    card.handle_event(&PointerEvent::mouse_move(20.0, 20.0));
    card.handle_event(&PointerEvent::mouse_up());
    card.handle_event(&PointerEvent::mouse_move(30.0, 30.0));
    assert_eq!(card.particles().len(), 16);
}

#[test]
fn glitter_loop_stops_once_everything_has_faded() {
    let mut card = ready_card();
    card.handle_event(&PointerEvent::mouse_down(5.0, 5.0));
    card.handle_event(&PointerEvent::mouse_move(6.0, 6.0));
    card.handle_event(&PointerEvent::mouse_leave());
    assert_eq!(card.particles().len(), 16);
    assert!(card.frame_loop_active());

    let mut frames = 0;
    while card.on_frame() {
        frames += 1;
        assert!(frames < 60, "frame loop never stopped");
    }
    assert!(card.particles().is_empty());
    assert!(!card.frame_loop_active());
    // Idle frames do no work and keep the loop released.
    assert!(!card.on_frame());
    assert!(!card.frame_loop_active());
}

#[test]
fn touch_drag_reveals_the_card_and_reports_upward() {
    let mut card = ready_card();
    let done = Rc::new(Cell::new(0u32));
    let d = done.clone();
    card.on_complete(move || d.set(d.get() + 1));

    use scratch_heart::ClientPoint;
    card.handle_event(&PointerEvent::touch_start(&[ClientPoint::new(20.0, 40.0)]));
    for y in (40..240).step_by(20) {
        for x in (20..260).step_by(12) {
            let out = card.handle_event(&PointerEvent::touch_move(&[ClientPoint::new(x as f32, y as f32)]));
            assert!(out.prevent_default);
        }
    }
    card.handle_event(&PointerEvent::touch_end());
    assert!(card.is_revealed());
    assert_eq!(done.get(), 1);

    // The leftover coating fades out, then the loop releases itself.
    let mut frames = 0;
    while card.on_frame() {
        frames += 1;
        assert!(frames < 200);
    }
    assert_eq!(card.surface().coating_opacity(), 0.0);

    // More scratching after the reveal is fine and never re-fires.
    card.handle_event(&PointerEvent::mouse_down(140.0, 130.0));
    assert_eq!(done.get(), 1);
    assert!(card.is_revealed());
}
