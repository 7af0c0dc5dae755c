//! Pointer/touch input: the scratch gesture state machine and the mapping
//! from client (window) coordinates into the coating's backing pixels.
//!
//! ```text
//! idle --down--> scratching        (erase at the down point)
//! scratching --move--> scratching  (erase at each move point)
//! scratching --up/leave/cancel--> idle
//! idle --move--> idle              (ignored)
//! ```

/// A point in client (window/page) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientPoint {
    pub x: f32,
    pub y: f32,
}

impl ClientPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
    Cancel,
}

/// One input event. Touch events carry the first active touch only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub source: InputSource,
    pub phase: PointerPhase,
    pub position: Option<ClientPoint>,
}

impl PointerEvent {
    pub fn mouse_down(x: f32, y: f32) -> Self { Self::mouse(PointerPhase::Down, Some(ClientPoint::new(x, y))) }
    pub fn mouse_move(x: f32, y: f32) -> Self { Self::mouse(PointerPhase::Move, Some(ClientPoint::new(x, y))) }
    pub fn mouse_up() -> Self { Self::mouse(PointerPhase::Up, None) }
    pub fn mouse_leave() -> Self { Self::mouse(PointerPhase::Leave, None) }

    /// `touches` lists the active touch points; only the first one drives the scratch.
    pub fn touch_start(touches: &[ClientPoint]) -> Self { Self::touch(PointerPhase::Down, touches) }
    pub fn touch_move(touches: &[ClientPoint]) -> Self { Self::touch(PointerPhase::Move, touches) }
    pub fn touch_end() -> Self { Self::touch(PointerPhase::Up, &[]) }
    pub fn touch_cancel() -> Self { Self::touch(PointerPhase::Cancel, &[]) }

    fn mouse(phase: PointerPhase, position: Option<ClientPoint>) -> Self {
        Self { source: InputSource::Mouse, phase, position }
    }

    fn touch(phase: PointerPhase, touches: &[ClientPoint]) -> Self {
        Self { source: InputSource::Touch, phase, position: touches.first().copied() }
    }
}

/// Where the coating sits on screen and how big its backing buffer is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub left: f32,
    pub top: f32,
    pub display_width: f32,
    pub display_height: f32,
    pub buffer_width: u32,
    pub buffer_height: u32,
}

impl SurfaceGeometry {
    /// Displayed 1:1 with its backing buffer at (left, top).
    pub fn unscaled(left: f32, top: f32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            display_width: width as f32,
            display_height: height as f32,
            buffer_width: width,
            buffer_height: height,
        }
    }

    /// Client -> backing pixels. No clamping: off-surface points just erase nothing.
    pub fn to_surface(&self, p: ClientPoint) -> crate::types::SurfacePoint {
        let sx = if self.display_width > 0.0 { self.buffer_width as f32 / self.display_width } else { 1.0 };
        let sy = if self.display_height > 0.0 { self.buffer_height as f32 / self.display_height } else { 1.0 };
        crate::types::SurfacePoint::new((p.x - self.left) * sx, (p.y - self.top) * sy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Scratching,
}

/// What the card should do in response to one event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureOutcome {
    /// Erase (and throw glitter) here.
    pub erase_at: Option<crate::types::SurfacePoint>,
    /// Swallow the event so the page doesn't scroll under a touch.
    pub prevent_default: bool,
}

#[derive(Debug, Default)]
pub struct GestureTracker {
    state: GestureState,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_scratching(&self) -> bool {
        self.state == GestureState::Scratching
    }

    pub fn handle(&mut self, event: &PointerEvent, geometry: &SurfaceGeometry) -> GestureOutcome {
        match event.phase {
            PointerPhase::Down => {
                self.state = GestureState::Scratching;
                GestureOutcome {
                    erase_at: event.position.map(|p| geometry.to_surface(p)),
                    prevent_default: true,
                }
            }
            PointerPhase::Move if self.is_scratching() => GestureOutcome {
                erase_at: event.position.map(|p| geometry.to_surface(p)),
                prevent_default: true,
            },
            PointerPhase::Move => GestureOutcome::default(),
            PointerPhase::Up | PointerPhase::Leave | PointerPhase::Cancel => {
                self.state = GestureState::Idle;
                GestureOutcome::default()
            }
        }
    }

    /// Drop any in-progress gesture (e.g. on unmount).
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}
