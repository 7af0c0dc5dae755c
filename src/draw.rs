// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the save-the-date page.
// 2) Mouse state turned into pointer down/move/up/leave events for the card.
// 3) A tiny 5x7 bitmap font (scalable) for the page text and the message.

use crate::error::Error;
use crate::gesture::PointerEvent;
use crate::types::FrameBuffer;
use minifb::{Key, MouseButton, MouseMode, Scale, Window, WindowOptions};

pub struct Drawer {
    window: Window,            // the on-screen window you see
    was_down: bool,            // left button state on the previous poll
    last_pos: Option<(f32, f32)>,
}

impl Drawer {
    /// Create a window for a `width` x `height` framebuffer.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, scale: Scale) -> Result<Self, Error> {
        let opts = WindowOptions { scale, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, opts)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window, was_down: false, last_pos: None })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Compare this frame's mouse state with the last one and emit pointer events.
    /// Positions are framebuffer pixels (minifb undoes the window scale for us).
    pub fn poll_pointer(&mut self) -> Vec<PointerEvent> {
        let pos = self.window.get_mouse_pos(MouseMode::Discard);
        let down = self.window.get_mouse_down(MouseButton::Left);
        let events = pointer_edges(self.was_down, self.last_pos, down, pos);
        self.was_down = down;
        self.last_pos = pos;
        events
    }
}

/// Turn two consecutive mouse samples into the events a page would have seen.
fn pointer_edges(
    was_down: bool,
    last: Option<(f32, f32)>,
    down: bool,
    pos: Option<(f32, f32)>,
) -> Vec<PointerEvent> {
    let mut out = Vec::new();
    match pos {
        None => {
            if last.is_some() {
                out.push(PointerEvent::mouse_leave());
            }
        }
        Some((x, y)) => {
            if down && !was_down {
                out.push(PointerEvent::mouse_down(x, y));
            } else if last != pos {
                out.push(PointerEvent::mouse_move(x, y));
            }
            if !down && was_down {
                out.push(PointerEvent::mouse_up());
            }
        }
    }
    out
}

/* ---------- 5x7 bitmap font ---------- */

/// Return a 5x7 glyph bitmap. Lowercase maps to uppercase.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '&' => g!(0b01100,0b10010,0b10100,0b01000,0b10101,0b10010,0b01101),
        '%' => g!(0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011),

        _ => None,
    }
}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * 6 - 1) * scale }
}

/// Draw a single 5x7 character at (x,y), each dot a `scale` x `scale` block.
/// `keep` decides per pixel whether drawing is allowed (used to clip to the heart).
fn draw_char_5x7(
    fb: &mut FrameBuffer,
    x: i32, y: i32,
    ch: char,
    color: u32,
    scale: i32,
    keep: &dyn Fn(i32, i32) -> bool,
) {
    let Some(rows) = glyph5x7(ch) else { return };
    for (ry, rowbits) in rows.iter().enumerate() {
        for rx in 0..5 {
            if (rowbits & (1 << (4 - rx))) == 0 { continue; }
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = x + rx * scale + dx;
                    let py = y + ry as i32 * scale + dy;
                    if keep(px, py) { fb.set(px, py, color); }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs.
/// Visual: each glyph is 5x7 dots with 1 dot of spacing, scaled up by `scale`.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale, &|_, _| true);
        x += 6 * scale;
    }
}

/// Draw `text` horizontally centered on `cx`, only where `keep` allows.
pub fn draw_text_centered_clipped(
    fb: &mut FrameBuffer,
    cx: i32, y: i32,
    text: &str,
    color: u32,
    scale: i32,
    keep: &dyn Fn(i32, i32) -> bool,
) {
    let mut x = cx - text_width(text, scale) / 2;
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale, keep);
        x += 6 * scale;
    }
}

/// Draw `text` horizontally centered on `cx`.
pub fn draw_text_centered(fb: &mut FrameBuffer, cx: i32, y: i32, text: &str, color: u32, scale: i32) {
    draw_text_centered_clipped(fb, cx, y, text, color, scale, &|_, _| true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::PointerPhase;

    fn phases(events: &[PointerEvent]) -> Vec<PointerPhase> {
        events.iter().map(|e| e.phase).collect()
    }

    #[test]
    fn press_emits_down_then_drag_emits_move() {
        let down = pointer_edges(false, Some((1.0, 1.0)), true, Some((1.0, 1.0)));
        assert_eq!(phases(&down), vec![PointerPhase::Down]);
        let drag = pointer_edges(true, Some((1.0, 1.0)), true, Some((4.0, 1.0)));
        assert_eq!(phases(&drag), vec![PointerPhase::Move]);
        let still = pointer_edges(true, Some((4.0, 1.0)), true, Some((4.0, 1.0)));
        assert!(still.is_empty());
    }

    #[test]
    fn release_and_exit_end_the_press() {
        let up = pointer_edges(true, Some((4.0, 1.0)), false, Some((4.0, 1.0)));
        assert_eq!(phases(&up), vec![PointerPhase::Up]);
        let gone = pointer_edges(true, Some((4.0, 1.0)), true, None);
        assert_eq!(phases(&gone), vec![PointerPhase::Leave]);
        assert!(pointer_edges(false, None, false, None).is_empty());
    }

    #[test]
    fn text_width_counts_spacing_between_glyphs() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("A", 1), 5);
        assert_eq!(text_width("AB", 2), 22);
    }

    #[test]
    fn lowercase_uses_uppercase_glyphs() {
        assert_eq!(glyph5x7('a'), glyph5x7('A'));
        assert!(glyph5x7('~').is_none());
    }

    #[test]
    fn clipped_text_respects_the_clip() {
        let mut fb = FrameBuffer::new(40, 10);
        draw_text_centered_clipped(&mut fb, 20, 1, "HH", 0xFF, 1, &|x, _| x < 20);
        assert!(fb.pixels.iter().enumerate().all(|(i, &p)| p == 0 || i % 40 < 20));
        assert!(fb.pixels.iter().any(|&p| p == 0xFF));
    }
}
