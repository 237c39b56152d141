// Window + software drawing utilities.
// Provided here:
// 1) A window that shows the blended camera + canvas image and reports keys/mouse.
// 2) Line rasterization: thin Bresenham lines and thick round-nib strokes.
// 3) Overlays: hand skeleton, fingertip crosshair, and a tiny 5x7 bitmap font for the HUD.

use crate::command::Command;
use crate::error::Error;
use crate::pointer::{HandLandmarks, PointerTracker, HAND_CONNECTIONS};
use crate::session::Surface;
use crate::types::{Color, FrameBuffer, Point};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

/// Bound keys. When several are newly pressed in the same frame, the earlier entry wins.
const KEY_BINDINGS: [(Key, Command); 8] = [
    (Key::Escape, Command::Quit),
    (Key::Q, Command::Quit),
    (Key::Space, Command::ToggleDraw),
    (Key::C, Command::Clear),
    (Key::Equal, Command::IncreaseThickness),
    (Key::NumPadPlus, Command::IncreaseThickness),
    (Key::Minus, Command::DecreaseThickness),
    (Key::NumPadMinus, Command::DecreaseThickness),
];

fn command_for(key: Key) -> Option<Command> {
    KEY_BINDINGS.iter().find(|(k, _)| *k == key).map(|&(_, cmd)| cmd)
}

/// Turns raw key events into the held-command level the session latches on.
///
/// The command reported is the one whose key was pressed most recently, for as long
/// as that key stays down. A key pressed while another is held takes over at once.
/// Releasing it does not hand control back to the older key. A tap that starts and
/// ends between two frames still shows up for one frame.
#[derive(Debug, Default)]
pub struct KeyTracker {
    active: Option<Key>,
}

impl KeyTracker {
    /// `pressed`: keys that went down since the last frame.
    /// `is_down`: whether a key is down right now.
    pub fn update(&mut self, pressed: &[Key], is_down: impl Fn(Key) -> bool) -> Option<Command> {
        // 1) A fresh press wins; ties go to binding order.
        let fresh = KEY_BINDINGS.iter().find(|(k, _)| pressed.contains(k));
        if let Some(&(key, cmd)) = fresh {
            self.active = Some(key);
            return Some(cmd);
        }
        // 2) Otherwise keep reporting the active key while it is held.
        self.active = self.active.filter(|&k| is_down(k));
        self.active.and_then(command_for)
    }
}

pub struct Drawer {
    window: Window, // the on-screen window you see
    width: usize,
    height: usize,
    keys: KeyTracker,
}

impl Drawer {
    /// Create a window sized to the canvas.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window, width, height, keys: KeyTracker::default() })
    }
}

impl Surface for Drawer {
    /// Push the pixels for this frame to the screen.
    fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Level signal from the key most recently pressed (see `KeyTracker`).
    /// Edge detection happens in the session, not here.
    fn held_command(&mut self) -> Option<Command> {
        let pressed = self.window.get_keys_pressed(KeyRepeat::No);
        let window = &self.window;
        self.keys.update(&pressed, |k| window.is_key_down(k))
    }

    /// Mouse position normalized to [0,1], None when it is outside the window.
    fn pointer(&self) -> Option<(f32, f32)> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x / self.width as f32, y / self.height as f32))
    }
}

/* ---------- Software drawing: pixels, lines, nibs ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Visit every pixel of the Bresenham line from (x0,y0) to (x1,y1), both ends included.
/// The walk is as long as the line, so callers clip first.
fn walk_line(x0: i32, y0: i32, x1: i32, y1: i32, mut visit: impl FnMut(i32, i32)) {
    let (mut x, mut y) = (i64::from(x0), i64::from(y0));
    let (x1, y1) = (i64::from(x1), i64::from(y1));
    let dx = (x1 - x).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let dy = -(y1 - y).abs();
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        // x and y never leave the [start, end] range, so they fit back in i32
        visit(x as i32, y as i32);
        if x == x1 && y == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x += sx; }
        if e2 <= dx { err += dx; y += sy; }
    }
}

/// Cut the segment a→b down to the part inside the box [lo, hi] (Liang-Barsky).
/// None when the segment misses the box.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    lo: (f64, f64),
    hi: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    // one (p, q) pair per edge: left, right, top, bottom
    for (p, q) in [(-dx, a.0 - lo.0), (dx, hi.0 - a.0), (-dy, a.1 - lo.1), (dy, hi.1 - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None; // parallel to this edge and outside it
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 { return None; }
            t0 = t0.max(t);
        } else {
            if t < t0 { return None; }
            t1 = t1.min(t);
        }
    }
    Some(((a.0 + t0 * dx, a.1 + t0 * dy), (a.0 + t1 * dx, a.1 + t1 * dy)))
}

/// Draw a thin 1-pixel line between (x0,y0) and (x1,y1).
/// Ends outside the framebuffer are clipped to its edges before walking.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    if fb.width == 0 || fb.height == 0 {
        return;
    }
    let (w, h) = (fb.width, fb.height);
    let inside = |x: i32, y: i32| x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h;
    if inside(x0, y0) && inside(x1, y1) {
        walk_line(x0, y0, x1, y1, |x, y| put_pixel(fb, x, y, color));
        return;
    }

    let hi = ((w - 1) as f64, (h - 1) as f64);
    let a = (f64::from(x0), f64::from(y0));
    let b = (f64::from(x1), f64::from(y1));
    let Some((a, b)) = clip_segment(a, b, (0.0, 0.0), hi) else {
        return;
    };
    let px = |v: f64| v.round() as i32;
    walk_line(px(a.0), px(a.1), px(b.0), px(b.1), |x, y| put_pixel(fb, x, y, color));
}

/// Rasterize a stroke segment with a round nib of diameter `thickness`.
/// Visual: a bar with round caps, the mark a felt pen leaves when dragged
/// from `from` to `to`. A pixel is inked when its distance d to the segment
/// satisfies 4·d² ≤ thickness². Off-canvas parts are clipped.
pub fn draw_thick_line(fb: &mut FrameBuffer, from: Point, to: Point, thickness: u32, color: Color) {
    if thickness <= 1 {
        draw_line(fb, from.x, from.y, to.x, to.y, color.0);
        return;
    }
    if fb.width == 0 || fb.height == 0 {
        return;
    }

    // 1) Bounding box of the whole mark, cut down to the framebuffer.
    //    Only these pixels are tested, however long or fat the stroke is.
    let r = f64::from(thickness) / 2.0;
    let (ax, ay) = (f64::from(from.x), f64::from(from.y));
    let (bx, by) = (f64::from(to.x), f64::from(to.y));
    let x_lo = (ax.min(bx) - r).floor().max(0.0);
    let x_hi = (ax.max(bx) + r).ceil().min((fb.width - 1) as f64);
    let y_lo = (ay.min(by) - r).floor().max(0.0);
    let y_hi = (ay.max(by) + r).ceil().min((fb.height - 1) as f64);
    if x_lo > x_hi || y_lo > y_hi {
        return;
    }

    // 2) Distance from each pixel to the closest point of the segment.
    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;
    let reach2 = r * r;
    for y in y_lo as usize..=y_hi as usize {
        let row = y * fb.width;
        for x in x_lo as usize..=x_hi as usize {
            let (px, py) = (x as f64 - ax, y as f64 - ay);
            let t = if len2 > 0.0 { ((px * dx + py * dy) / len2).clamp(0.0, 1.0) } else { 0.0 };
            let (ex, ey) = (px - t * dx, py - t * dy);
            if ex * ex + ey * ey <= reach2 {
                fb.pixels[row + x] = color.0;
            }
        }
    }
}

/// Draw a small crosshair centered at (cx,cy).
/// Visual: four short arms with a one-pixel gap around the centre dot, so the
/// exact fingertip pixel stays visible.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    let (near, far) = (2, size);
    draw_line(fb, cx.saturating_sub(far), cy, cx.saturating_sub(near), cy, color);
    draw_line(fb, cx.saturating_add(near), cy, cx.saturating_add(far), cy, color);
    draw_line(fb, cx, cy.saturating_sub(far), cx, cy.saturating_sub(near), color);
    draw_line(fb, cx, cy.saturating_add(near), cx, cy.saturating_add(far), color);
    put_pixel(fb, cx, cy, color);
}

/// Hand skeleton: white bones, red 3x3 joints.
/// Visual: the familiar stick-figure hand traced over the camera image.
pub fn draw_hand(fb: &mut FrameBuffer, hand: &HandLandmarks, tracker: &PointerTracker) {
    let joints: Vec<Point> = hand.0.iter().map(|&lm| tracker.to_pixel(lm)).collect();
    for &(a, b) in HAND_CONNECTIONS.iter() {
        draw_line(fb, joints[a].x, joints[a].y, joints[b].x, joints[b].y, 0x00_FF_FF_FF);
    }
    for j in &joints {
        for dy in -1..=1 {
            for dx in -1..=1 {
                put_pixel(fb, j.x.saturating_add(dx), j.y.saturating_add(dy), 0x00_FF_00_00);
            }
        }
    }
}

/* ---------- 5x7 bitmap font (digits, A-Z, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
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
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (offset, c) in [(1, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx as i32 + offset, y + ry as i32 + offset, c);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs, 6 pixels per character.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}
