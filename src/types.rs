// Core pixel types shared by the canvas, the camera and the window.

/// A packed RGB color. The channel order is fixed: stored as 0x00RRGGBB,
/// the layout minifb expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    #[inline]
    pub const fn r(self) -> u8 { (self.0 >> 16) as u8 }
    #[inline]
    pub const fn g(self) -> u8 { (self.0 >> 8) as u8 }
    #[inline]
    pub const fn b(self) -> u8 { self.0 as u8 }
}

/// A pixel coordinate on the canvas. Signed: the fingertip may leave the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A buffer of `width * height` pixels, all set to `fill`.
    pub fn new(width: usize, height: usize, fill: Color) -> Self {
        Self { width, height, pixels: vec![fill.0; width * height] }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Color at (x,y), or None outside the buffer.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Color(self.pixels[y * self.width + x]))
    }

    /// Fill rows `y0..y1` (clamped to the buffer) with one color.
    pub fn fill_rows(&mut self, y0: usize, y1: usize, color: Color) {
        let y1 = y1.min(self.height);
        if y0 >= y1 {
            return;
        }
        self.pixels[y0 * self.width..y1 * self.width].fill(color.0);
    }
}
