// The persistent drawing surface.
// Created once, never resized; strokes and `clear` mutate it in place.
// Visual: the white sheet you see at half strength over the camera,
// with the color swatches along its top edge.

use crate::palette::Palette;
use crate::types::{Color, FrameBuffer};

/// Everything ever drawn, plus the palette band.
/// Nothing but strokes and `clear` writes here; the display blend only reads it.
pub struct Canvas {
    fb: FrameBuffer,
    background: Color,
    header_height: usize, // rows owned by the palette; `clear` leaves them alone
}

impl Canvas {
    /// A background-filled canvas with the palette painted into its header band.
    pub fn new(width: usize, height: usize, background: Color, palette: &Palette) -> Self {
        // 1) Blank sheet.
        // 2) Swatches on top, so they show through the blend like any ink.
        let mut fb = FrameBuffer::new(width, height, background);
        palette.paint(&mut fb);
        Self { fb, background, header_height: palette.header_height() }
    }

    pub fn width(&self) -> usize {
        self.fb.width
    }

    pub fn height(&self) -> usize {
        self.fb.height
    }

    /// Rows at the top that belong to the palette.
    pub fn header_height(&self) -> usize {
        self.header_height
    }

    pub fn pixels(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn pixels_mut(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    /// Wipe everything below the palette band back to the background.
    /// Visual: all strokes vanish at once; the swatches stay put.
    /// Clearing an already clear canvas changes nothing.
    pub fn clear(&mut self) {
        let h = self.fb.height;
        self.fb.fill_rows(self.header_height, h, self.background);
    }
}
