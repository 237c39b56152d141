// Display blend: half live camera, half canvas.
// Reads the canvas, writes only the output frame.

use crate::error::Error;
use crate::types::FrameBuffer;

/// 50/50 average of two 0x00RRGGBB pixels, per channel, rounding half up.
#[inline]
fn average_rgb(a: u32, b: u32) -> u32 {
    let ch = |shift: u32| ((((a >> shift) & 0xFF) + ((b >> shift) & 0xFF) + 1) / 2) << shift;
    ch(16) | ch(8) | ch(0)
}

/// out = 0.5 * live + 0.5 * canvas.
/// Visual: camera and drawing both visible, each at half strength. White canvas
/// areas wash the camera out to a lighter picture; black ink darkens it.
pub fn composite(live: &FrameBuffer, canvas: &FrameBuffer, out: &mut FrameBuffer) -> Result<(), Error> {
    if live.dimensions() != canvas.dimensions() {
        return Err(Error::SizeMismatch {
            what: "composite live/canvas",
            expected: canvas.dimensions(),
            got: live.dimensions(),
        });
    }
    if out.dimensions() != canvas.dimensions() {
        return Err(Error::SizeMismatch {
            what: "composite output",
            expected: canvas.dimensions(),
            got: out.dimensions(),
        });
    }

    for ((o, &l), &c) in out.pixels.iter_mut().zip(&live.pixels).zip(&canvas.pixels) {
        *o = average_rgb(l, c);
    }
    Ok(())
}
