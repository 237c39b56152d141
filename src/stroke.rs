// Turns the fingertip trail into line segments on the canvas.
// One anchor (the stroke cursor) is kept between frames; any break in
// continuity drops it so the next sample starts a fresh stroke.

use crate::canvas::Canvas;
use crate::draw::draw_thick_line;
use crate::mode::DrawState;
use crate::types::{Color, Point};

/// Ink color and nib size. Thickness never goes below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushState {
    pub color: Color,
    thickness: u32,
}

impl BrushState {
    pub fn new(color: Color, thickness: u32) -> Self {
        Self { color, thickness: thickness.max(1) }
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    /// One pixel wider. Returns the new thickness.
    pub fn thicker(&mut self) -> u32 {
        self.thickness = self.thickness.saturating_add(1);
        self.thickness
    }

    pub fn thinner(&mut self) -> u32 {
        self.thickness = self.thickness.saturating_sub(1).max(1);
        self.thickness
    }
}

impl Default for BrushState {
    fn default() -> Self {
        Self::new(Color::RED, 5)
    }
}

/// A segment that was actually rasterized this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub color: Color,
    pub thickness: u32,
}

/// Remembers where the pen was last frame.
/// Visual: consecutive fingertip positions get joined, so fast moves still
/// leave a continuous line instead of a row of dots.
#[derive(Debug, Default)]
pub struct StrokeRenderer {
    cursor: Option<Point>,
}

impl StrokeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Forget the anchor; the next drawing sample starts a new stroke.
    pub fn break_stroke(&mut self) {
        self.cursor = None;
    }

    /// Advance the stroke by one frame. Returns the segment drawn, if any.
    ///
    /// | state   | sample | cursor | effect                          |
    /// |---------|--------|--------|---------------------------------|
    /// | Drawing | some   | some   | segment cursor→sample, advance  |
    /// | Drawing | some   | none   | anchor at sample, no ink        |
    /// | any     | none   | -      | cursor dropped                  |
    /// | Idle    | -      | -      | cursor dropped                  |
    pub fn render(
        &mut self,
        canvas: &mut Canvas,
        state: DrawState,
        sample: Option<Point>,
        brush: &BrushState,
    ) -> Option<Segment> {
        let (DrawState::Drawing, Some(to)) = (state, sample) else {
            self.cursor = None;
            return None;
        };

        let drawn = self.cursor.map(|from| {
            draw_thick_line(canvas.pixels_mut(), from, to, brush.thickness, brush.color);
            Segment { from, to, color: brush.color, thickness: brush.thickness }
        });
        self.cursor = Some(to);
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use proptest::prelude::*;

    fn canvas() -> Canvas {
        Canvas::new(400, 300, Color::WHITE, &Palette::standard().unwrap())
    }

    fn p(x: i32, y: i32) -> Option<Point> {
        Some(Point::new(x, y))
    }

    #[test]
    fn first_sample_only_anchors() {
        let mut c = canvas();
        let before = c.pixels().clone();
        let mut s = StrokeRenderer::new();
        assert_eq!(s.render(&mut c, DrawState::Drawing, p(100, 100), &BrushState::default()), None);
        assert_eq!(s.cursor(), p(100, 100));
        assert_eq!(c.pixels(), &before);
    }

    #[test]
    fn consecutive_samples_chain_segments() {
        let mut c = canvas();
        let mut s = StrokeRenderer::new();
        let brush = BrushState::new(Color::BLACK, 1);
        let pts = [p(100, 100), p(150, 100), p(150, 150), p(200, 200)];
        let segs: Vec<_> = pts
            .iter()
            .filter_map(|&pt| s.render(&mut c, DrawState::Drawing, pt, &brush))
            .map(|seg| (seg.from, seg.to))
            .collect();
        assert_eq!(
            segs,
            vec![
                (Point::new(100, 100), Point::new(150, 100)),
                (Point::new(150, 100), Point::new(150, 150)),
                (Point::new(150, 150), Point::new(200, 200)),
            ]
        );
        assert_eq!(c.pixels().get(125, 100), Some(Color::BLACK));
        assert_eq!(c.pixels().get(150, 125), Some(Color::BLACK));
        assert_eq!(c.pixels().get(175, 175), Some(Color::BLACK));
    }

    #[test]
    fn absent_sample_breaks_the_stroke() {
        let mut c = canvas();
        let mut s = StrokeRenderer::new();
        let brush = BrushState::new(Color::BLACK, 1);
        s.render(&mut c, DrawState::Drawing, p(100, 100), &brush);
        assert_eq!(s.render(&mut c, DrawState::Drawing, None, &brush), None);
        assert_eq!(s.cursor(), None);
        assert_eq!(s.render(&mut c, DrawState::Drawing, p(200, 100), &brush), None);
        // nothing joins the two samples
        assert_eq!(c.pixels().get(150, 100), Some(Color::WHITE));
    }

    #[test]
    fn idle_frame_breaks_the_stroke() {
        let mut c = canvas();
        let mut s = StrokeRenderer::new();
        let brush = BrushState::new(Color::BLACK, 3);
        s.render(&mut c, DrawState::Drawing, p(100, 200), &brush);
        assert_eq!(s.render(&mut c, DrawState::Idle, p(150, 200), &brush), None);
        assert_eq!(s.render(&mut c, DrawState::Drawing, p(200, 200), &brush), None);
        assert_eq!(c.pixels().get(150, 200), Some(Color::WHITE));
    }

    #[test]
    fn segment_uses_brush_at_draw_time() {
        let mut c = canvas();
        let mut s = StrokeRenderer::new();
        let mut brush = BrushState::new(Color::RED, 1);
        s.render(&mut c, DrawState::Drawing, p(100, 100), &brush);
        s.render(&mut c, DrawState::Drawing, p(150, 100), &brush);
        brush.color = Color::BLACK;
        let seg = s.render(&mut c, DrawState::Drawing, p(200, 100), &brush).unwrap();
        assert_eq!(seg.color, Color::BLACK);
        assert_eq!(c.pixels().get(120, 100), Some(Color::RED));
        assert_eq!(c.pixels().get(180, 100), Some(Color::BLACK));
    }

    #[test]
    fn samples_far_past_the_edge_ink_up_to_it() {
        let mut c = canvas();
        let mut s = StrokeRenderer::new();
        let brush = BrushState::new(Color::BLACK, 3);
        s.render(&mut c, DrawState::Drawing, p(100, 200), &brush);
        let seg = s.render(&mut c, DrawState::Drawing, p(i32::MAX, 200), &brush).unwrap();
        assert_eq!(seg.to, Point::new(i32::MAX, 200));
        assert_eq!(c.pixels().get(399, 200), Some(Color::BLACK));
        assert_eq!(c.pixels().get(399, 202), Some(Color::WHITE));
        // and straight across the whole plane, both ways
        s.render(&mut c, DrawState::Drawing, p(i32::MIN, i32::MIN), &brush);
        assert_eq!(s.cursor(), p(i32::MIN, i32::MIN));
    }

    #[test]
    fn thinner_clamps_at_one() {
        let mut b = BrushState::new(Color::RED, 2);
        assert_eq!(b.thinner(), 1);
        assert_eq!(b.thinner(), 1);
        assert_eq!(BrushState::new(Color::RED, 0).thickness(), 1);
    }

    proptest! {
        #[test]
        fn decrements_from_one_stay_at_one(n in 0usize..200) {
            let mut b = BrushState::new(Color::RED, 1);
            for _ in 0..n { b.thinner(); }
            prop_assert_eq!(b.thickness(), 1);
        }

        #[test]
        fn increments_are_additive(start in 1u32..100, n in 0u32..200) {
            let mut b = BrushState::new(Color::RED, start);
            for _ in 0..n { b.thicker(); }
            prop_assert_eq!(b.thickness(), start + n);
        }
    }
}
