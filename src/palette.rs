// The color palette: a row of swatches along the top of the canvas.
// Order matters. It decides where each swatch sits on screen, so the
// palette is always an explicit Vec, never a map.

use crate::error::Error;
use crate::types::{Color, FrameBuffer};

/// Half-open pixel rectangle: [x0, x1) × [y0, y1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Region {
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    #[inline]
    pub fn overlaps(&self, other: &Region) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    pub name: &'static str,
    pub color: Color,
    pub region: Region,
}

/// Geometry of the header band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteLayout {
    pub header_height: u32, // H: swatches live in rows [0, H)
    pub offset: u32,        // left margin before the first swatch
    pub swatch_width: u32,  // W
    pub gap: u32,           // space between neighbours
}

impl Default for PaletteLayout {
    fn default() -> Self {
        Self { header_height: 50, offset: 10, swatch_width: 90, gap: 10 }
    }
}

pub const DEFAULT_COLORS: [(&str, Color); 7] = [
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("black", Color::rgb(0, 0, 0)),
];

#[derive(Debug, Clone)]
pub struct Palette {
    swatches: Vec<Swatch>,
    header_height: i32,
}

impl Palette {
    /// Build a palette from explicit regions.
    /// Overlapping or out-of-band regions are a configuration error.
    pub fn new(swatches: Vec<Swatch>, header_height: u32) -> Result<Self, Error> {
        let h = header_height as i32;
        for (i, s) in swatches.iter().enumerate() {
            if s.region.is_empty() {
                return Err(Error::PaletteOverlap(format!("swatch '{}' has an empty region", s.name)));
            }
            if s.region.y0 < 0 || s.region.y1 > h {
                return Err(Error::PaletteOverlap(format!(
                    "swatch '{}' leaves the header band [0, {h})",
                    s.name
                )));
            }
            if let Some(prev) = i.checked_sub(1).map(|p| &swatches[p]) {
                if s.region.x0 < prev.region.x0 {
                    return Err(Error::PaletteOverlap(format!(
                        "swatch '{}' is left of '{}'",
                        s.name, prev.name
                    )));
                }
            }
            if let Some(other) = swatches[..i].iter().find(|o| o.region.overlaps(&s.region)) {
                return Err(Error::PaletteOverlap(format!(
                    "swatches '{}' and '{}' overlap",
                    other.name, s.name
                )));
            }
        }
        Ok(Self { swatches, header_height: h })
    }

    /// Lay out `colors` left to right, `gap` pixels apart.
    pub fn layout(colors: &[(&'static str, Color)], layout: PaletteLayout) -> Result<Self, Error> {
        let stride = (layout.swatch_width + layout.gap) as i32;
        let h = layout.header_height as i32;
        let swatches: Vec<Swatch> = colors
            .iter()
            .enumerate()
            .map(|(i, &(name, color))| {
                let x0 = layout.offset as i32 + i as i32 * stride;
                Swatch {
                    name,
                    color,
                    region: Region { x0, y0: 0, x1: x0 + layout.swatch_width as i32, y1: h },
                }
            })
            .collect();
        Self::new(swatches, layout.header_height)
    }

    /// The seven default swatches in the default band.
    pub fn standard() -> Result<Self, Error> {
        Self::layout(&DEFAULT_COLORS, PaletteLayout::default())
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn header_height(&self) -> usize {
        self.header_height as usize
    }

    /// The swatch under (x,y), if any. Gaps and rows at or below H miss.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<&Swatch> {
        if y < 0 || y >= self.header_height {
            return None;
        }
        self.swatches.iter().find(|s| s.region.contains(x, y))
    }

    /// Name of the first swatch with this color (for the HUD).
    pub fn name_of(&self, color: Color) -> Option<&'static str> {
        self.swatches.iter().find(|s| s.color == color).map(|s| s.name)
    }

    /// Fill each swatch region with its color.
    pub fn paint(&self, fb: &mut FrameBuffer) {
        for s in &self.swatches {
            let y0 = s.region.y0.max(0) as usize;
            let y1 = (s.region.y1.max(0) as usize).min(fb.height);
            let x0 = s.region.x0.max(0) as usize;
            let x1 = (s.region.x1.max(0) as usize).min(fb.width);
            if x0 >= x1 {
                continue;
            }
            for y in y0..y1 {
                let row = y * fb.width;
                fb.pixels[row + x0..row + x1].fill(s.color.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn swatch(name: &'static str, x0: i32, x1: i32) -> Swatch {
        Swatch { name, color: Color::BLACK, region: Region { x0, y0: 0, x1, y1: 50 } }
    }

    #[test]
    fn standard_layout_is_ordered_and_spaced() {
        let p = Palette::standard().unwrap();
        let names: Vec<_> = p.swatches().iter().map(|s| s.name).collect();
        assert_eq!(names, ["red", "green", "blue", "yellow", "cyan", "magenta", "black"]);
        assert_eq!(p.swatches()[0].region, Region { x0: 10, y0: 0, x1: 100, y1: 50 });
        assert_eq!(p.swatches()[1].region, Region { x0: 110, y0: 0, x1: 200, y1: 50 });
        assert_eq!(p.header_height(), 50);
    }

    #[test]
    fn hit_test_edges() {
        let p = Palette::standard().unwrap();
        assert_eq!(p.hit_test(10, 0).map(|s| s.name), Some("red"));
        assert_eq!(p.hit_test(99, 49).map(|s| s.name), Some("red"));
        assert!(p.hit_test(100, 10).is_none()); // gap
        assert!(p.hit_test(5, 10).is_none()); // left margin
        assert!(p.hit_test(50, 50).is_none()); // below the band
        assert!(p.hit_test(50, -1).is_none());
        assert!(p.hit_test(5000, 10).is_none());
    }

    #[test]
    fn overlapping_regions_are_rejected() {
        let err = Palette::new(vec![swatch("a", 0, 20), swatch("b", 19, 40)], 50).unwrap_err();
        assert!(matches!(err, Error::PaletteOverlap(_)));
    }

    #[test]
    fn out_of_order_and_out_of_band_are_rejected() {
        assert!(Palette::new(vec![swatch("a", 30, 40), swatch("b", 0, 10)], 50).is_err());
        assert!(Palette::new(vec![swatch("a", 0, 10)], 40).is_err());
        assert!(Palette::new(vec![swatch("a", 10, 10)], 50).is_err());
    }

    #[test]
    fn zero_width_layout_is_rejected() {
        let layout = PaletteLayout { swatch_width: 0, ..Default::default() };
        assert!(Palette::layout(&DEFAULT_COLORS, layout).is_err());
    }

    #[test]
    fn touching_regions_are_fine() {
        let p = Palette::new(vec![swatch("a", 0, 20), swatch("b", 20, 40)], 50).unwrap();
        assert_eq!(p.hit_test(19, 0).map(|s| s.name), Some("a"));
        assert_eq!(p.hit_test(20, 0).map(|s| s.name), Some("b"));
    }

    #[test]
    fn paint_fills_regions_only() {
        let p = Palette::standard().unwrap();
        let mut fb = FrameBuffer::new(800, 60, Color::WHITE);
        p.paint(&mut fb);
        assert_eq!(fb.get(10, 0), Some(Color::RED));
        assert_eq!(fb.get(99, 49), Some(Color::RED));
        assert_eq!(fb.get(105, 20), Some(Color::WHITE));
        assert_eq!(fb.get(50, 50), Some(Color::WHITE));
        assert_eq!(fb.get(650, 25), Some(Color::BLACK));
    }

    proptest! {
        #[test]
        fn every_point_hits_at_most_one_swatch(x in -50i32..900, y in -10i32..80) {
            let p = Palette::standard().unwrap();
            let hits = p.swatches().iter().filter(|s| s.region.contains(x, y)).count();
            prop_assert!(hits <= 1);
            match p.hit_test(x, y) {
                Some(s) => prop_assert!(s.region.contains(x, y)),
                None => prop_assert_eq!(hits, 0),
            }
        }

        #[test]
        fn points_inside_swatch_resolve_to_it(i in 0usize..7, dx in 0i32..90, y in 0i32..50) {
            let p = Palette::standard().unwrap();
            let s = &p.swatches()[i];
            let hit = p.hit_test(s.region.x0 + dx, y);
            prop_assert_eq!(hit.map(|h| h.color), Some(s.color));
        }
    }
}
