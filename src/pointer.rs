// Hand landmarks in, one canvas pixel out.
// The detector reports 21 normalized points per hand; we only ever
// follow the tip of the index finger.

use serde::Deserialize;

use crate::types::Point;

pub const LANDMARK_COUNT: usize = 21;
pub const INDEX_FINGER_TIP: usize = 8;

/// Bones of the hand skeleton, as pairs of landmark indices.
/// Only used to draw the overlay on the live frame.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),         // thumb
    (0, 5), (5, 6), (6, 7), (7, 8),         // index
    (5, 9), (9, 10), (10, 11), (11, 12),    // middle
    (9, 13), (13, 14), (14, 15), (15, 16),  // ring
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20), // pinky + palm
];

/// One normalized landmark: x,y in [0,1] of the frame, z is relative depth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    /// How far outside the frame a detector may place a point before it is
    /// treated as garbage, in frame widths/heights.
    const SLACK: f32 = 1.0;

    /// Finite, and no more than one frame away from the visible area.
    /// Detectors do report points a little past the edges for partly hidden hands.
    pub fn is_plausible(&self) -> bool {
        let near = |v: f32| v.is_finite() && (-Self::SLACK..=1.0 + Self::SLACK).contains(&v);
        near(self.x) && near(self.y) && self.z.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks(pub [Landmark; LANDMARK_COUNT]);

impl HandLandmarks {
    /// None unless exactly 21 landmarks are given.
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let arr: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self(arr))
    }

    /// A degenerate hand with every landmark at one spot.
    /// Lets a mouse stand in for a real detector.
    pub fn at(x: f32, y: f32) -> Self {
        Self([Landmark { x, y, z: 0.0 }; LANDMARK_COUNT])
    }

    pub fn fingertip(&self) -> Landmark {
        self.0[INDEX_FINGER_TIP]
    }
}

/// Maps normalized coordinates into canvas pixels.
#[derive(Debug, Clone, Copy)]
pub struct PointerTracker {
    width: usize,
    height: usize,
}

impl PointerTracker {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn to_pixel(&self, lm: Landmark) -> Point {
        Point::new(
            (lm.x * self.width as f32).round() as i32,
            (lm.y * self.height as f32).round() as i32,
        )
    }

    /// Fingertip position in pixels, or None when no hand was seen this frame.
    /// Raw and unsmoothed.
    pub fn track(&self, hand: Option<&HandLandmarks>) -> Option<Point> {
        hand.map(|h| self.to_pixel(h.fingertip()))
    }
}
