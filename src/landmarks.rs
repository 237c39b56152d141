// Hand input from outside the process.
// The hand-pose model is a black box; anything that can produce 21
// normalized landmarks per frame plugs in through `HandDetector`.
//
// `LandmarkStream` reads one JSON line per frame, e.g. from a detector
// process piped into stdin:
//
//   [[{"x":0.51,"y":0.40,"z":-0.02}, ... 21 points ...]]   one hand
//   []                                                      no hand

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::error::Error;
use crate::pointer::{HandLandmarks, Landmark};
use crate::types::FrameBuffer;

pub trait HandDetector {
    /// Landmarks of the one tracked hand in `frame`, or None when no hand is visible.
    fn detect(&mut self, frame: &FrameBuffer) -> Option<HandLandmarks>;
}

pub struct LandmarkStream<R> {
    reader: R,
    line: String,
    exhausted: bool,
}

impl LandmarkStream<Box<dyn BufRead>> {
    /// Open a file, or stdin for "-".
    pub fn open(path: &Path) -> Result<Self, Error> {
        let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
            Box::new(BufReader::new(io::stdin()))
        } else {
            let file = File::open(path)
                .map_err(|e| Error::LandmarkSource(format!("open {}: {e}", path.display())))?;
            Box::new(BufReader::new(file))
        };
        debug!("landmark stream: {}", path.display());
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> LandmarkStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: String::new(), exhausted: false }
    }

    fn next_line(&mut self) -> Option<&str> {
        if self.exhausted {
            return None;
        }
        self.line.clear();
        match self.reader.read_line(&mut self.line) {
            Ok(0) => {
                warn!("landmark stream ended; no more hands will be reported");
                self.exhausted = true;
                None
            }
            Ok(_) => Some(self.line.trim()),
            Err(e) => {
                warn!("landmark stream read failed ({e}); no more hands will be reported");
                self.exhausted = true;
                None
            }
        }
    }
}

/// First hand of one stream line. Malformed input counts as "no hand",
/// and so does a hand with any point far off the frame or not a number.
fn parse_hands(line: &str) -> Option<HandLandmarks> {
    if line.is_empty() {
        return None;
    }
    let hands: Option<Vec<Vec<Landmark>>> = match serde_json::from_str(line) {
        Ok(h) => h,
        Err(e) => {
            warn!("skipping malformed landmark line: {e}");
            return None;
        }
    };
    let first = hands?.into_iter().next()?;
    let Some(hand) = HandLandmarks::from_slice(&first) else {
        warn!("skipping hand with {} landmarks (expected 21)", first.len());
        return None;
    };
    if let Some(bad) = hand.0.iter().find(|lm| !lm.is_plausible()) {
        warn!("skipping hand with out-of-range landmark ({}, {})", bad.x, bad.y);
        return None;
    }
    Some(hand)
}

impl<R: BufRead> HandDetector for LandmarkStream<R> {
    fn detect(&mut self, _frame: &FrameBuffer) -> Option<HandLandmarks> {
        self.next_line().and_then(parse_hands)
    }
}
