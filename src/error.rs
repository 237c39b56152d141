// One error type for the painter. Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Size mismatch in {what}: expected {expected:?}, got {got:?}")]
    SizeMismatch {
        what: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("Palette error: {0}")]
    PaletteOverlap(String), // Swatch regions collide or leave the header band
    #[error("Landmark source error: {0}")]
    LandmarkSource(String), // Opening the landmark stream failed
    #[error("Config error: {0}")]
    Config(String),
}
