// Opens a camera and turns each frame into a canvas-sized buffer.
// Frames come out mirrored (so moving your hand right moves the pen right)
// and resized to the canvas, packed as 0x00RRGGBB.
// Visual expectation: the window behaves like a mirror you can draw on.

use log::{info, warn};

use crate::error::Error;
use crate::session::FrameSource;
use crate::types::FrameBuffer;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use image::{imageops, RgbImage};

// A small wrapper around nokhwa::Camera so the session loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    out_width: u32,
    out_height: u32,
    mirror: bool,
}

impl CameraCapture {
    /// Open camera `index`, asking for the canvas resolution (the driver may pick another;
    /// frames are resized either way).
    /// Nothing is on screen yet after this; we only hold an open stream.
    pub fn new(index: u32, width: u32, height: u32, mirror: bool) -> Result<Self, Error> {
        // 1) Choose the device (0 = default webcam).
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );

        // 2) Ask for RGB frames, closest to what we requested.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // 3) Create the camera and start streaming. Either fails without a device.
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // 4) The driver may have settled on another resolution.
        let actual = cam.resolution();
        info!(
            "camera {index} streaming at {}x{}, output {width}x{height}",
            actual.width(),
            actual.height()
        );

        Ok(Self { cam, out_width: width, out_height: height, mirror })
    }
}

impl FrameSource for CameraCapture {
    /// Grab one frame (blocks until the camera has one).
    /// Visual: once the session presents it, the camera half of the picture moves on by one frame.
    fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        // 1) Pull the raw frame.
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        // 2) Decode whatever the driver sent (YUYV, MJPEG, ...) into RGB.
        let rgb_img: RgbImage = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        // 3) Mirror, fit to the canvas, pack.
        Ok(prepare_frame(rgb_img, self.mirror, self.out_width, self.out_height))
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        if let Err(e) = self.cam.stop_stream() {
            warn!("stopping camera stream: {e}");
        }
    }
}

/// Mirror (optionally), resize to the output size, and pack.
/// Visual: with `mirror` set, raising your right hand raises the hand on the right of the window.
pub fn prepare_frame(mut img: RgbImage, mirror: bool, width: u32, height: u32) -> FrameBuffer {
    if mirror {
        imageops::flip_horizontal_in_place(&mut img);
    }
    if img.dimensions() != (width, height) {
        img = imageops::resize(&img, width, height, imageops::FilterType::Triangle);
    }
    pack_rgb(&img)
}

/// RGB bytes → 0x00RRGGBB words, row-major.
fn pack_rgb(img: &RgbImage) -> FrameBuffer {
    let (w, h) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect();
    FrameBuffer { width: w as usize, height: h as usize, pixels }
}
