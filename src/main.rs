// Air Painter: draw on a canvas by moving your index finger in front of the camera.
// • The live camera and the canvas are shown blended 50/50.
// • Touch a swatch in the top band to pick a color.
// • SPACE toggles drawing, C clears, +/- change thickness, Q or ESC quits.

mod camera;
mod canvas;
mod command;
mod compositor;
mod config;
mod draw;
mod error;
mod landmarks;
mod logging;
mod mode;
mod palette;
mod pointer;
mod session;
mod stroke;
mod types;

use anyhow::Context;
use clap::Parser;
use log::error;

use camera::CameraCapture;
use config::{Cli, Config};
use draw::Drawer;
use landmarks::LandmarkStream;
use logging::{init_logging, LoggingConfig};
use palette::Palette;
use session::{run, HandInput, Session};
use stroke::BrushState;
use types::Color;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig { env_filter: cli.log.clone(), ..Default::default() });
    let config = Config::try_from(cli)?;

    let mut hands = match &config.landmarks {
        Some(path) => HandInput::Detector(Box::new(
            LandmarkStream::open(path).context("opening landmark stream")?,
        )),
        None => HandInput::Pointer,
    };

    let mut cam = CameraCapture::new(config.camera, config.width, config.height, config.mirror)
        .context("starting camera")?;
    let (w, h) = (config.width as usize, config.height as usize);
    let mut drawer = Drawer::new("Air Painter", w, h)?;

    let brush = BrushState::new(Color::RED, config.thickness);
    let palette = Palette::standard()?;
    let mut session = Session::new(w, h, palette, brush, config.hud);

    // cam is dropped on every path out of here, which stops the stream.
    if let Err(e) = run(&mut session, &mut cam, &mut drawer, &mut hands) {
        error!("session aborted: {e}");
        return Err(e).context("painting session");
    }
    Ok(())
}
