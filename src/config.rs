// Command-line flags and the validated settings the session runs with.

use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;
use crate::palette::PaletteLayout;

/// Paint in the air with your index finger.
///
/// Keys: SPACE toggles drawing, C clears, +/- change thickness, Q or ESC quits.
#[derive(Parser, Debug)]
#[command(name = "air-painter", version, about)]
pub struct Cli {
    /// Camera index (0 = default webcam)
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Initial brush thickness in pixels
    #[arg(long, default_value_t = 5)]
    pub thickness: u32,

    /// Show the camera as-is instead of mirrored
    #[arg(long)]
    pub no_mirror: bool,

    /// Landmark JSON lines from an external hand detector ("-" for stdin).
    /// Without it, the mouse stands in for the fingertip.
    #[arg(long, value_name = "PATH")]
    pub landmarks: Option<PathBuf>,

    /// Hide the HUD and crosshair
    #[arg(long)]
    pub no_hud: bool,

    /// Log filter, env_logger syntax (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub camera: u32,
    pub width: u32,
    pub height: u32,
    pub thickness: u32,
    pub mirror: bool,
    pub landmarks: Option<PathBuf>,
    pub hud: bool,
}

impl TryFrom<Cli> for Config {
    type Error = Error;

    fn try_from(cli: Cli) -> Result<Self, Error> {
        let band = PaletteLayout::default().header_height;
        if cli.width == 0 {
            return Err(Error::Config("width must be positive".into()));
        }
        if cli.height <= band {
            return Err(Error::Config(format!(
                "height must leave room below the {band}px palette band"
            )));
        }
        if cli.thickness == 0 {
            return Err(Error::Config("thickness must be at least 1".into()));
        }
        Ok(Self {
            camera: cli.camera,
            width: cli.width,
            height: cli.height,
            thickness: cli.thickness,
            mirror: !cli.no_mirror,
            landmarks: cli.landmarks,
            hud: !cli.no_hud,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, Error> {
        let cli = Cli::try_parse_from(std::iter::once("air-painter").chain(args.iter().copied()))
            .map_err(|e| Error::Config(e.to_string()))?;
        Config::try_from(cli)
    }

    #[test]
    fn defaults() {
        let c = parse(&[]).unwrap();
        assert_eq!((c.width, c.height, c.thickness), (1280, 720, 5));
        assert!(c.mirror && c.hud);
        assert_eq!(c.landmarks, None);
    }

    #[test]
    fn flags_are_applied() {
        let c = parse(&["--camera", "2", "--no-mirror", "--landmarks", "-", "--thickness", "9"]).unwrap();
        assert_eq!(c.camera, 2);
        assert!(!c.mirror);
        assert_eq!(c.landmarks, Some(PathBuf::from("-")));
        assert_eq!(c.thickness, 9);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(parse(&["--thickness", "0"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--height", "50"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--width", "0"]), Err(Error::Config(_))));
    }
}
