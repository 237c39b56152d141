// Discrete commands from the keyboard and what they do to the session.
// Keys are sampled as a level each frame; `CommandLatch` turns that into
// one event per press so holding a key never repeats it.

use log::{debug, info};

use crate::canvas::Canvas;
use crate::mode::DrawStateMachine;
use crate::stroke::BrushState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleDraw,
    Quit,
    Clear,
    IncreaseThickness,
    DecreaseThickness,
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Rising-edge detector over the held command.
#[derive(Debug, Default)]
pub struct CommandLatch {
    held: Option<Command>,
}

impl CommandLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's held command. Returns it only on the frame it became held.
    pub fn rising(&mut self, held: Option<Command>) -> Option<Command> {
        let fired = match held {
            Some(cmd) if self.held != Some(cmd) => Some(cmd),
            _ => None,
        };
        self.held = held;
        fired
    }
}

/// Apply one command to the session state.
pub fn dispatch(
    cmd: Command,
    canvas: &mut Canvas,
    brush: &mut BrushState,
    mode: &mut DrawStateMachine,
) -> Flow {
    match cmd {
        Command::ToggleDraw => {
            let state = mode.toggle();
            info!("draw mode: {state:?}");
        }
        Command::Clear => {
            canvas.clear();
            debug!("canvas cleared");
        }
        Command::IncreaseThickness => {
            let t = brush.thicker();
            debug!("thickness: {t}");
        }
        Command::DecreaseThickness => {
            let t = brush.thinner();
            debug!("thickness: {t}");
        }
        Command::Quit => {
            info!("quit requested");
            return Flow::Quit;
        }
    }
    Flow::Continue
}
