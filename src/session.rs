// One painting session: every piece of mutable state lives here and
// is advanced one camera frame at a time.
//
// Per frame: command edge → fingertip → palette pick → toggle → stroke
// → skeleton on the live frame → blend → crosshair/HUD → remaining command.

use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::canvas::Canvas;
use crate::command::{dispatch, Command, CommandLatch, Flow};
use crate::compositor::composite;
use crate::draw::{draw_crosshair, draw_hand, draw_text_5x7};
use crate::error::Error;
use crate::landmarks::HandDetector;
use crate::mode::{DrawState, DrawStateMachine};
use crate::palette::Palette;
use crate::pointer::{HandLandmarks, PointerTracker};
use crate::stroke::{BrushState, StrokeRenderer};
use crate::types::{Color, FrameBuffer, Point};

/// Where live frames come from. A failed frame ends the session.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<FrameBuffer, Error>;
}

/// The window side: shows frames, reports keys and the mouse.
pub trait Surface {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Error>;
    fn is_open(&self) -> bool;
    /// The command whose key is held right now (a level, not an event).
    /// Called once per frame; implementations may track key events in between.
    fn held_command(&mut self) -> Option<Command>;
    /// Mouse position normalized to [0,1], if it is over the window.
    fn pointer(&self) -> Option<(f32, f32)>;
}

/// Who supplies the hand each frame.
pub enum HandInput {
    /// The mouse stands in for the fingertip.
    Pointer,
    Detector(Box<dyn HandDetector>),
}

pub struct Session {
    canvas: Canvas,
    palette: Palette,
    brush: BrushState,
    mode: DrawStateMachine,
    stroke: StrokeRenderer,
    tracker: PointerTracker,
    latch: CommandLatch,
    underlay: FrameBuffer, // copy of the live frame the skeleton is traced on
    display: FrameBuffer,  // what the window shows; never read back into the canvas
    hud: bool,
}

impl Session {
    pub fn new(width: usize, height: usize, palette: Palette, brush: BrushState, hud: bool) -> Self {
        let canvas = Canvas::new(width, height, Color::WHITE, &palette);
        Self {
            canvas,
            palette,
            brush,
            mode: DrawStateMachine::new(),
            stroke: StrokeRenderer::new(),
            tracker: PointerTracker::new(width, height),
            latch: CommandLatch::new(),
            underlay: FrameBuffer::new(width, height, Color::BLACK),
            display: FrameBuffer::new(width, height, Color::BLACK),
            hud,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    pub fn draw_state(&self) -> DrawState {
        self.mode.state()
    }

    pub fn display(&self) -> &FrameBuffer {
        &self.display
    }

    /// Advance by one frame. `held` is the command key held this frame.
    ///
    /// Visual: the window shows the camera and the canvas at half strength each,
    /// with the hand skeleton blended in like the rest of the camera image and
    /// the crosshair and HUD on top at full strength.
    pub fn step(
        &mut self,
        live: &FrameBuffer,
        hand: Option<&HandLandmarks>,
        held: Option<Command>,
    ) -> Result<Flow, Error> {
        // 1) Inputs: one command edge and one fingertip sample.
        let command = self.latch.rising(held);
        let sample = self.tracker.track(hand);

        // 2) A fingertip on the palette picks a color and draws nothing.
        let picked = sample.and_then(|p| self.palette.hit_test(p.x, p.y));
        if let Some(swatch) = picked {
            if self.brush.color != swatch.color {
                debug!("brush color: {}", swatch.name);
            }
            self.brush.color = swatch.color;
        }

        // 3) Toggle lands before the stroke so the same frame draws (or stops).
        if command == Some(Command::ToggleDraw) {
            dispatch(Command::ToggleDraw, &mut self.canvas, &mut self.brush, &mut self.mode);
        }

        // 4) Stroke.
        if picked.is_some() {
            self.stroke.break_stroke();
        } else if let Some(seg) =
            self.stroke.render(&mut self.canvas, self.mode.state(), sample, &self.brush)
        {
            trace!("segment {:?} -> {:?} ({}px, #{:06x})", seg.from, seg.to, seg.thickness, seg.color.0);
        }

        // 5) Skeleton on a copy of the live frame, then the blend, then the HUD.
        let shown = match hand {
            Some(hand) => {
                if live.dimensions() != self.underlay.dimensions() {
                    return Err(Error::SizeMismatch {
                        what: "live frame",
                        expected: self.underlay.dimensions(),
                        got: live.dimensions(),
                    });
                }
                self.underlay.pixels.copy_from_slice(&live.pixels);
                draw_hand(&mut self.underlay, hand, &self.tracker);
                &self.underlay
            }
            None => live,
        };
        composite(shown, self.canvas.pixels(), &mut self.display)?;
        self.draw_hud(sample);

        // 6) Everything else takes effect from the next frame on.
        Ok(match command {
            Some(cmd) if cmd != Command::ToggleDraw => {
                dispatch(cmd, &mut self.canvas, &mut self.brush, &mut self.mode)
            }
            _ => Flow::Continue,
        })
    }

    /// Crosshair at the fingertip and the status line along the bottom edge.
    fn draw_hud(&mut self, sample: Option<Point>) {
        if !self.hud {
            return;
        }
        if let Some(p) = sample {
            draw_crosshair(&mut self.display, p.x, p.y, 12, 0x00_FF_CC_33);
        }
        let mode = match self.mode.state() {
            DrawState::Drawing => "DRAW",
            DrawState::Idle => "IDLE",
        };
        let color = self.palette.name_of(self.brush.color).unwrap_or("custom");
        let hud = format!("{mode} | SIZE {} | {color} | SPACE C + - Q", self.brush.thickness());
        let y = self.display.height as i32 - 14;
        draw_text_5x7(&mut self.display, 8, y, &hud, 0x00_FF_FF_FF);
    }
}

/// Drive the session until quit, window close, or a failed frame.
pub fn run<F, S>(
    session: &mut Session,
    frames: &mut F,
    surface: &mut S,
    hands: &mut HandInput,
) -> Result<(), Error>
where
    F: FrameSource,
    S: Surface,
{
    info!("session started ({}x{})", session.canvas.width(), session.canvas.height());

    let mut total_frames: u64 = 0;
    let mut frames_this_second: u32 = 0;
    let mut last_fps_time = Instant::now();

    while surface.is_open() {
        // Blocks until the camera delivers; failure is fatal, no retry.
        let live = frames.next_frame()?;

        let hand = match hands {
            HandInput::Pointer => surface.pointer().map(|(x, y)| HandLandmarks::at(x, y)),
            HandInput::Detector(detector) => detector.detect(&live),
        };
        let held = surface.held_command();

        let flow = session.step(&live, hand.as_ref(), held)?;
        surface.present(session.display())?;
        total_frames += 1;

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            debug!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }

        if flow == Flow::Quit {
            break;
        }
    }

    info!("session ended after {total_frames} frames");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    const W: usize = 400;
    const H: usize = 300;

    fn session() -> Session {
        Session::new(W, H, Palette::standard().unwrap(), BrushState::new(Color::RED, 5), false)
    }

    fn live() -> FrameBuffer {
        FrameBuffer::new(W, H, Color::BLACK)
    }

    fn at(x: i32, y: i32) -> HandLandmarks {
        HandLandmarks::at(x as f32 / W as f32, y as f32 / H as f32)
    }

    fn drawn(s: &Session, x: i32, y: i32) -> Option<Color> {
        s.canvas().pixels().get(x, y)
    }

    #[test]
    fn end_to_end_scenario() {
        let mut s = session();
        let frame = live();
        assert_eq!(s.draw_state(), DrawState::Idle);

        s.step(&frame, None, Some(Command::ToggleDraw)).unwrap();
        assert_eq!(s.draw_state(), DrawState::Drawing);

        s.step(&frame, Some(&at(100, 100)), None).unwrap();
        s.step(&frame, Some(&at(200, 100)), None).unwrap();
        for x in [100, 150, 200] {
            for y in 98..=102 {
                assert_eq!(drawn(&s, x, y), Some(Color::RED), "({x},{y})");
            }
            assert_eq!(drawn(&s, x, 97), Some(Color::WHITE));
            assert_eq!(drawn(&s, x, 103), Some(Color::WHITE));
        }

        let before = s.canvas().pixels().clone();
        s.step(&frame, None, Some(Command::ToggleDraw)).unwrap();
        assert_eq!(s.draw_state(), DrawState::Idle);
        s.step(&frame, Some(&at(300, 100)), None).unwrap();
        assert_eq!(s.canvas().pixels(), &before);
    }

    #[test]
    fn holding_toggle_flips_once() {
        let mut s = session();
        let frame = live();
        for _ in 0..10 {
            s.step(&frame, Some(&at(100, 100)), Some(Command::ToggleDraw)).unwrap();
        }
        assert_eq!(s.draw_state(), DrawState::Drawing);
        s.step(&frame, None, None).unwrap();
        s.step(&frame, None, Some(Command::ToggleDraw)).unwrap();
        assert_eq!(s.draw_state(), DrawState::Idle);
    }

    #[test]
    fn missing_hand_splits_strokes() {
        let mut s = session();
        let frame = live();
        s.step(&frame, None, Some(Command::ToggleDraw)).unwrap();
        s.step(&frame, Some(&at(100, 200)), None).unwrap();
        s.step(&frame, None, None).unwrap();
        s.step(&frame, Some(&at(300, 200)), None).unwrap();
        assert_eq!(drawn(&s, 200, 200), Some(Color::WHITE));
    }

    #[test]
    fn palette_pick_changes_color_without_drawing() {
        let mut s = session();
        let frame = live();
        s.step(&frame, None, Some(Command::ToggleDraw)).unwrap();
        s.step(&frame, Some(&at(150, 150)), None).unwrap();
        // green swatch spans x 110..200 in the header band
        s.step(&frame, Some(&at(150, 20)), None).unwrap();
        assert_eq!(s.brush().color, Color::rgb(0, 255, 0));
        // no line from the anchor up to the palette, nor back down
        assert_eq!(drawn(&s, 150, 100), Some(Color::WHITE));
        s.step(&frame, Some(&at(150, 200)), None).unwrap();
        assert_eq!(drawn(&s, 150, 100), Some(Color::WHITE));
        s.step(&frame, Some(&at(150, 250)), None).unwrap();
        assert_eq!(drawn(&s, 150, 225), Some(Color::rgb(0, 255, 0)));
    }

    #[test]
    fn palette_pick_works_while_idle() {
        let mut s = Session::new(800, 300, Palette::standard().unwrap(), BrushState::default(), false);
        let hand = HandLandmarks::at(660.0 / 800.0, 20.0 / 300.0);
        s.step(&FrameBuffer::new(800, 300, Color::BLACK), Some(&hand), None).unwrap();
        assert_eq!(s.draw_state(), DrawState::Idle);
        assert_eq!(s.brush().color, Color::BLACK);
    }

    #[test]
    fn thickness_and_clear_fire_after_the_blend() {
        let mut s = session();
        let frame = live();
        s.step(&frame, None, Some(Command::ToggleDraw)).unwrap();
        s.step(&frame, Some(&at(100, 150)), None).unwrap();
        s.step(&frame, Some(&at(200, 150)), None).unwrap();

        assert_eq!(s.step(&frame, None, Some(Command::IncreaseThickness)).unwrap(), Flow::Continue);
        assert_eq!(s.brush().thickness(), 6);

        s.step(&frame, None, Some(Command::Clear)).unwrap();
        assert_eq!(drawn(&s, 150, 150), Some(Color::WHITE));
        assert_eq!(drawn(&s, 20, 20), Some(Color::RED)); // palette survives
    }

    #[test]
    fn quit_is_reported() {
        let mut s = session();
        assert_eq!(s.step(&live(), None, Some(Command::Quit)).unwrap(), Flow::Quit);
    }

    #[test]
    fn display_is_a_blend_and_canvas_stays_clean() {
        let mut s = session();
        s.step(&live(), None, None).unwrap();
        // white canvas over black camera
        assert_eq!(s.display().get(200, 200), Some(Color::rgb(128, 128, 128)));
        assert_eq!(drawn(&s, 200, 200), Some(Color::WHITE));
    }

    #[test]
    fn skeleton_is_blended_with_the_camera_image() {
        let mut s = session();
        let frame = live();
        s.step(&frame, Some(&at(200, 200)), None).unwrap();
        // red joint on a black frame, averaged with the white canvas
        assert_eq!(s.display().get(200, 200), Some(Color::rgb(255, 128, 128)));
        assert_eq!(s.display().get(250, 250), Some(Color::rgb(128, 128, 128)));
        // neither the caller's frame nor the canvas carries the skeleton
        assert_eq!(frame, live());
        assert_eq!(drawn(&s, 200, 200), Some(Color::WHITE));
    }

    #[test]
    fn a_wild_fingertip_draws_to_the_edge_and_nothing_breaks() {
        let mut s = Session::new(W, H, Palette::standard().unwrap(), BrushState::new(Color::RED, 5), true);
        let frame = live();
        s.step(&frame, None, Some(Command::ToggleDraw)).unwrap();
        s.step(&frame, Some(&at(100, 150)), None).unwrap();
        let wild = HandLandmarks::at(1e9, 150.0 / H as f32);
        s.step(&frame, Some(&wild), None).unwrap();
        assert_eq!(drawn(&s, 399, 150), Some(Color::RED));
        assert_eq!(drawn(&s, 399, 160), Some(Color::WHITE));
        // and from out there back into the frame
        s.step(&frame, Some(&at(300, 250)), None).unwrap();
        assert_eq!(drawn(&s, 300, 250), Some(Color::RED));
    }

    #[test]
    fn wrong_frame_size_is_an_error() {
        let mut s = session();
        let small = FrameBuffer::new(10, 10, Color::BLACK);
        assert!(matches!(s.step(&small, None, None), Err(Error::SizeMismatch { .. })));
        assert!(matches!(
            s.step(&small, Some(&at(5, 5)), None),
            Err(Error::SizeMismatch { what: "live frame", .. })
        ));
    }

    /* ---------- the loop, with fakes for camera and window ---------- */

    struct Frames {
        left: usize,
    }

    impl FrameSource for Frames {
        fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
            if self.left == 0 {
                return Err(Error::CameraFrame("unplugged".into()));
            }
            self.left -= 1;
            Ok(live())
        }
    }

    #[derive(Default)]
    struct Screen {
        keys: VecDeque<Option<Command>>,
        mouse: VecDeque<Option<(f32, f32)>>,
        presented: usize,
    }

    impl Surface for Screen {
        fn present(&mut self, _frame: &FrameBuffer) -> Result<(), Error> {
            self.presented += 1;
            self.keys.pop_front();
            self.mouse.pop_front();
            Ok(())
        }
        fn is_open(&self) -> bool {
            true
        }
        fn held_command(&mut self) -> Option<Command> {
            self.keys.front().copied().flatten()
        }
        fn pointer(&self) -> Option<(f32, f32)> {
            self.mouse.front().copied().flatten()
        }
    }

    struct Scripted(VecDeque<Option<HandLandmarks>>);

    impl HandDetector for Scripted {
        fn detect(&mut self, _frame: &FrameBuffer) -> Option<HandLandmarks> {
            self.0.pop_front().flatten()
        }
    }

    #[test]
    fn run_draws_with_the_mouse_and_stops_on_quit() {
        let mut s = session();
        let mut frames = Frames { left: 100 };
        let mut screen = Screen {
            keys: [Some(Command::ToggleDraw), None, None, Some(Command::Quit)].into(),
            mouse: [None, Some((0.25, 0.5)), Some((0.5, 0.5)), None].into(),
            presented: 0,
        };
        run(&mut s, &mut frames, &mut screen, &mut HandInput::Pointer).unwrap();
        assert_eq!(screen.presented, 4);
        assert_eq!(drawn(&s, 150, 150), Some(Color::RED));
    }

    #[test]
    fn run_uses_the_detector_when_given() {
        let mut s = session();
        let mut frames = Frames { left: 100 };
        let mut screen = Screen {
            keys: [Some(Command::ToggleDraw), None, None, Some(Command::Quit)].into(),
            ..Default::default()
        };
        let script = Scripted([None, Some(at(100, 250)), Some(at(300, 250)), None].into());
        let mut hands = HandInput::Detector(Box::new(script));
        run(&mut s, &mut frames, &mut screen, &mut hands).unwrap();
        assert_eq!(drawn(&s, 200, 250), Some(Color::RED));
    }

    #[test]
    fn run_fails_fast_when_the_camera_dies() {
        let mut s = session();
        let mut frames = Frames { left: 2 };
        let mut screen = Screen::default();
        let err = run(&mut s, &mut frames, &mut screen, &mut HandInput::Pointer).unwrap_err();
        assert!(matches!(err, Error::CameraFrame(_)));
        assert_eq!(screen.presented, 2);
    }
}
