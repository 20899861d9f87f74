//! Frame driver shared by the web and native frontends
//!
//! Converts variable frame times into fixed simulation ticks, forwards sound
//! cues to the audio sink and builds the frame's draw list.

use glam::Vec2;

use crate::audio::CueSink;
use crate::consts::*;
use crate::input::InputState;
use crate::renderer::canvas::{Anchor, Canvas, DrawList, TextSize, colors};
use crate::renderer::scene;
use crate::settings::Settings;
use crate::sim::{GameState, TickOutcome, tick};

/// Longest frame time fed to the accumulator (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// What the frontend should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// Stop the loop; the game is over
    Exit,
}

/// Game instance holding all state
pub struct App {
    state: GameState,
    input: InputState,
    audio: Box<dyn CueSink>,
    settings: Settings,
    accumulator: f32,
    draw_list: DrawList,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl App {
    pub fn new(seed: u64, settings: Settings, audio: Box<dyn CueSink>) -> Self {
        let mut state = GameState::new(seed);
        state.config = settings.match_config();
        log::info!(
            "Game initialized with seed {seed}, {} to {} points",
            state.config.best_of,
            state.config.win_target
        );

        Self {
            state,
            input: InputState::new(),
            audio,
            settings,
            accumulator: 0.0,
            draw_list: DrawList::new(),
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Advance by `dt` seconds of wall time; `time` is a timestamp in ms
    pub fn frame(&mut self, dt: f32, time: f64) -> FrameOutcome {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.take_tick_input();
            let outcome = tick(&mut self.state, &input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for cue in self.state.drain_cues() {
                self.audio.play(cue);
            }

            if outcome == TickOutcome::Exit {
                log::info!("Exit requested after {} ticks", self.state.time_ticks);
                return FrameOutcome::Exit;
            }
        }

        self.track_fps(time);
        FrameOutcome::Continue
    }

    /// Draw calls for the current state
    pub fn draw(&mut self) -> &DrawList {
        self.draw_list.clear();
        scene::render_frame(&self.state, &mut self.draw_list);

        if self.settings.show_fps {
            self.draw_list.text(
                &format!("{} FPS", self.fps),
                Vec2::new(14.0, 16.0),
                TextSize::Small,
                Anchor::TopLeft,
                colors::WHITE,
            );
        }

        &self.draw_list
    }

    fn track_fps(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one about to be overwritten
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = (59_000.0 / elapsed).round() as u32;
            }
        }
    }
}
