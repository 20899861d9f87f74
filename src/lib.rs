//! Rally Pong - classic two-paddle Pong played as best-of-N matches
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball, paddles, scoring, match phases)
//! - `renderer`: Scene drawing and the WebGPU pipeline that presents it
//! - `audio`: Named sound cues and the platform players for them
//! - `app`: Fixed-timestep driver shared by the web and native frontends
//! - `input`: Keyboard state latched between ticks
//! - `settings`: Persisted player preferences

pub mod app;
pub mod audio;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{App, FrameOutcome};
pub use audio::{Cue, CueSink};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield size in logical pixels
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    /// Gap between the player paddle and the left wall
    pub const PADDLE_MARGIN: f32 = 10.0;
    /// Player paddle travel per tick while a key is held
    pub const PADDLE_STEP: f32 = 10.0;
    /// AI paddle maximum travel per tick
    pub const AI_TRACK_SPEED: f32 = 6.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 7.0;
    pub const BALL_SPEED_X: f32 = 5.0;
    pub const BALL_SPEED_Y: f32 = 3.0;

    /// Points needed to take a round unless settings override it
    pub const DEFAULT_WIN_TARGET: u32 = 5;

    /// Pause between rounds (1 second)
    pub const ROUND_PAUSE_TICKS: u32 = TICK_HZ;
    /// How long the winner banner stays up (2 seconds)
    pub const MATCH_OVER_TICKS: u32 = 2 * TICK_HZ;
}
