//! Game state and match bookkeeping
//!
//! Everything the tick mutates lives in [`GameState`]; renderers only read it.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::paddle::Paddle;
use crate::audio::Cue;
use crate::consts::*;

/// Which side of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Player => "PLAYER",
            Side::Ai => "AI",
        }
    }
}

/// Match length options offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BestOf {
    Three,
    #[default]
    Five,
    Seven,
}

impl BestOf {
    pub const ALL: [BestOf; 3] = [BestOf::Three, BestOf::Five, BestOf::Seven];

    pub fn rounds(&self) -> u32 {
        match self {
            BestOf::Three => 3,
            BestOf::Five => 5,
            BestOf::Seven => 7,
        }
    }

    /// Round wins that clinch the match (a strict majority)
    pub fn rounds_to_win(&self) -> u32 {
        self.rounds() / 2 + 1
    }

    pub fn from_rounds(rounds: u32) -> Option<Self> {
        match rounds {
            3 => Some(BestOf::Three),
            5 => Some(BestOf::Five),
            7 => Some(BestOf::Seven),
            _ => None,
        }
    }
}

impl fmt::Display for BestOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Best of {}", self.rounds())
    }
}

/// Match rules chosen in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    pub best_of: BestOf,
    /// Points that end a round
    pub win_target: u32,
}

impl MatchConfig {
    pub fn new(best_of: BestOf, win_target: u32) -> Self {
        Self {
            best_of,
            win_target: win_target.max(1),
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(BestOf::default(), DEFAULT_WIN_TARGET)
    }
}

/// Points in the current round and rounds taken in the current match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scoreboard {
    pub player_score: u32,
    pub ai_score: u32,
    pub player_round_wins: u32,
    pub ai_round_wins: u32,
}

impl Scoreboard {
    pub fn award_point(&mut self, side: Side) {
        match side {
            Side::Player => self.player_score += 1,
            Side::Ai => self.ai_score += 1,
        }
    }

    /// Side that has taken the round, if either score reached the target
    pub fn round_winner(&self, win_target: u32) -> Option<Side> {
        if self.player_score < win_target && self.ai_score < win_target {
            return None;
        }
        if self.player_score > self.ai_score {
            Some(Side::Player)
        } else {
            Some(Side::Ai)
        }
    }

    /// Credit a round win and clear both round scores
    pub fn close_round(&mut self, winner: Side) {
        match winner {
            Side::Player => self.player_round_wins += 1,
            Side::Ai => self.ai_round_wins += 1,
        }
        self.player_score = 0;
        self.ai_score = 0;
    }

    /// Side that has taken the match, if either reached the majority
    pub fn match_winner(&self, best_of: BestOf) -> Option<Side> {
        let needed = best_of.rounds_to_win();
        if self.player_round_wins >= needed {
            Some(Side::Player)
        } else if self.ai_round_wins >= needed {
            Some(Side::Ai)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Match length menu (start of every match)
    ModeSelect,
    /// Active rally
    Playing,
    /// Short hold after a round is decided
    RoundPause { ticks_left: u32 },
    /// Winner banner, then back to the menu
    MatchOver { winner: Side, ticks_left: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub config: MatchConfig,
    pub score: Scoreboard,
    pub player: Paddle,
    pub ai: Paddle,
    pub ball: Ball,
    /// Playfield size
    pub width: f32,
    pub height: f32,
    /// Sound cues raised since the last drain
    cues: Vec<Cue>,
}

impl GameState {
    /// Create a new game on the standard 800x600 field
    pub fn new(seed: u64) -> Self {
        Self::with_size(seed, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    pub fn with_size(seed: u64, width: f32, height: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let paddle_y = height / 2.0 - PADDLE_HEIGHT / 2.0;
        let player = Paddle::new(PADDLE_MARGIN, paddle_y, PADDLE_WIDTH, PADDLE_HEIGHT);
        let ai = Paddle::new(
            width - PADDLE_MARGIN - PADDLE_WIDTH,
            paddle_y,
            PADDLE_WIDTH,
            PADDLE_HEIGHT,
        );
        let ball = Ball::new(
            Vec2::new(width / 2.0, height / 2.0),
            Vec2::splat(BALL_SIZE),
            Vec2::new(width, height),
            &mut rng,
        );

        Self {
            seed,
            rng,
            time_ticks: 0,
            phase: GamePhase::ModeSelect,
            config: MatchConfig::default(),
            score: Scoreboard::default(),
            player,
            ai,
            ball,
            width,
            height,
            cues: Vec::new(),
        }
    }

    /// Serve the ball again from the center
    pub fn reset_ball(&mut self) {
        let cue = self.ball.reset(&mut self.rng);
        self.cues.push(cue);
    }

    pub fn push_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    /// Cues raised since the last call, oldest first
    pub fn drain_cues(&mut self) -> std::vec::Drain<'_, Cue> {
        self.cues.drain(..)
    }

    /// Cues waiting to be played
    pub fn pending_cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Begin a fresh match with the given rules
    pub fn start_match(&mut self, config: MatchConfig) {
        self.config = config;
        self.score.clear();
        self.reset_ball();
        self.phase = GamePhase::Playing;
    }
}
