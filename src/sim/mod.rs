//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies (sounds leave as queued cues)

pub mod ball;
pub mod paddle;
pub mod rect;
pub mod state;
pub mod tick;

pub use ball::Ball;
pub use paddle::Paddle;
pub use rect::Rect;
pub use state::{BestOf, GamePhase, GameState, MatchConfig, Scoreboard, Side};
pub use tick::{TickInput, TickOutcome, check_game_over, choose_mode, handle_input, tick, update};
