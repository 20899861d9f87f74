//! Fixed timestep simulation tick
//!
//! One call advances the game by 1/60 s. Menus and pauses are phases of the
//! same loop, so the driver never blocks.

use super::state::{BestOf, GamePhase, GameState, MatchConfig, Side};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move the player paddle up (held)
    pub up: bool,
    /// Move the player paddle down (held)
    pub down: bool,
    /// Match length picked in the menu (one-shot)
    pub choice: Option<BestOf>,
    /// Escape pressed (one-shot)
    pub escape: bool,
    /// Window close / quit requested (one-shot)
    pub quit: bool,
}

/// What the driver should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Leave the game loop and end the process
    Exit,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    state.time_ticks += 1;

    if input.quit {
        log::info!("Quit requested");
        return TickOutcome::Exit;
    }

    match state.phase {
        GamePhase::ModeSelect => return choose_mode(state, input),
        GamePhase::Playing => {
            handle_input(state, input);
            update(state);
            check_game_over(state);
        }
        GamePhase::RoundPause { ticks_left } => {
            state.phase = if ticks_left > 1 {
                GamePhase::RoundPause {
                    ticks_left: ticks_left - 1,
                }
            } else {
                GamePhase::Playing
            };
        }
        GamePhase::MatchOver { winner, ticks_left } => {
            state.phase = if ticks_left > 1 {
                GamePhase::MatchOver {
                    winner,
                    ticks_left: ticks_left - 1,
                }
            } else {
                log::info!("Returning to menu");
                GamePhase::ModeSelect
            };
        }
    }

    TickOutcome::Continue
}

/// Move the player paddle from held keys
pub fn handle_input(state: &mut GameState, input: &TickInput) {
    if input.up {
        state.player.move_by(-PADDLE_STEP, state.height);
    }
    if input.down {
        state.player.move_by(PADDLE_STEP, state.height);
    }
}

/// Ball physics, scoring and round bookkeeping for one playing tick
pub fn update(state: &mut GameState) {
    if let Some(cue) = state.ball.move_step() {
        state.push_cue(cue);
    }

    let player_box = state.player.rect();
    let ai_box = state.ai.rect();
    if let Some(cue) = state.ball.check_collision(&player_box, &ai_box) {
        state.push_cue(cue);
    }

    if state.ball.pos.x <= 0.0 {
        score_point(state, Side::Ai);
    } else if state.ball.pos.x >= state.width {
        score_point(state, Side::Player);
    }

    if let Some(winner) = state.score.round_winner(state.config.win_target) {
        state.score.close_round(winner);
        state.reset_ball();
        log::info!(
            "{} takes the round (rounds {} - {})",
            winner.label(),
            state.score.player_round_wins,
            state.score.ai_round_wins
        );
        state.phase = GamePhase::RoundPause {
            ticks_left: ROUND_PAUSE_TICKS,
        };
    }

    let ball_box = state.ball.rect();
    state.ai.auto_track(&ball_box, state.height, AI_TRACK_SPEED);
}

fn score_point(state: &mut GameState, side: Side) {
    state.score.award_point(side);
    log::debug!(
        "Point {}: {} - {}",
        side.label(),
        state.score.player_score,
        state.score.ai_score
    );
    state.reset_ball();
}

/// Enter the winner banner once either side holds a majority of rounds.
///
/// A round that decides the match skips the between-round pause; the banner
/// hold replaces it.
pub fn check_game_over(state: &mut GameState) {
    if matches!(state.phase, GamePhase::MatchOver { .. } | GamePhase::ModeSelect) {
        return;
    }
    if let Some(winner) = state.score.match_winner(state.config.best_of) {
        log::info!(
            "{} wins the match {} - {} ({})",
            winner.label(),
            state.score.player_round_wins,
            state.score.ai_round_wins,
            state.config.best_of
        );
        state.phase = GamePhase::MatchOver {
            winner,
            ticks_left: MATCH_OVER_TICKS,
        };
    }
}

/// Menu handling: pick a match length or leave
pub fn choose_mode(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if input.escape {
        log::info!("Exit chosen from menu");
        return TickOutcome::Exit;
    }

    if let Some(best_of) = input.choice {
        let config = MatchConfig::new(best_of, state.config.win_target);
        log::info!(
            "Starting match: {} rounds, {} points per round",
            config.best_of.rounds(),
            config.win_target
        );
        state.start_match(config);
    }

    TickOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Cue;
    use crate::sim::state::Scoreboard;
    use glam::Vec2;

    fn playing_state(best_of: BestOf) -> GameState {
        let mut state = GameState::new(12345);
        let input = TickInput {
            choice: Some(best_of),
            ..Default::default()
        };
        tick(&mut state, &input);
        state.drain_cues().for_each(drop);
        state
    }

    #[test]
    fn test_menu_waits_for_choice() {
        let mut state = GameState::new(12345);
        let ball = state.ball.clone();
        for _ in 0..10 {
            assert_eq!(tick(&mut state, &TickInput::default()), TickOutcome::Continue);
        }
        assert_eq!(state.phase, GamePhase::ModeSelect);
        assert_eq!(state.ball, ball);
    }

    #[test]
    fn test_menu_choice_starts_match() {
        let mut state = GameState::new(12345);
        state.score.player_round_wins = 2;
        let input = TickInput {
            choice: Some(BestOf::Seven),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.config.best_of, BestOf::Seven);
        assert_eq!(state.config.win_target, DEFAULT_WIN_TARGET);
        assert_eq!(state.score, Scoreboard::default());
    }

    #[test]
    fn test_menu_escape_exits() {
        let mut state = GameState::new(12345);
        let input = TickInput {
            escape: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut state, &input), TickOutcome::Exit);
    }

    #[test]
    fn test_escape_ignored_while_playing() {
        let mut state = playing_state(BestOf::Five);
        let input = TickInput {
            escape: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut state, &input), TickOutcome::Continue);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_quit_exits_from_any_phase() {
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        let mut state = playing_state(BestOf::Three);
        assert_eq!(tick(&mut state, &quit), TickOutcome::Exit);

        let mut state = GameState::new(1);
        assert_eq!(tick(&mut state, &quit), TickOutcome::Exit);
    }

    #[test]
    fn test_handle_input_moves_player() {
        let mut state = playing_state(BestOf::Five);
        let start = state.player.y;
        handle_input(
            &mut state,
            &TickInput {
                up: true,
                ..Default::default()
            },
        );
        assert_eq!(state.player.y, start - PADDLE_STEP);
        handle_input(
            &mut state,
            &TickInput {
                down: true,
                ..Default::default()
            },
        );
        assert_eq!(state.player.y, start);
        handle_input(&mut state, &TickInput::default());
        assert_eq!(state.player.y, start);
    }

    #[test]
    fn test_ball_leaving_right_scores_for_player() {
        let mut state = playing_state(BestOf::Five);
        state.ball.pos = Vec2::new(797.0, 100.0);
        state.ball.vel = Vec2::new(5.0, 3.0);

        update(&mut state);

        assert_eq!(state.score.player_score, 1);
        assert_eq!(state.score.ai_score, 0);
        assert_eq!(state.ball.pos, state.ball.spawn);
        assert_eq!(state.ball.vel.x, -5.0);
        assert!(state.pending_cues().contains(&Cue::Score));
    }

    #[test]
    fn test_ball_leaving_left_scores_for_ai() {
        let mut state = playing_state(BestOf::Five);
        state.ball.pos = Vec2::new(3.0, 20.0);
        state.ball.vel = Vec2::new(-5.0, 3.0);

        update(&mut state);

        assert_eq!(state.score.ai_score, 1);
        assert_eq!(state.score.player_score, 0);
        assert_eq!(state.ball.pos, state.ball.spawn);
    }

    #[test]
    fn test_round_ends_at_win_target() {
        let mut state = playing_state(BestOf::Five);
        state.score.player_score = 4;
        state.score.ai_score = 2;
        state.ball.pos = Vec2::new(799.0, 100.0);
        state.ball.vel = Vec2::new(5.0, 3.0);

        update(&mut state);

        assert_eq!(state.score.player_round_wins, 1);
        assert_eq!(state.score.ai_round_wins, 0);
        assert_eq!(state.score.player_score, 0);
        assert_eq!(state.score.ai_score, 0);
        assert_eq!(
            state.phase,
            GamePhase::RoundPause {
                ticks_left: ROUND_PAUSE_TICKS
            }
        );
    }

    #[test]
    fn test_round_close_serves_again() {
        let mut state = playing_state(BestOf::Five);
        state.score.player_score = 4;
        state.ball.pos = Vec2::new(799.0, 100.0);
        state.ball.vel = Vec2::new(5.0, 3.0);

        update(&mut state);

        // Once for the point, once for the round
        assert_eq!(state.pending_cues(), &[Cue::Score, Cue::Score]);
        assert_eq!(state.ball.vel.x, 5.0);
        assert_eq!(state.ball.pos, state.ball.spawn);
    }

    #[test]
    fn test_round_pause_then_resume() {
        let mut state = playing_state(BestOf::Five);
        state.phase = GamePhase::RoundPause { ticks_left: 3 };
        let ball = state.ball.clone();
        let held = TickInput {
            up: true,
            ..Default::default()
        };
        let paddle_y = state.player.y;

        tick(&mut state, &held);
        tick(&mut state, &held);
        assert_eq!(state.phase, GamePhase::RoundPause { ticks_left: 1 });
        assert_eq!(state.ball, ball);
        assert_eq!(state.player.y, paddle_y);

        tick(&mut state, &held);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_deciding_round_ends_match() {
        let mut state = playing_state(BestOf::Three);
        state.score.player_round_wins = 1;
        state.score.player_score = 4;
        state.ball.pos = Vec2::new(799.0, 100.0);
        state.ball.vel = Vec2::new(5.0, 3.0);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score.player_round_wins, 2);
        assert_eq!(
            state.phase,
            GamePhase::MatchOver {
                winner: Side::Player,
                ticks_left: MATCH_OVER_TICKS
            }
        );
    }

    #[test]
    fn test_match_over_returns_to_menu() {
        let mut state = playing_state(BestOf::Three);
        state.phase = GamePhase::MatchOver {
            winner: Side::Ai,
            ticks_left: MATCH_OVER_TICKS,
        };
        for _ in 0..MATCH_OVER_TICKS - 1 {
            tick(&mut state, &TickInput::default());
        }
        assert!(matches!(state.phase, GamePhase::MatchOver { .. }));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::ModeSelect);
    }

    #[test]
    fn test_ai_tracks_ball() {
        let mut state = playing_state(BestOf::Five);
        state.ball.pos = Vec2::new(400.0, 50.0);
        state.ball.vel = Vec2::new(5.0, 3.0);
        let before = state.ai.y;
        update(&mut state);
        assert_eq!(state.ai.y, before - AI_TRACK_SPEED);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                choice: Some(BestOf::Five),
                ..Default::default()
            },
            TickInput {
                up: true,
                ..Default::default()
            },
            TickInput {
                down: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..500 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.ball, state2.ball);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
    }
}
