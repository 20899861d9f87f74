//! Whole matches driven through the public tick API

use glam::Vec2;

use rally_pong::Cue;
use rally_pong::consts::*;
use rally_pong::sim::{
    BestOf, GamePhase, GameState, MatchConfig, Scoreboard, Side, TickInput, TickOutcome, tick,
};

fn idle() -> TickInput {
    TickInput::default()
}

fn choose(best_of: BestOf) -> TickInput {
    TickInput {
        choice: Some(best_of),
        ..Default::default()
    }
}

fn run_ticks(state: &mut GameState, n: u32, input: &TickInput) {
    for _ in 0..n {
        assert_eq!(tick(state, input), TickOutcome::Continue);
    }
}

/// Send the ball straight out past `scorer`'s opponent on the next tick
fn score_for(state: &mut GameState, scorer: Side) {
    let y = state.height / 2.0;
    match scorer {
        Side::Player => {
            state.ball.pos = Vec2::new(state.width - 1.0, y);
            state.ball.vel = Vec2::new(BALL_SPEED_X, 0.0);
        }
        Side::Ai => {
            state.ball.pos = Vec2::new(1.0, y);
            state.ball.vel = Vec2::new(-BALL_SPEED_X, 0.0);
        }
    }
    assert_eq!(tick(state, &idle()), TickOutcome::Continue);
}

/// Play out a round won `win_target` to zero
fn win_round(state: &mut GameState, winner: Side) {
    assert_eq!(state.phase, GamePhase::Playing);
    for _ in 0..state.config.win_target {
        score_for(state, winner);
    }
}

/// Let the between-round pause run out
fn finish_pause(state: &mut GameState) {
    assert_eq!(
        state.phase,
        GamePhase::RoundPause {
            ticks_left: ROUND_PAUSE_TICKS
        }
    );
    run_ticks(state, ROUND_PAUSE_TICKS, &idle());
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn best_of_three_sweep_returns_to_menu() {
    let mut state = GameState::new(11);
    assert_eq!(state.phase, GamePhase::ModeSelect);

    run_ticks(&mut state, 1, &choose(BestOf::Three));
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.config, MatchConfig::new(BestOf::Three, DEFAULT_WIN_TARGET));

    win_round(&mut state, Side::Player);
    assert_eq!(state.score.player_round_wins, 1);
    assert_eq!((state.score.player_score, state.score.ai_score), (0, 0));
    finish_pause(&mut state);

    win_round(&mut state, Side::Player);
    assert_eq!(
        state.phase,
        GamePhase::MatchOver {
            winner: Side::Player,
            ticks_left: MATCH_OVER_TICKS
        }
    );

    run_ticks(&mut state, MATCH_OVER_TICKS - 1, &idle());
    assert!(matches!(state.phase, GamePhase::MatchOver { .. }));
    run_ticks(&mut state, 1, &idle());
    assert_eq!(state.phase, GamePhase::ModeSelect);

    // Next match starts from clean counters
    run_ticks(&mut state, 1, &choose(BestOf::Five));
    assert_eq!(state.score, Scoreboard::default());
    assert_eq!(state.config.best_of, BestOf::Five);
}

#[test]
fn best_of_five_needs_three_rounds() {
    let mut state = GameState::new(5);
    run_ticks(&mut state, 1, &choose(BestOf::Five));

    for winner in [Side::Ai, Side::Player, Side::Ai] {
        win_round(&mut state, winner);
        finish_pause(&mut state);
    }
    assert_eq!(state.score.ai_round_wins, 2);
    assert_eq!(state.score.player_round_wins, 1);

    win_round(&mut state, Side::Ai);
    assert!(matches!(
        state.phase,
        GamePhase::MatchOver {
            winner: Side::Ai,
            ..
        }
    ));
}

#[test]
fn round_ends_on_the_fifth_point() {
    let mut state = GameState::new(2);
    run_ticks(&mut state, 1, &choose(BestOf::Seven));
    state.score.player_score = 4;
    state.score.ai_score = 2;

    score_for(&mut state, Side::Player);

    assert_eq!(state.score.player_round_wins, 1);
    assert_eq!(state.score.ai_round_wins, 0);
    assert_eq!((state.score.player_score, state.score.ai_score), (0, 0));
    assert!(matches!(state.phase, GamePhase::RoundPause { .. }));
    assert_eq!(state.ball.pos, state.ball.spawn);
}

#[test]
fn closing_a_round_serves_twice() {
    let mut state = GameState::new(6);
    run_ticks(&mut state, 1, &choose(BestOf::Five));
    state.score.ai_score = 4;
    state.drain_cues().for_each(drop);

    score_for(&mut state, Side::Ai);

    assert_eq!(
        state.drain_cues().collect::<Vec<_>>(),
        vec![Cue::Score, Cue::Score]
    );
    assert_eq!(state.ball.vel.x, -BALL_SPEED_X);
    assert_eq!(state.score.ai_round_wins, 1);
}

#[test]
fn custom_win_target_shortens_rounds() {
    let mut state = GameState::new(8);
    state.config = MatchConfig::new(BestOf::Three, 2);
    run_ticks(&mut state, 1, &choose(BestOf::Three));
    assert_eq!(state.config.win_target, 2);

    score_for(&mut state, Side::Ai);
    assert_eq!(state.phase, GamePhase::Playing);
    score_for(&mut state, Side::Ai);
    assert!(matches!(state.phase, GamePhase::RoundPause { .. }));
}

#[test]
fn every_point_plays_the_score_cue() {
    let mut state = GameState::new(4);
    run_ticks(&mut state, 1, &choose(BestOf::Three));
    state.drain_cues().for_each(drop);

    score_for(&mut state, Side::Player);
    assert_eq!(state.drain_cues().collect::<Vec<_>>(), vec![Cue::Score]);
}

#[test]
fn paddles_are_frozen_during_the_pause() {
    let mut state = GameState::new(9);
    run_ticks(&mut state, 1, &choose(BestOf::Three));
    win_round(&mut state, Side::Player);

    let player = state.player.clone();
    let ball = state.ball.clone();
    let up = TickInput {
        up: true,
        ..Default::default()
    };
    run_ticks(&mut state, 10, &up);

    assert_eq!(state.player, player);
    assert_eq!(state.ball, ball);
}

#[test]
fn quit_is_honoured_in_every_phase() {
    let quit = TickInput {
        quit: true,
        ..Default::default()
    };

    let mut state = GameState::new(1);
    assert_eq!(tick(&mut state, &quit), TickOutcome::Exit);

    run_ticks(&mut state, 1, &choose(BestOf::Three));
    assert_eq!(tick(&mut state, &quit), TickOutcome::Exit);

    win_round(&mut state, Side::Ai);
    assert_eq!(tick(&mut state, &quit), TickOutcome::Exit);
}

#[test]
fn escape_only_exits_from_the_menu() {
    let escape = TickInput {
        escape: true,
        ..Default::default()
    };

    let mut state = GameState::new(1);
    run_ticks(&mut state, 1, &choose(BestOf::Three));
    run_ticks(&mut state, 5, &escape);
    assert_eq!(state.phase, GamePhase::Playing);

    let mut menu = GameState::new(1);
    assert_eq!(tick(&mut menu, &escape), TickOutcome::Exit);
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    let script = |t: u64| TickInput {
        up: t % 90 < 30,
        down: t % 90 >= 60,
        choice: (t == 0).then_some(BestOf::Seven),
        ..Default::default()
    };

    let mut a = GameState::new(1234);
    let mut b = GameState::new(1234);
    for t in 0..3000 {
        tick(&mut a, &script(t));
        tick(&mut b, &script(t));
    }

    assert_eq!(a.ball, b.ball);
    assert_eq!(a.player, b.player);
    assert_eq!(a.ai, b.ai);
    assert_eq!(a.score, b.score);
    assert_eq!(a.phase, b.phase);
    assert_eq!(a.pending_cues(), b.pending_cues());
}
