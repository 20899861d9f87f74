//! Scene composition
//!
//! Pure functions from game state to draw calls. Rendering never mutates the
//! state, so drawing the same state twice yields identical frames.

use glam::Vec2;

use super::canvas::{Anchor, Canvas, TextSize, colors};
use crate::sim::{BestOf, GamePhase, GameState, Rect, Side};

/// Thickness of the blue top and bottom borders
pub const BORDER_THICKNESS: f32 = 10.0;

/// Draw whatever the current phase shows
pub fn render_frame(state: &GameState, canvas: &mut impl Canvas) {
    match state.phase {
        GamePhase::ModeSelect => render_mode_select(state, canvas),
        GamePhase::Playing | GamePhase::RoundPause { .. } => render(state, canvas),
        GamePhase::MatchOver { winner, .. } => render_match_over(state, winner, canvas),
    }
}

/// Playfield: borders, center line, paddles, ball, scores and round tally
pub fn render(state: &GameState, canvas: &mut impl Canvas) {
    let (w, h) = (state.width, state.height);

    canvas.fill(colors::GREY);

    canvas.rect(Rect::new(0.0, 0.0, w, BORDER_THICKNESS), colors::BLUE);
    canvas.rect(
        Rect::new(0.0, h - BORDER_THICKNESS, w, BORDER_THICKNESS),
        colors::BLUE,
    );
    canvas.line(
        Vec2::new(w / 2.0, 0.0),
        Vec2::new(w / 2.0, h),
        colors::WHITE,
    );

    canvas.rect(state.player.rect(), colors::YELLOW);
    canvas.rect(state.ai.rect(), colors::RED);
    canvas.ellipse(state.ball.rect(), colors::WHITE);

    canvas.text(
        &state.score.player_score.to_string(),
        Vec2::new(w / 4.0, 20.0),
        TextSize::Regular,
        Anchor::TopLeft,
        colors::YELLOW,
    );
    canvas.text(
        &state.score.ai_score.to_string(),
        Vec2::new(w * 3.0 / 4.0, 20.0),
        TextSize::Regular,
        Anchor::TopLeft,
        colors::RED,
    );

    canvas.text(
        &round_tally(state),
        Vec2::new(w / 2.0, 70.0),
        TextSize::Small,
        Anchor::Center,
        colors::WHITE,
    );
}

/// "Rounds: P - A  (Best of N)"
pub fn round_tally(state: &GameState) -> String {
    format!(
        "Rounds: {} - {}  ({})",
        state.score.player_round_wins, state.score.ai_round_wins, state.config.best_of
    )
}

/// Winner banner on black
pub fn render_match_over(state: &GameState, winner: Side, canvas: &mut impl Canvas) {
    let center = Vec2::new(state.width / 2.0, state.height / 2.0);
    let color = match winner {
        Side::Player => colors::GREEN,
        Side::Ai => colors::RED,
    };

    canvas.fill(colors::BLACK);
    canvas.text(
        &format!("{} WINS THE MATCH!", winner.label()),
        center - Vec2::new(0.0, 50.0),
        TextSize::Large,
        Anchor::Center,
        color,
    );
    canvas.text(
        "Returning to menu...",
        center + Vec2::new(0.0, 40.0),
        TextSize::Small,
        Anchor::Center,
        colors::WHITE,
    );
}

/// Match length menu; the current choice is bracketed
pub fn render_mode_select(state: &GameState, canvas: &mut impl Canvas) {
    let center = Vec2::new(state.width / 2.0, state.height / 2.0);

    canvas.fill(colors::BLACK);
    canvas.text(
        "Ping Pong Match Setup",
        center - Vec2::new(0.0, 150.0),
        TextSize::Large,
        Anchor::Center,
        colors::BLUE,
    );

    let option_colors = [colors::YELLOW, colors::GREEN, colors::RED];
    for (i, (best_of, color)) in BestOf::ALL.iter().zip(option_colors).enumerate() {
        canvas.text(
            &menu_option(*best_of, *best_of == state.config.best_of),
            center + Vec2::new(0.0, i as f32 * 60.0),
            TextSize::Regular,
            Anchor::Center,
            color,
        );
    }

    canvas.text(
        "Press ESC to Exit",
        center + Vec2::new(0.0, 3.0 * 60.0),
        TextSize::Regular,
        Anchor::Center,
        colors::WHITE,
    );
}

fn menu_option(best_of: BestOf, selected: bool) -> String {
    let label = format!("Press {} for {}", best_of.rounds(), best_of);
    if selected {
        format!("> {label} <")
    } else {
        label
    }
}
