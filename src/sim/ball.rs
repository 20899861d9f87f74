//! The ball: straight-line motion, wall and paddle bounces, serve reset

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use crate::audio::Cue;
use crate::consts::{BALL_SPEED_X, BALL_SPEED_Y};

/// The ball entity
///
/// Velocity components only ever change sign, so the ball never stalls on
/// either axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub size: Vec2,
    /// Where the ball is served from after every point
    pub spawn: Vec2,
    /// Playfield size
    pub bounds: Vec2,
}

impl Ball {
    /// Create a ball at its spawn point heading in a random diagonal
    pub fn new(spawn: Vec2, size: Vec2, bounds: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::new(random_sign(rng) * BALL_SPEED_X, random_sign(rng) * BALL_SPEED_Y),
            size,
            spawn,
            bounds,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Advance one tick, bouncing off the top and bottom walls.
    ///
    /// Horizontal travel is never clamped: leaving the left or right edge is
    /// a point, which the owner checks.
    #[must_use]
    pub fn move_step(&mut self) -> Option<Cue> {
        self.pos += self.vel;

        if self.pos.y <= 0.0 || self.pos.y + self.size.y >= self.bounds.y {
            self.vel.y = -self.vel.y;
            return Some(Cue::WallBounce);
        }
        None
    }

    /// Bounce off whichever paddle the ball overlaps.
    ///
    /// The ball is snapped flush against the paddle face so it cannot tunnel
    /// into it. The player paddle wins ties; only one reversal per tick.
    #[must_use]
    pub fn check_collision(&mut self, player: &Rect, ai: &Rect) -> Option<Cue> {
        let ball = self.rect();

        if ball.intersects(player) {
            self.pos.x = player.right();
            self.vel.x = -self.vel.x;
            Some(Cue::PaddleHit)
        } else if ball.intersects(ai) {
            self.pos.x = ai.left() - self.size.x;
            self.vel.x = -self.vel.x;
            Some(Cue::PaddleHit)
        } else {
            None
        }
    }

    /// Serve again from the spawn point.
    ///
    /// The horizontal direction flips so serves alternate; the vertical
    /// direction is re-rolled.
    pub fn reset(&mut self, rng: &mut impl Rng) -> Cue {
        self.pos = self.spawn;
        self.vel.x = -self.vel.x;
        self.vel.y = random_sign(rng) * BALL_SPEED_Y;
        Cue::Score
    }
}

fn random_sign(rng: &mut impl Rng) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}
