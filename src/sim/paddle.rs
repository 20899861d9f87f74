//! Paddles: the player's keyboard-driven bat and the ball-tracking AI bat

use super::rect::Rect;

/// A vertical paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Move vertically by `delta`, staying inside the screen
    pub fn move_by(&mut self, delta: f32, screen_height: f32) {
        self.y = self.clamp_y(self.y + delta, screen_height);
    }

    /// Step the paddle's center toward the ball's vertical center.
    ///
    /// Travel is capped at `max_step` per call.
    pub fn auto_track(&mut self, ball: &Rect, screen_height: f32, max_step: f32) {
        let offset = ball.center_y() - (self.y + self.height / 2.0);
        let step = offset.clamp(-max_step, max_step);
        self.y = self.clamp_y(self.y + step, screen_height);
    }

    fn clamp_y(&self, y: f32, screen_height: f32) -> f32 {
        y.clamp(0.0, (screen_height - self.height).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddle() -> Paddle {
        Paddle::new(10.0, 250.0, 10.0, 100.0)
    }

    #[test]
    fn test_move_by() {
        let mut p = paddle();
        p.move_by(-10.0, 600.0);
        assert_eq!(p.y, 240.0);
        p.move_by(25.0, 600.0);
        assert_eq!(p.y, 265.0);
    }

    #[test]
    fn test_move_clamps_to_screen() {
        let mut p = paddle();
        p.move_by(-1000.0, 600.0);
        assert_eq!(p.y, 0.0);
        p.move_by(1000.0, 600.0);
        assert_eq!(p.y, 500.0);
    }

    #[test]
    fn test_auto_track_moves_toward_ball() {
        let mut p = paddle();
        // Paddle center is 300; ball center is 103.5
        let ball = Rect::new(400.0, 100.0, 7.0, 7.0);
        p.auto_track(&ball, 600.0, 6.0);
        assert_eq!(p.y, 244.0);

        let ball = Rect::new(400.0, 500.0, 7.0, 7.0);
        let mut p = paddle();
        p.auto_track(&ball, 600.0, 6.0);
        assert_eq!(p.y, 256.0);
    }

    #[test]
    fn test_auto_track_settles_on_ball_center() {
        let mut p = paddle();
        let ball = Rect::new(400.0, 298.0, 7.0, 7.0);
        p.auto_track(&ball, 600.0, 6.0);
        assert!((p.rect().center_y() - ball.center_y()).abs() < f32::EPSILON);
    }

    #[test]
    fn test_auto_track_clamps_to_screen() {
        let mut p = Paddle::new(780.0, 2.0, 10.0, 100.0);
        let ball = Rect::new(400.0, 0.0, 7.0, 7.0);
        for _ in 0..10 {
            p.auto_track(&ball, 600.0, 6.0);
        }
        assert_eq!(p.y, 0.0);
    }
}
