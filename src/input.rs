//! Keyboard state shared by the web and native frontends
//!
//! Frontends translate their key events into [`Key`]s; the app turns the
//! accumulated state into one [`TickInput`] per simulation step.

use crate::sim::{BestOf, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Digit3,
    Digit5,
    Digit7,
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` / winit `KeyCode` name
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "ArrowUp" => Some(Key::Up),
            "KeyS" | "ArrowDown" => Some(Key::Down),
            "Digit3" | "Numpad3" => Some(Key::Digit3),
            "Digit5" | "Numpad5" => Some(Key::Digit5),
            "Digit7" | "Numpad7" => Some(Key::Digit7),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }

    fn best_of(&self) -> Option<BestOf> {
        match self {
            Key::Digit3 => Some(BestOf::Three),
            Key::Digit5 => Some(BestOf::Five),
            Key::Digit7 => Some(BestOf::Seven),
            _ => None,
        }
    }
}

/// Held keys plus one-shot events waiting for the next tick
#[derive(Debug, Clone, Default)]
pub struct InputState {
    up_held: bool,
    down_held: bool,
    /// Latched until consumed by a tick
    pending: TickInput,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Up => self.up_held = true,
            Key::Down => self.down_held = true,
            Key::Escape => self.pending.escape = true,
            Key::Digit3 | Key::Digit5 | Key::Digit7 => self.pending.choice = key.best_of(),
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Up => self.up_held = false,
            Key::Down => self.down_held = false,
            _ => {}
        }
    }

    pub fn request_quit(&mut self) {
        self.pending.quit = true;
    }

    /// Drop held keys (focus lost: key-up events will not arrive)
    pub fn release_all(&mut self) {
        self.up_held = false;
        self.down_held = false;
    }

    /// Input for the next tick; one-shot events are handed out only once
    pub fn take_tick_input(&mut self) -> TickInput {
        let one_shot = std::mem::take(&mut self.pending);
        TickInput {
            up: self.up_held,
            down: self.down_held,
            ..one_shot
        }
    }
}
