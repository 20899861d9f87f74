//! Drawing surface abstraction
//!
//! Scene code draws through [`Canvas`] in playfield pixels (top-left origin,
//! y down). [`DrawList`] records the calls so a backend can present them and
//! tests can compare frames.

use glam::Vec2;

use crate::sim::Rect;

/// Straight RGBA color, components in 0.0 - 1.0
pub type Color = [f32; 4];

/// Build an opaque color from 8-bit channels
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Colors for game elements
pub mod colors {
    use super::{Color, rgb};

    pub const WHITE: Color = rgb(255, 255, 255);
    pub const BLACK: Color = rgb(0, 0, 0);
    pub const GREEN: Color = rgb(0, 200, 0);
    pub const RED: Color = rgb(200, 0, 0);
    pub const BLUE: Color = rgb(50, 150, 255);
    pub const GREY: Color = rgb(30, 30, 30);
    pub const YELLOW: Color = rgb(255, 215, 0);
}

/// Text sizes used by the HUD and menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Regular,
    Large,
}

impl TextSize {
    /// Font size in playfield pixels
    pub fn px(&self) -> f32 {
        match self {
            TextSize::Small => 24.0,
            TextSize::Regular => 30.0,
            TextSize::Large => 44.0,
        }
    }

    pub fn bold(&self) -> bool {
        !matches!(self, TextSize::Small)
    }
}

/// Which point of the text box `pos` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

impl Anchor {
    /// Top-left corner of a `size` box placed at `pos`
    pub fn origin(&self, pos: Vec2, size: Vec2) -> Vec2 {
        match self {
            Anchor::TopLeft => pos,
            Anchor::Center => pos - size / 2.0,
        }
    }
}

/// A display surface
pub trait Canvas {
    /// Paint the whole surface
    fn fill(&mut self, color: Color);
    fn rect(&mut self, rect: Rect, color: Color);
    /// Ellipse inscribed in `rect`
    fn ellipse(&mut self, rect: Rect, color: Color);
    /// One-pixel line
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn text(&mut self, text: &str, pos: Vec2, size: TextSize, anchor: Anchor, color: Color);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill(Color),
    Rect(Rect, Color),
    Ellipse(Rect, Color),
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        size: TextSize,
        anchor: Anchor,
        color: Color,
    },
}

/// A frame's worth of draw calls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame, keeping the allocation
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Color of the last full-surface fill, if any
    pub fn background(&self) -> Option<Color> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Fill(color) => Some(*color),
            _ => None,
        })
    }

    /// Text of every text command, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn fill(&mut self, color: Color) {
        self.commands.push(DrawCommand::Fill(color));
    }

    fn rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect(rect, color));
    }

    fn ellipse(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Ellipse(rect, color));
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn text(&mut self, text: &str, pos: Vec2, size: TextSize, anchor: Anchor, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            anchor,
            color,
        });
    }
}
