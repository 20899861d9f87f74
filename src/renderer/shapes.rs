//! Shape generation for 2D primitives
//!
//! Everything becomes a triangle list in playfield pixels; the pipeline maps
//! it to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::canvas::{Color, DrawCommand};
use super::vertex::Vertex;
use crate::sim::Rect;

/// Triangle fan segments for ellipses (the ball is only a few pixels wide)
pub const ELLIPSE_SEGMENTS: u32 = 16;

/// Line thickness in playfield pixels
pub const LINE_WIDTH: f32 = 1.0;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(r: Rect, color: Color) -> [Vertex; 6] {
    let (l, t, rt, b) = (r.left(), r.top(), r.right(), r.bottom());
    [
        Vertex::new(l, t, color),
        Vertex::new(rt, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(rt, t, color),
        Vertex::new(rt, b, color),
    ]
}

/// Generate vertices for a filled ellipse inscribed in `bounds`
pub fn ellipse(bounds: Rect, color: Color, segments: u32) -> Vec<Vertex> {
    let center = bounds.center();
    let radii = Vec2::new(bounds.width, bounds.height) / 2.0;
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a line segment as a thin quad
pub fn line(from: Vec2, to: Vec2, color: Color, width: f32) -> [Vertex; 6] {
    let dir = (to - from).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = from + perp;
    let a2 = from - perp;
    let b1 = to + perp;
    let b2 = to - perp;

    [
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Turn recorded draw calls into one triangle list
///
/// A fill covers the `playfield` rectangle; the clear color handles anything
/// outside it. Text is left to the glyph layer.
pub fn tessellate(commands: &[DrawCommand], playfield: Vec2) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for command in commands {
        match command {
            DrawCommand::Fill(color) => {
                vertices.extend(rect(Rect::new(0.0, 0.0, playfield.x, playfield.y), *color));
            }
            DrawCommand::Rect(r, color) => vertices.extend(rect(*r, *color)),
            DrawCommand::Ellipse(r, color) => {
                vertices.extend(ellipse(*r, *color, ELLIPSE_SEGMENTS));
            }
            DrawCommand::Line { from, to, color } => {
                vertices.extend(line(*from, *to, *color, LINE_WIDTH));
            }
            DrawCommand::Text { .. } => {}
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::canvas::{Anchor, Canvas, DrawList, TextSize, colors};

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for v in vertices {
            let p = Vec2::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }

    #[test]
    fn test_rect_corners() {
        let verts = rect(Rect::new(10.0, 20.0, 30.0, 40.0), colors::RED);
        assert_eq!(bounds(&verts), (Vec2::new(10.0, 20.0), Vec2::new(40.0, 60.0)));
        assert!(verts.iter().all(|v| v.color == colors::RED));
    }

    #[test]
    fn test_ellipse_fits_its_box() {
        let r = Rect::new(100.0, 50.0, 7.0, 7.0);
        let verts = ellipse(r, colors::WHITE, ELLIPSE_SEGMENTS);
        assert_eq!(verts.len(), (ELLIPSE_SEGMENTS * 3) as usize);

        let (min, max) = bounds(&verts);
        let eps = 1e-4;
        assert!(min.x >= r.left() - eps && min.y >= r.top() - eps);
        assert!(max.x <= r.right() + eps && max.y <= r.bottom() + eps);
    }

    #[test]
    fn test_vertical_line_has_width() {
        let verts = line(Vec2::new(400.0, 0.0), Vec2::new(400.0, 600.0), colors::WHITE, 1.0);
        let (min, max) = bounds(&verts);
        assert_eq!(max.x - min.x, 1.0);
        assert_eq!(max.y - min.y, 600.0);
    }

    #[test]
    fn test_tessellate_fill_covers_playfield() {
        let mut list = DrawList::new();
        list.fill(colors::GREY);
        list.text("SCORE", Vec2::ZERO, TextSize::Large, Anchor::Center, colors::WHITE);

        let verts = tessellate(list.commands(), Vec2::new(800.0, 600.0));
        // Text adds no triangles
        assert_eq!(verts.len(), 6);
        assert_eq!(bounds(&verts), (Vec2::ZERO, Vec2::new(800.0, 600.0)));
    }
}
