//! Rendering
//!
//! Scene code records draw calls on a [`canvas::Canvas`]; the WebGPU
//! pipeline tessellates shapes into flat-colored triangles and hands text
//! to glyphon.

pub mod canvas;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod text;
pub mod vertex;

pub use canvas::{Canvas, Color, DrawCommand, DrawList, colors};
pub use pipeline::{RenderError, RenderState};
