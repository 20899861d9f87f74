//! Text drawing with glyphon
//!
//! Draw-list text is shaped in playfield pixels, then scaled into the
//! letterboxed viewport together with the shapes.

use glam::Vec2;
use glyphon::{
    Attrs, Buffer, Cache, Color as GlyphColor, Family, FontSystem, Metrics, Resolution, Shaping,
    SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer, Viewport, Weight,
};

use super::canvas::{Color, DrawCommand, TextSize};

/// Bundled faces (browsers have no system fonts)
const FONT_FAMILY: &str = "DejaVu Sans";
const FONTS: [&[u8]; 2] = [
    include_bytes!("../../assets/fonts/DejaVuSans.ttf"),
    include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf"),
];

/// Line height as a multiple of the font size
const LINE_SPACING: f32 = 1.2;

/// Font system with the bundled faces loaded
pub fn font_system() -> FontSystem {
    let mut font_system = FontSystem::new();
    for data in FONTS {
        font_system.db_mut().load_font_data(data.to_vec());
    }
    font_system
}

fn attrs(size: TextSize) -> Attrs<'static> {
    let attrs = Attrs::new().family(Family::Name(FONT_FAMILY));
    if size.bold() {
        attrs.weight(Weight::BOLD)
    } else {
        attrs
    }
}

/// Lay out `text` at `size` into `buffer`
pub fn shape(font_system: &mut FontSystem, buffer: &mut Buffer, text: &str, size: TextSize) {
    let px = size.px();
    buffer.set_metrics(font_system, Metrics::new(px, px * LINE_SPACING));
    buffer.set_size(font_system, None, None);
    buffer.set_text(font_system, text, &attrs(size), Shaping::Basic, None);
    buffer.shape_until_scroll(font_system, false);
}

/// Width and height of the shaped text in playfield pixels
pub fn extent(buffer: &Buffer) -> Vec2 {
    buffer.layout_runs().fold(Vec2::ZERO, |acc, run| {
        Vec2::new(acc.x.max(run.line_w), acc.y.max(run.line_top + run.line_height))
    })
}

/// Canvas colors are sRGB; glyphon linearizes for sRGB targets itself
fn glyph_color(color: Color) -> GlyphColor {
    let [r, g, b, a] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    GlyphColor::rgba(r, g, b, a)
}

pub struct TextLayer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    atlas: TextAtlas,
    text_renderer: TextRenderer,
    viewport: Viewport,
    /// One buffer per text command, reused across frames
    buffers: Vec<Buffer>,
}

impl TextLayer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let font_system = font_system();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let text_renderer = TextRenderer::new(&mut atlas, device, Default::default(), None);
        let viewport = Viewport::new(device, &cache);

        Self {
            font_system,
            swash_cache,
            atlas,
            text_renderer,
            viewport,
            buffers: Vec::new(),
        }
    }

    /// Shape and upload every text command for this frame
    ///
    /// `viewport` is the letterbox rectangle `[x, y, width, height]` the
    /// pass draws into.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        commands: &[DrawCommand],
        viewport: [f32; 4],
        playfield: Vec2,
    ) -> Result<(), glyphon::PrepareError> {
        let [_, _, width, height] = viewport;
        let resolution = Resolution {
            width: width.round().max(1.0) as u32,
            height: height.round().max(1.0) as u32,
        };
        self.viewport.update(queue, resolution);
        let scale = width / playfield.x;

        let texts: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text {
                    text,
                    pos,
                    size,
                    anchor,
                    color,
                } => Some((text.as_str(), *pos, *size, *anchor, *color)),
                _ => None,
            })
            .collect();

        while self.buffers.len() < texts.len() {
            let metrics = Metrics::new(TextSize::Regular.px(), TextSize::Regular.px());
            self.buffers.push(Buffer::new(&mut self.font_system, metrics));
        }
        for (buffer, &(text, _, size, _, _)) in self.buffers.iter_mut().zip(&texts) {
            shape(&mut self.font_system, buffer, text, size);
        }

        let bounds = TextBounds {
            left: 0,
            top: 0,
            right: resolution.width as i32,
            bottom: resolution.height as i32,
        };
        let text_areas = self
            .buffers
            .iter()
            .zip(&texts)
            .map(|(buffer, &(_, pos, _, anchor, color))| {
                let origin = anchor.origin(pos, extent(buffer)) * scale;
                TextArea {
                    buffer,
                    left: origin.x,
                    top: origin.y,
                    scale,
                    bounds,
                    default_color: glyph_color(color),
                    custom_glyphs: &[],
                }
            });

        self.text_renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            text_areas,
            &mut self.swash_cache,
        )
    }

    pub fn render<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
    ) -> Result<(), glyphon::RenderError> {
        self.text_renderer.render(&self.atlas, &self.viewport, pass)
    }

    /// Drop glyphs the last frame did not use
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}
