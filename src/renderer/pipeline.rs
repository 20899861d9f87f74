//! WebGPU render pipeline setup

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::canvas::{Color, DrawList, colors};
use super::shapes;
use super::text::TextLayer;
use super::vertex::Vertex;

/// Errors while bringing up the GPU
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Vertices the current buffer can hold
    vertex_capacity: usize,
    text: TextLayer,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Logical playfield the scene is drawn in
    pub playfield: Vec2,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        playfield: Vec2,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("rally-pong-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Create shader module
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // Create pipeline
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_capacity = 4096;
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);
        let text = TextLayer::new(&device, &queue, config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity,
            text,
            size: (width.max(1), height.max(1)),
            playfield,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure with the current size after the surface was lost
    pub fn reconfigure(&mut self) {
        self.resize(self.size.0, self.size.1);
    }

    /// Tessellate the draw list, shape its text, upload both and present
    pub fn render(&mut self, list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let srgb = self.config.format.is_srgb();
        let vertices: Vec<Vertex> = shapes::tessellate(list.commands(), self.playfield)
            .into_iter()
            .map(|v| {
                let [x, y] = game_to_ndc(v.position, self.playfield);
                Vertex::new(x, y, surface_color(v.color, srgb))
            })
            .collect();

        if vertices.len() > self.vertex_capacity {
            self.vertex_capacity = vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
        }
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }

        let viewport = letterbox(self.playfield, self.size);
        let text_ready = match self.text.prepare(
            &self.device,
            &self.queue,
            list.commands(),
            viewport,
            self.playfield,
        ) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Skipping text this frame: {e}");
                false
            }
        };

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            // Bars around the letterboxed playfield
            let [r, g, b, a] = surface_color(colors::BLACK, srgb);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let [x, y, w, h] = viewport;
            render_pass.set_viewport(x, y, w, h, 0.0, 1.0);

            if !vertices.is_empty() {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..vertices.len() as u32, 0..1);
            }

            if text_ready {
                if let Err(e) = self.text.render(&mut render_pass) {
                    log::warn!("Text draw failed: {e}");
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.text.trim();

        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("vertex_buffer"),
        contents: bytemuck::cast_slice(&vec![Vertex::new(0.0, 0.0, [0.0; 4]); capacity]),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

/// Viewport `[x, y, width, height]` in surface pixels that shows the whole
/// playfield at its own aspect ratio, centered
pub fn letterbox(playfield: Vec2, surface: (u32, u32)) -> [f32; 4] {
    let (sw, sh) = (surface.0 as f32, surface.1 as f32);
    let scale = (sw / playfield.x).min(sh / playfield.y);
    let (w, h) = (playfield.x * scale, playfield.y * scale);
    [(sw - w) / 2.0, (sh - h) / 2.0, w, h]
}

/// Convert playfield pixels (origin top-left, y down) to normalized device
/// coordinates of the letterboxed viewport
pub fn game_to_ndc(pos: [f32; 2], playfield: Vec2) -> [f32; 2] {
    [
        pos[0] / playfield.x * 2.0 - 1.0,
        1.0 - pos[1] / playfield.y * 2.0,
    ]
}

/// sRGB surfaces expect linear values from the shader
fn surface_color(color: Color, srgb: bool) -> Color {
    if !srgb {
        return color;
    }
    let [r, g, b, a] = color;
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_letterbox_exact_fit() {
        assert_eq!(letterbox(FIELD, (800, 600)), [0.0, 0.0, 800.0, 600.0]);
        assert_eq!(letterbox(FIELD, (1600, 1200)), [0.0, 0.0, 1600.0, 1200.0]);
    }

    #[test]
    fn test_letterbox_wide_window_gets_side_bars() {
        // 1920x1080: height limits, scale 1.8
        let [x, y, w, h] = letterbox(FIELD, (1920, 1080));
        assert!(y.abs() < 1e-3 && (h - 1080.0).abs() < 1e-3);
        assert!((w - 1440.0).abs() < 1e-3);
        assert!((x - 240.0).abs() < 1e-3);
    }

    #[test]
    fn test_letterbox_tall_window_gets_top_bars() {
        let [x, y, w, h] = letterbox(FIELD, (400, 1000));
        assert_eq!((x, w), (0.0, 400.0));
        assert_eq!(h, 300.0);
        assert_eq!(y, 350.0);
    }

    #[test]
    fn test_game_to_ndc_corners() {
        assert_eq!(game_to_ndc([0.0, 0.0], FIELD), [-1.0, 1.0]);
        assert_eq!(game_to_ndc([800.0, 600.0], FIELD), [1.0, -1.0]);
        assert_eq!(game_to_ndc([400.0, 300.0], FIELD), [0.0, 0.0]);
    }

    #[test]
    fn test_surface_color_conversion() {
        assert_eq!(surface_color(colors::GREY, false), colors::GREY);
        let white = surface_color(colors::WHITE, true);
        assert!((white[0] - 1.0).abs() < 1e-6);
        let grey = surface_color(colors::GREY, true);
        assert!(grey[0] < colors::GREY[0]);
        assert_eq!(grey[3], 1.0);
    }
}
