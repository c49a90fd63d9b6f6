//! WebGPU render pipeline setup

use super::vertex::{Vertex, colors};
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};

/// Map a board position to normalized device coordinates
///
/// The board keeps its aspect ratio inside a `width`x`height` viewport and is
/// letterboxed on the longer axis. Board y grows downward, NDC y upward.
pub fn board_to_ndc(x: f32, y: f32, width: u32, height: u32) -> (f32, f32) {
    let board_aspect = BOARD_WIDTH / BOARD_HEIGHT;
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    let (sx, sy) = if aspect > board_aspect {
        // Wider than the board: bars left and right
        (board_aspect / aspect, 1.0)
    } else {
        (1.0, aspect / board_aspect)
    };

    let nx = (x / BOARD_WIDTH) * 2.0 - 1.0;
    let ny = 1.0 - (y / BOARD_HEIGHT) * 2.0;
    (nx * sx, ny * sy)
}

/// Map a point in a `width`x`height` viewport back to board coordinates
///
/// Inverse of [`board_to_ndc`]; points in the letterbox bars land off-board.
pub fn viewport_to_board(px: f32, py: f32, width: f32, height: f32) -> (f32, f32) {
    let scale = (width / BOARD_WIDTH).min(height / BOARD_HEIGHT);
    if scale <= 0.0 {
        return (BOARD_WIDTH / 2.0, BOARD_HEIGHT / 2.0);
    }
    let offset_x = (width - BOARD_WIDTH * scale) * 0.5;
    let offset_y = (height - BOARD_HEIGHT * scale) * 0.5;
    ((px - offset_x) / scale, (py - offset_y) / scale)
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    /// Vertices the current buffer can hold
    vertex_capacity: usize,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    /// Initial vertex buffer size; grows on demand
    const INITIAL_CAPACITY: usize = 16 * 1024;

    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("watermelon-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        // Palette colors are already sRGB-encoded, so write them unconverted
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8Unorm);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

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

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("board_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("board_pipeline"),
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
                // Shape winding is not consistent
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

        let vertex_buffer = Self::create_vertex_buffer(&device, Self::INITIAL_CAPACITY);

        log::info!(
            "Render pipeline ready ({}x{}, {:?})",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: Self::INITIAL_CAPACITY,
            vertex_count: 0,
            size: (width, height),
        })
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vertex_buffer"),
            size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
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

    /// Upload board-space vertices and draw one frame
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        let (w, h) = self.size;
        let ndc_vertices: Vec<Vertex> = vertices
            .iter()
            .map(|v| {
                let (x, y) = board_to_ndc(v.position[0], v.position[1], w, h);
                Vertex::new(x, y, v.color)
            })
            .collect();

        if ndc_vertices.len() > self.vertex_capacity {
            let capacity = ndc_vertices.len().next_power_of_two();
            log::debug!("Growing vertex buffer to {} vertices", capacity);
            self.vertex_buffer = Self::create_vertex_buffer(&self.device, capacity);
            self.vertex_capacity = capacity;
        }
        if !ndc_vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&ndc_vertices));
        }
        self.vertex_count = ndc_vertices.len() as u32;

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
            let [r, g, b, a] = colors::CLEAR;
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

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5
    }

    #[test]
    fn test_board_corners_fill_matching_viewport() {
        // 400x500 viewport has the board's aspect exactly
        assert!(approx(board_to_ndc(0.0, 0.0, 400, 500), (-1.0, 1.0)));
        assert!(approx(board_to_ndc(400.0, 500.0, 400, 500), (1.0, -1.0)));
        assert!(approx(board_to_ndc(200.0, 250.0, 800, 1000), (0.0, 0.0)));
    }

    #[test]
    fn test_wide_viewport_letterboxes_horizontally() {
        let (x, y) = board_to_ndc(400.0, 0.0, 1600, 1000);
        assert!(approx((x, y), (0.5, 1.0)));
    }

    #[test]
    fn test_tall_viewport_letterboxes_vertically() {
        let (x, y) = board_to_ndc(400.0, 0.0, 400, 1000);
        assert!(approx((x, y), (1.0, 0.5)));
    }

    #[test]
    fn test_viewport_to_board_inverts_letterbox() {
        // 800x500 viewport: board is 400 px wide, centred with 200 px bars
        assert_eq!(viewport_to_board(200.0, 0.0, 800.0, 500.0), (0.0, 0.0));
        assert_eq!(viewport_to_board(400.0, 250.0, 800.0, 500.0), (200.0, 250.0));
        // 200x250 viewport: half scale
        assert_eq!(viewport_to_board(100.0, 125.0, 200.0, 250.0), (200.0, 250.0));
        assert_eq!(viewport_to_board(5.0, 5.0, 0.0, 0.0), (200.0, 250.0));
    }

    #[test]
    fn test_zero_size_viewport_is_finite() {
        let (x, y) = board_to_ndc(10.0, 10.0, 0, 0);
        assert!(x.is_finite() && y.is_finite());
    }
}
