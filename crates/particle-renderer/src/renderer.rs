//! Canvas rendering system
//!
//! The canvas lives in an offscreen texture that is never cleared by the
//! renderer itself, so a translucent fill from the simulation leaves the
//! previous frames visible as trails. Each frame the texture is copied onto
//! the window surface.

use wgpu::util::DeviceExt;

use crate::batch::{CircleInstance, DrawKind, FrameBatch, ShapeVertex};
use crate::viewport::{Viewport, ViewportUniform};

/// Format of the persistent canvas. Non-sRGB, so blending happens on the
/// stored values the same way a 2D canvas blends.
pub const CANVAS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub struct CanvasRenderer {
    clear_pipeline: wgpu::RenderPipeline,
    fill_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    circle_pipeline: wgpu::RenderPipeline,
    present_pipeline: wgpu::RenderPipeline,

    viewport: Viewport,
    viewport_buffer: wgpu::Buffer,
    viewport_bind_group: wgpu::BindGroup,

    present_bind_group_layout: wgpu::BindGroupLayout,
    present_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    canvas_view: wgpu::TextureView,
}

impl CanvasRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let viewport = Viewport::new(width, height);

        // Create viewport buffer
        let viewport_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Viewport Buffer"),
            contents: bytemuck::cast_slice(&[viewport.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let viewport_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Viewport Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ViewportUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let viewport_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Viewport Bind Group"),
            layout: &viewport_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_buffer.as_entire_binding(),
            }],
        });

        // Load shaders
        let canvas_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Canvas Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/canvas.wgsl").into()),
        });
        let present_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Present Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/present.wgsl").into()),
        });

        let canvas_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Canvas Pipeline Layout"),
            bind_group_layouts: &[&viewport_bind_group_layout],
            push_constant_ranges: &[],
        });

        let clear_pipeline = create_canvas_pipeline(
            device,
            &canvas_layout,
            &canvas_shader,
            CanvasPipeline {
                label: "Canvas Clear Pipeline",
                vertex_entry: "vs_shape",
                fragment_entry: "fs_shape",
                buffer: ShapeVertex::layout(),
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: None,
            },
        );
        let fill_pipeline = create_canvas_pipeline(
            device,
            &canvas_layout,
            &canvas_shader,
            CanvasPipeline {
                label: "Canvas Fill Pipeline",
                vertex_entry: "vs_shape",
                fragment_entry: "fs_shape",
                buffer: ShapeVertex::layout(),
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            },
        );
        let line_pipeline = create_canvas_pipeline(
            device,
            &canvas_layout,
            &canvas_shader,
            CanvasPipeline {
                label: "Canvas Line Pipeline",
                vertex_entry: "vs_shape",
                fragment_entry: "fs_shape",
                buffer: ShapeVertex::layout(),
                topology: wgpu::PrimitiveTopology::LineList,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            },
        );
        let circle_pipeline = create_canvas_pipeline(
            device,
            &canvas_layout,
            &canvas_shader,
            CanvasPipeline {
                label: "Canvas Circle Pipeline",
                vertex_entry: "vs_circle",
                fragment_entry: "fs_circle",
                buffer: CircleInstance::layout(),
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            },
        );

        // Present: canvas texture -> surface
        let present_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Present Bind Group Layout"),
                entries: &[
                    // Canvas texture - Binding 0
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    // Sampler - Binding 1
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let present_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Present Pipeline Layout"),
            bind_group_layouts: &[&present_bind_group_layout],
            push_constant_ranges: &[],
        });

        let present_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Present Pipeline"),
            layout: Some(&present_layout),
            vertex: wgpu::VertexState {
                module: &present_shader,
                entry_point: Some("vs_present"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &present_shader,
                entry_point: Some("fs_present"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Canvas Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let canvas_view = Self::create_canvas_texture(device, &viewport);
        let present_bind_group = Self::create_present_bind_group(
            device,
            &present_bind_group_layout,
            &canvas_view,
            &sampler,
        );

        log::info!("✓ Canvas renderer ready ({}x{})", viewport.width, viewport.height);

        Self {
            clear_pipeline,
            fill_pipeline,
            line_pipeline,
            circle_pipeline,
            present_pipeline,
            viewport,
            viewport_buffer,
            viewport_bind_group,
            present_bind_group_layout,
            present_bind_group,
            sampler,
            canvas_view,
        }
    }

    fn create_canvas_texture(device: &wgpu::Device, viewport: &Viewport) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Canvas Texture"),
            size: wgpu::Extent3d {
                width: viewport.width,
                height: viewport.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CANVAS_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_present_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        canvas_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Present Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(canvas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Start recording a frame sized like the current canvas
    pub fn begin_frame(&self) -> FrameBatch {
        FrameBatch::new(self.viewport.size())
    }

    /// Recreate the canvas at the new size. Like a resized HTML canvas, the
    /// old contents are dropped.
    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        self.viewport.resize(width, height);
        queue.write_buffer(
            &self.viewport_buffer,
            0,
            bytemuck::cast_slice(&[self.viewport.to_uniform()]),
        );

        self.canvas_view = Self::create_canvas_texture(device, &self.viewport);
        self.present_bind_group = Self::create_present_bind_group(
            device,
            &self.present_bind_group_layout,
            &self.canvas_view,
            &self.sampler,
        );

        log::debug!("Canvas resized to {}x{}", self.viewport.width, self.viewport.height);
    }

    /// Paint a recorded frame onto the persistent canvas
    pub fn render(&self, device: &wgpu::Device, encoder: &mut wgpu::CommandEncoder, batch: &FrameBatch) {
        if batch.is_empty() {
            return;
        }

        let triangle_buffer = create_vertex_buffer(device, "Canvas Triangle Buffer", &batch.triangles);
        let line_buffer = create_vertex_buffer(device, "Canvas Line Buffer", &batch.lines);
        let circle_buffer = create_vertex_buffer(device, "Canvas Circle Buffer", &batch.circles);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Canvas Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.canvas_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.viewport_bind_group, &[]);

        for draw in batch.batches() {
            let (pipeline, buffer) = match draw.kind {
                DrawKind::Clear => (&self.clear_pipeline, &triangle_buffer),
                DrawKind::Fill => (&self.fill_pipeline, &triangle_buffer),
                DrawKind::Lines => (&self.line_pipeline, &line_buffer),
                DrawKind::Circles => (&self.circle_pipeline, &circle_buffer),
            };
            let Some(buffer) = buffer else {
                continue;
            };

            render_pass.set_pipeline(pipeline);
            render_pass.set_vertex_buffer(0, buffer.slice(..));
            match draw.kind {
                DrawKind::Circles => render_pass.draw(0..6, draw.range.clone()),
                _ => render_pass.draw(draw.range.clone(), 0..1),
            }
        }
    }

    /// Copy the canvas onto the surface view
    pub fn present(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Present Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.present_pipeline);
        render_pass.set_bind_group(0, &self.present_bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

struct CanvasPipeline<'a> {
    label: &'a str,
    vertex_entry: &'a str,
    fragment_entry: &'a str,
    buffer: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    blend: Option<wgpu::BlendState>,
}

fn create_canvas_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    desc: CanvasPipeline<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(desc.vertex_entry),
            buffers: &[desc.buffer],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(desc.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: CANVAS_FORMAT,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Upload `data` as a vertex buffer, or `None` when there is nothing to bind
fn create_vertex_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    label: &str,
    data: &[T],
) -> Option<wgpu::Buffer> {
    if data.is_empty() {
        return None;
    }
    Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX,
    }))
}
