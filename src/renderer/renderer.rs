use crate::engine::{Frame, RenderBackend};
use crate::error::ViewerError;
use crate::renderer::line_vertex::LineVertex;
use crate::services::Viewport;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use winit::window::Window;

/// Vertices the line buffer holds before it has to grow.
const INITIAL_LINE_CAPACITY: u64 = 4096;

pub struct WgpuRenderer {
    pub(crate) window: Arc<Window>,
    pub(crate) egui_state: Rc<RefCell<egui_winit::State>>,
    pub(crate) surface: wgpu::Surface<'static>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    pub(crate) config: wgpu::SurfaceConfiguration,
    pub(crate) line_pipeline: wgpu::RenderPipeline,
    pub(crate) line_buffer: wgpu::Buffer,
    pub(crate) camera_buffer: wgpu::Buffer,
    pub(crate) camera_bind_group: wgpu::BindGroup,
    pub(crate) egui_renderer: egui_wgpu::Renderer,
    /// Clamped device pixel ratio the UI is drawn at.
    pub(crate) pixel_ratio: f32,
    pub(crate) disposed: bool,
}

/// egui zoom that turns the window's native scale into `pixel_ratio`.
pub(crate) fn ui_zoom(pixel_ratio: f32, native_scale: f32) -> f32 {
    if pixel_ratio <= 0.0 || native_scale <= 0.0 {
        return 1.0;
    }
    pixel_ratio / native_scale
}

impl WgpuRenderer {
    pub async fn new(
        window: Arc<Window>,
        egui_state: Rc<RefCell<egui_winit::State>>,
    ) -> Result<Self, ViewerError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // An Arc'd window makes the surface 'static
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("foxview device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                ..Default::default()
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| {
                ViewerError::new("surface-create").with_arg("reason", "no supported format")
            })?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("line.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: 64, // mat4x4<f32>
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let line_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&line_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
                buffers: &[LineVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_line"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Vertex Buffer"),
            size: INITIAL_LINE_CAPACITY * size_of::<LineVertex>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, Default::default());
        let pixel_ratio = window.scale_factor() as f32;

        log::info!(
            "Renderer ready: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            window,
            egui_state,
            surface,
            device,
            queue,
            config,
            line_pipeline,
            line_buffer,
            camera_buffer,
            camera_bind_group,
            egui_renderer,
            pixel_ratio,
            disposed: false,
        })
    }

    pub(crate) fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl RenderBackend for WgpuRenderer {
    fn resize(&mut self, viewport: Viewport) {
        if self.disposed || viewport.is_empty() {
            return;
        }
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.pixel_ratio = viewport.pixel_ratio as f32;
        self.reconfigure();
    }

    fn take_ui_input(&mut self) -> Option<(egui::Context, egui::RawInput)> {
        if self.disposed {
            return None;
        }
        let mut state = self.egui_state.borrow_mut();
        let zoom = ui_zoom(self.pixel_ratio, self.window.scale_factor() as f32);
        if (state.egui_ctx().zoom_factor() - zoom).abs() > f32::EPSILON {
            state.egui_ctx().set_zoom_factor(zoom);
        }
        let raw_input = state.take_egui_input(&self.window);
        Some((state.egui_ctx().clone(), raw_input))
    }

    fn render(&mut self, frame: &Frame, ui: Option<egui::FullOutput>) -> Result<(), ViewerError> {
        if self.disposed {
            return Ok(());
        }
        self.draw(frame, ui)
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.line_buffer.destroy();
        self.camera_buffer.destroy();
        log::debug!("GPU resources released");
    }
}
