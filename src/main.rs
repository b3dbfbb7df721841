//! Interactive 2D particle field
//!
//! Particles repel or attract their neighbours, bounce off the window edges
//! and scatter away from the pointer while the left button is held.

mod error;
mod gui;

use clap::Parser;
use error::{AppError, GpuError};
use glam::Vec2;
use gui::{Gui, UiState};
use particle_renderer::CanvasRenderer;
use particle_simulation::{ParticleSystem, PointerState, Settings};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Interactive 2D particle field")]
struct Args {
    /// Number of particles (defaults to the built-in setting)
    #[arg(short, long)]
    particles: Option<usize>,

    /// Seed for a reproducible initial layout
    #[arg(short, long)]
    seed: Option<u64>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Start with trails disabled
    #[arg(long)]
    no_trails: bool,
}

impl Args {
    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(count) = self.particles {
            settings.particle_count = count;
        }
        settings.trail_enabled = !self.no_trails;
        settings
    }
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    renderer: CanvasRenderer,
    system: ParticleSystem,
    settings: Settings,
    pointer: PointerState,

    gui: Gui,
    ui_state: UiState,

    frame_times: VecDeque<f32>,
    last_frame_time: Instant,
}

impl GpuState {
    async fn new(window: Arc<Window>, args: &Args) -> Result<Self, GpuError> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        // Create device and queue
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        // Configure surface. Non-sRGB so the canvas is shown as stored.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = CanvasRenderer::new(&device, config.format, config.width, config.height);

        // Initialize particles
        let settings = args.settings();
        let bounds = renderer.viewport().size();
        let system = match args.seed {
            Some(seed) => ParticleSystem::with_seed(bounds, &settings, seed),
            None => ParticleSystem::new(bounds, &settings),
        };

        let gui = Gui::new(&device, config.format, &window);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
            system,
            settings,
            pointer: PointerState::default(),
            gui,
            ui_state: UiState::default(),
            frame_times: VecDeque::with_capacity(100),
            last_frame_time: Instant::now(),
        })
    }

    /// Resize the surface and canvas. The particles are kept; the walls
    /// move with the next tick.
    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.renderer
                .resize(&self.device, &self.queue, new_size.width, new_size.height);
        }
    }

    fn render(&mut self, window: &Window) -> Result<(f32, f32), wgpu::SurfaceError> {
        // Track frame time
        let now = Instant::now();
        let frame_time = (now - self.last_frame_time).as_secs_f32() * 1000.0;
        self.last_frame_time = now;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > 100 {
            self.frame_times.pop_front();
        }

        let avg_frame_time = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        let fps = 1000.0 / avg_frame_time;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Simulate and record one frame of canvas calls
        let mut batch = self.renderer.begin_frame();
        self.system.tick(&self.settings, &self.pointer, &mut batch);

        self.renderer.render(&self.device, &mut encoder, &batch);
        self.renderer.present(&mut encoder, &view);

        self.ui_state = UiState {
            fps,
            frame_time: avg_frame_time,
            particle_count: self.system.len(),
        };
        let changes = self.gui.render(
            &self.device,
            &self.queue,
            &mut encoder,
            window,
            &view,
            &self.settings,
            &self.ui_state,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        let bounds = self.renderer.viewport().size();
        for (id, value) in changes {
            if let Err(e) = self
                .system
                .apply_control(bounds, &mut self.settings, id, value)
            {
                log::warn!("Ignoring control input: {}", e);
            }
        }

        Ok((fps, avg_frame_time))
    }
}

struct App {
    args: Args,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    /// Fatal error raised inside the event loop, returned from `main`
    error: Option<AppError>,
}

impl App {
    fn new(args: Args) -> Self {
        Self {
            args,
            window: None,
            gpu_state: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attributes = Window::default_attributes()
            .with_title("Particle Field")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.args.width,
                self.args.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone(), &self.args))?;

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
            return;
        };

        // A release or exit must reach the pointer even over the panel
        match &event {
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => gpu_state.pointer.release(),
            WindowEvent::CursorLeft { .. } => gpu_state.pointer.leave(),
            _ => {}
        }

        // Handle GUI events
        if gpu_state.gui.handle_event(window, &event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::KeyP),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => gpu_state.gui.toggle(),

            WindowEvent::Resized(physical_size) => gpu_state.resize(physical_size),

            WindowEvent::CursorMoved { position, .. } => {
                gpu_state
                    .pointer
                    .moved(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => gpu_state.pointer.press(),

            WindowEvent::RedrawRequested => match gpu_state.render(window) {
                Ok((fps, frame_time)) => {
                    window.set_title(&format!(
                        "Particle Field - {:.0} FPS ({:.2}ms) - {} particles",
                        fps,
                        frame_time,
                        gpu_state.system.len()
                    ));
                }
                Err(wgpu::SurfaceError::Lost) => gpu_state.resize(window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                Err(e) => log::warn!("Render error: {:?}", e),
            },

            _ => {}
        }

        window.request_redraw();
    }
}

fn main() -> Result<(), AppError> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting particle field...");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(args);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_settings() {
        let args = Args::parse_from(["particle-field", "--particles", "300", "--no-trails"]);
        let settings = args.settings();
        assert_eq!(settings.particle_count, 300);
        assert!(!settings.trail_enabled);
        assert_eq!(settings.attract_constant, Settings::default().attract_constant);
    }

    #[test]
    fn test_default_args_keep_defaults() {
        let args = Args::parse_from(["particle-field"]);
        assert_eq!(args.settings(), Settings::default());
        assert_eq!((args.width, args.height), (1280, 800));
    }
}
