use egui::Context;
use egui_wgpu::{Renderer, RendererOptions};
use egui_winit::State;
use particle_simulation::{
    ControlGroup, ControlId, ControlKind, ControlSpec, ControlValue, Settings, CONTROLS,
};
use wgpu::{Device, TextureFormat};
use winit::{event::WindowEvent, window::Window};

/// Values shown in the panels that are not settings
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    pub fps: f32,
    pub frame_time: f32,
    pub particle_count: usize,
}

pub struct Gui {
    context: Context,
    state: State,
    renderer: Renderer,
    /// Settings panel visibility, toggled with `P`
    pub visible: bool,
}

impl Gui {
    pub fn new(device: &Device, output_color_format: TextureFormat, window: &Window) -> Self {
        let context = Context::default();
        let id = context.viewport_id();

        let state = State::new(
            context.clone(),
            id,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(device.limits().max_texture_dimension_2d as usize),
        );

        let renderer = Renderer::new(
            device,
            output_color_format,
            RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: None,
                dithering: false,
                ..Default::default()
            },
        );

        Self {
            context,
            state,
            renderer,
            visible: true,
        }
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::debug!("Settings panel visible: {}", self.visible);
    }

    /// Draw the panels over `view` and return the control edits made this frame
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        settings: &Settings,
        ui_state: &UiState,
    ) -> Vec<(ControlId, ControlValue)> {
        let raw_input = self.state.take_egui_input(window);

        let mut changes = Vec::new();
        let visible = self.visible;
        let full_output = self.context.run(raw_input, |ctx| {
            diagnostics_window(ctx, ui_state);
            if visible {
                settings_window(ctx, settings, &mut changes);
            }
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let clipped_primitives = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let size = window.inner_size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
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

            let mut render_pass = render_pass.forget_lifetime();
            self.renderer
                .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        changes
    }
}

fn diagnostics_window(ctx: &Context, state: &UiState) {
    egui::Window::new("Diagnostics")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            ui.label(format!("FPS: {:.1}", state.fps));
            ui.label(format!("Frame Time: {:.2} ms", state.frame_time));
            ui.label(format!("Particles: {}", state.particle_count));
        });
}

fn settings_window(
    ctx: &Context,
    settings: &Settings,
    changes: &mut Vec<(ControlId, ControlValue)>,
) {
    egui::Window::new("Settings")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            for spec in CONTROLS.iter().filter(|c| c.group == ControlGroup::Basic) {
                control_widget(ui, spec, settings, changes);
            }

            egui::CollapsingHeader::new("Advanced")
                .default_open(false)
                .show(ui, |ui| {
                    for spec in CONTROLS.iter().filter(|c| c.group == ControlGroup::Advanced) {
                        control_widget(ui, spec, settings, changes);
                    }
                });

            ui.separator();
            ui.small("P: toggle panel  ·  hold left mouse: explode");
        });
}

fn control_widget(
    ui: &mut egui::Ui,
    spec: &ControlSpec,
    settings: &Settings,
    changes: &mut Vec<(ControlId, ControlValue)>,
) {
    match (spec.kind, settings.value(spec.id)) {
        (ControlKind::Slider { min, max, step }, ControlValue::Number(mut value)) => {
            let response = ui.add(
                egui::Slider::new(&mut value, min..=max)
                    .step_by(step)
                    .text(spec.label),
            );
            if response.changed() {
                changes.push((spec.id, ControlValue::Number(value)));
            }
        }
        (ControlKind::Checkbox, ControlValue::Toggle(mut checked)) => {
            if ui.checkbox(&mut checked, spec.label).changed() {
                changes.push((spec.id, ControlValue::Toggle(checked)));
            }
        }
        _ => log::warn!("Control '{}' has a value that does not fit its widget", spec.id),
    }
}
