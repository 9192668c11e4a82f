//! Immediate-mode control panel drawn over the fractal with `egui`.
//!
//! The panel exposes the colouring parameters of the uniform record as
//! sliders and shows the frame rate. While egui wants the pointer (hovering or
//! dragging a slider), zooming is suppressed.

use std::{collections::VecDeque, ops::RangeInclusive};

use egui_wgpu::renderer::{Renderer as EguiRenderer, ScreenDescriptor};
use log::{debug, warn};
use winit::{event::WindowEvent, event_loop::EventLoopWindowTarget, window::Window};

use crate::{
    backend::desktop::Frontend,
    frame::{Overlay, Renderer},
    gpu::Gpu,
    viewport::{Colouring, Viewport},
};

pub const PANEL_TITLE: &str = "wgpu-mandel";
pub const PANEL_SIZE: [f32; 2] = [270.0, 130.0];
pub const ITERATIONS: RangeInclusive<i32> = 8..=2000;
pub const COLOUR_COUNT: RangeInclusive<i32> = 2..=3000;
pub const SHIFT: RangeInclusive<f32> = 0.0..=1.0;

/// Where the panel layout is kept between runs.
#[cfg(not(target_arch = "wasm32"))]
const MEMORY_FILE: &str = "mandel-overlay.json";

/// Average frame time over the last [`FrameTimer::WINDOW`] frames.
#[derive(Debug, Default)]
pub struct FrameTimer {
    last_time: Option<f64>,
    frame_times: VecDeque<f32>,
}

impl FrameTimer {
    pub const WINDOW: usize = 60;

    /// Record the start of a frame at `time` seconds.
    pub fn record(&mut self, time: f64) {
        if let Some(last_time) = self.last_time {
            if self.frame_times.len() == Self::WINDOW {
                self.frame_times.pop_front();
            }
            self.frame_times.push_back((time - last_time) as f32);
        }
        self.last_time = Some(time);
    }

    pub fn average_seconds(&self) -> Option<f32> {
        if self.frame_times.is_empty() {
            return None;
        }
        Some(self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32)
    }

    pub fn frames_per_second(&self) -> Option<f32> {
        self.average_seconds()
            .filter(|seconds| *seconds > 0.0)
            .map(|seconds| 1.0 / seconds)
    }
}

/// Lay out the panel contents. Returns `true` if a slider changed `colouring`.
pub fn controls(ui: &mut egui::Ui, colouring: &mut Colouring, timer: &FrameTimer) -> bool {
    let mut modified = false;

    modified |= ui
        .add(egui::Slider::new(&mut colouring.iterations, ITERATIONS).text("Iterations"))
        .changed();
    modified |= ui
        .add(egui::Slider::new(&mut colouring.colour_count, COLOUR_COUNT).text("HSL shades"))
        .changed();
    modified |= ui
        .add(egui::Slider::new(&mut colouring.shift, SHIFT).text("HSL shift"))
        .changed();

    match (timer.average_seconds(), timer.frames_per_second()) {
        (Some(seconds), Some(fps)) => {
            ui.label(format!(
                "average {:.3} ms/frame ({:.1} FPS)",
                seconds * 1000.0,
                fps
            ));
        }
        _ => {
            ui.label("measuring frame rate...");
        }
    }

    modified
}

pub struct EguiOverlay {
    context: egui::Context,
    state: egui_winit::State,
    renderer: EguiRenderer,
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pending_free: Vec<egui::TextureId>,
    screen_descriptor: ScreenDescriptor,
    frame_timer: FrameTimer,
    wants_pointer: bool,
}

impl EguiOverlay {
    pub fn new(
        event_loop: &EventLoopWindowTarget<()>,
        window: &Window,
        renderer: &Renderer,
    ) -> Self {
        let gpu = renderer.gpu();

        let context = egui::Context::default();
        let mut state = egui_winit::State::new(event_loop);
        state.set_pixels_per_point(window.scale_factor() as f32);
        state.set_max_texture_side(gpu.device().limits().max_texture_dimension_2d as usize);

        let overlay = Self {
            context,
            state,
            renderer: EguiRenderer::new(gpu.device(), gpu.format(), None, 1),
            paint_jobs: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
            pending_free: Vec::new(),
            screen_descriptor: ScreenDescriptor {
                size_in_pixels: [gpu.surface_size().width, gpu.surface_size().height],
                pixels_per_point: window.scale_factor() as f32,
            },
            frame_timer: FrameTimer::default(),
            wants_pointer: false,
        };
        overlay.load_memory();
        overlay
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_memory(&self) {
        let memory = match std::fs::read_to_string(MEMORY_FILE) {
            Ok(data) => data,
            Err(_) => return,
        };
        match serde_json::from_str::<egui::Memory>(&memory) {
            Ok(memory) => *self.context.memory() = memory,
            Err(error) => warn!("ignoring {}: {}", MEMORY_FILE, error),
        }
    }

    /// The browser build has no file system access.
    #[cfg(target_arch = "wasm32")]
    fn load_memory(&self) {}

    #[cfg(not(target_arch = "wasm32"))]
    fn save_memory(&self) {
        let memory = self.context.memory().clone();
        let result = serde_json::to_string_pretty(&memory)
            .map_err(|error| error.to_string())
            .and_then(|data| std::fs::write(MEMORY_FILE, data).map_err(|error| error.to_string()));
        if let Err(error) = result {
            warn!("failed to save {}: {}", MEMORY_FILE, error);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn save_memory(&self) {}
}

impl Overlay for EguiOverlay {
    fn wants_pointer(&self) -> bool {
        self.wants_pointer
    }

    fn surface_reconfigured(&mut self, gpu: &Gpu) {
        let size = gpu.surface_size();
        debug!("recreating overlay renderer for {}x{}", size.width, size.height);

        self.renderer = EguiRenderer::new(gpu.device(), gpu.format(), None, 1);
        self.screen_descriptor.size_in_pixels = [size.width, size.height];

        // Nothing this frame refers to a texture the new renderer has. Forcing a
        // font rebuild makes the next frame upload the whole atlas again.
        self.paint_jobs.clear();
        self.textures_delta.clear();
        self.pending_free.clear();
        self.context.set_fonts(egui::FontDefinitions::empty());
        self.context.set_fonts(egui::FontDefinitions::default());
    }

    fn prepare(&mut self, gpu: &Gpu, encoder: &mut wgpu::CommandEncoder) {
        for id in self.pending_free.drain(..) {
            self.renderer.free_texture(&id);
        }

        let textures_delta = std::mem::take(&mut self.textures_delta);
        for (id, image_delta) in &textures_delta.set {
            self.renderer
                .update_texture(gpu.device(), gpu.queue(), *id, image_delta);
        }
        self.pending_free = textures_delta.free;

        let size = gpu.surface_size();
        self.screen_descriptor = ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: self.context.pixels_per_point(),
        };
        self.renderer.update_buffers(
            gpu.device(),
            gpu.queue(),
            encoder,
            &self.paint_jobs,
            &self.screen_descriptor,
        );
    }

    fn paint<'pass>(&'pass self, render_pass: &mut wgpu::RenderPass<'pass>) {
        self.renderer
            .render(render_pass, &self.paint_jobs, &self.screen_descriptor);
    }
}

impl Frontend for EguiOverlay {
    fn on_window_event(&mut self, _window: &Window, event: &WindowEvent) {
        let _response = self.state.on_event(&self.context, event);
    }

    fn begin_frame(&mut self, window: &Window, viewport: &mut Viewport) {
        let raw_input = self.state.take_egui_input(window);
        if let Some(time) = raw_input.time {
            self.frame_timer.record(time);
        }

        let mut colouring = viewport.colouring();
        let mut modified = false;
        let frame_timer = &self.frame_timer;

        let full_output = self.context.run(raw_input, |context| {
            egui::Window::new(PANEL_TITLE)
                .default_pos([0.0, 0.0])
                .default_size(PANEL_SIZE)
                .show(context, |ui| {
                    modified = controls(ui, &mut colouring, frame_timer);
                });
        });

        if modified {
            viewport.set_colouring(colouring);
        }

        self.state
            .handle_platform_output(window, &self.context, full_output.platform_output);
        self.paint_jobs = self.context.tessellate(full_output.shapes);
        self.textures_delta.append(full_output.textures_delta);
        self.wants_pointer = self.context.wants_pointer_input();
    }

    fn exit(&mut self) {
        self.save_memory();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{screen, uniforms::Uniforms};

    fn colouring() -> Colouring {
        Viewport::new(Uniforms::new(screen::Size::new(512, 512))).colouring()
    }

    #[test]
    fn timer_needs_two_frames() {
        let mut timer = FrameTimer::default();
        assert_eq!(timer.average_seconds(), None);

        timer.record(1.0);
        assert_eq!(timer.average_seconds(), None);

        timer.record(1.5);
        assert_eq!(timer.average_seconds(), Some(0.5));
        assert_eq!(timer.frames_per_second(), Some(2.0));
    }

    #[test]
    fn timer_keeps_a_sliding_window() {
        let mut timer = FrameTimer::default();
        timer.record(0.0);
        // One slow frame, then a full window of fast ones pushes it out.
        timer.record(1.0);
        for frame in 1..=FrameTimer::WINDOW {
            timer.record(1.0 + frame as f64 * 0.25);
        }

        assert_eq!(timer.average_seconds(), Some(0.25));
    }

    #[test]
    fn untouched_panel_reports_no_change() {
        let context = egui::Context::default();
        let mut value = colouring();
        let mut modified = true;

        let _ = context.run(egui::RawInput::default(), |context| {
            egui::CentralPanel::default().show(context, |ui| {
                modified = controls(ui, &mut value, &FrameTimer::default());
            });
        });

        assert!(!modified);
        assert_eq!(value, colouring());
    }

    #[test]
    fn slider_ranges_match_the_record_defaults() {
        let defaults = colouring();
        assert!(ITERATIONS.contains(&defaults.iterations));
        assert!(COLOUR_COUNT.contains(&defaults.colour_count));
        assert!(SHIFT.contains(&defaults.shift));
    }
}
