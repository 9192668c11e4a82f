//! The per-frame update-and-draw loop.
//!
//! [`Renderer`] is the explicit context the backends own: GPU handles, the
//! fractal pipeline and the viewport. Each call to [`Renderer::tick`] applies
//! pointer input, follows framebuffer size changes, pushes the uniform record
//! and draws one frame.

use log::{trace, warn};

use crate::{
    command_buffer,
    command_encoder::CommandEncoderExt,
    error::FrameError,
    gpu::Gpu,
    input::{self, FramebufferSize, PointerState},
    pipeline::MandelPipeline,
    screen,
    uniforms::Uniforms,
    viewport::Viewport,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameState {
    /// No tick has finished yet, or the last one failed.
    Idle,
    /// The last frame was submitted and presented.
    Rendering,
    /// The surface was timed out, outdated or lost; it was reconfigured and
    /// the frame skipped.
    SurfaceStale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    Skipped,
}

impl FrameOutcome {
    /// The state a tick with this outcome ends in.
    pub fn final_state(self) -> FrameState {
        match self {
            FrameOutcome::Presented => FrameState::Rendering,
            FrameOutcome::Skipped => FrameState::SurfaceStale,
        }
    }
}

/// GPU-side extras drawn into the same render pass as the fractal.
pub trait Overlay {
    /// While `true`, pointer buttons do not zoom the fractal.
    fn wants_pointer(&self) -> bool {
        false
    }

    /// The surface was configured again; resources bound to the old one are stale.
    fn surface_reconfigured(&mut self, _gpu: &Gpu) {}

    /// Upload whatever [`Overlay::paint`] needs, before the render pass starts.
    fn prepare(&mut self, _gpu: &Gpu, _encoder: &mut wgpu::CommandEncoder) {}

    fn paint<'pass>(&'pass self, _render_pass: &mut wgpu::RenderPass<'pass>) {}
}

pub struct NoOverlay;

impl Overlay for NoOverlay {}

/// `Ok` when the frame should be skipped after reconfiguring the surface.
fn recoverable(error: &wgpu::SurfaceError) -> Result<(), FrameError> {
    match error {
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost => {
            Ok(())
        }
        wgpu::SurfaceError::OutOfMemory => Err(FrameError::OutOfMemory),
    }
}

/// Host-side work of one tick, decided before the GPU is touched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUpdate {
    /// The surface has to be configured for this size.
    pub reconfigure: Option<screen::Size>,
    /// Record to write to the uniform buffer before encoding the draw.
    pub uniforms: Option<Uniforms>,
}

/// Apply pointer zoom and framebuffer resizes to `viewport`.
///
/// Zoom is skipped while `pointer_captured`. A framebuffer that differs from
/// `surface_size` and is not empty runs the viewport's resize path and asks
/// for a reconfigure.
pub fn update_viewport(
    viewport: &mut Viewport,
    pointer: &impl PointerState,
    framebuffer: screen::Size,
    surface_size: screen::Size,
    pointer_captured: bool,
) -> FrameUpdate {
    if !pointer_captured {
        if let Some(delta) = input::zoom_step(pointer) {
            viewport.zoom(delta, pointer.cursor_position(), framebuffer);
        }
    }

    let reconfigure = if framebuffer != surface_size && !framebuffer.is_empty() {
        viewport.resize(framebuffer);
        Some(framebuffer)
    } else {
        None
    };

    FrameUpdate {
        reconfigure,
        uniforms: viewport.take_dirty(),
    }
}

pub struct Renderer {
    // Dropped before the GPU handles it references.
    pipeline: MandelPipeline,
    viewport: Viewport,
    gpu: Gpu,
    state: FrameState,
}

impl Renderer {
    /// Build the pipeline and establish the viewport's baseline size.
    ///
    /// `baseline` is normally the configured surface size.
    pub fn new(gpu: Gpu, baseline: screen::Size) -> Self {
        let uniforms = Uniforms::new(baseline);
        let pipeline = MandelPipeline::new(gpu.device(), gpu.format(), uniforms);

        let mut viewport = Viewport::new(uniforms);
        viewport.resize(baseline);

        Self {
            pipeline,
            viewport,
            gpu,
            state: FrameState::Idle,
        }
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// The state the last [`Renderer::tick`] ended in; `Idle` before the
    /// first one.
    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn tick(
        &mut self,
        pointer: &impl PointerState,
        framebuffer: &impl FramebufferSize,
        overlay: &mut impl Overlay,
    ) -> Result<FrameOutcome, FrameError> {
        self.state = FrameState::Idle;
        let outcome = self.draw_frame(pointer, framebuffer, overlay)?;
        self.state = outcome.final_state();
        Ok(outcome)
    }

    fn draw_frame(
        &mut self,
        pointer: &impl PointerState,
        framebuffer: &impl FramebufferSize,
        overlay: &mut impl Overlay,
    ) -> Result<FrameOutcome, FrameError> {
        let size = framebuffer.framebuffer_size();

        let update = update_viewport(
            &mut self.viewport,
            pointer,
            size,
            self.gpu.surface_size(),
            overlay.wants_pointer(),
        );

        if let Some(size) = update.reconfigure {
            if self.gpu.reconfigure(size) {
                overlay.surface_reconfigured(&self.gpu);
            }
        }

        // Queued writes land before the submission below.
        if let Some(uniforms) = update.uniforms {
            self.pipeline.write_uniforms(self.gpu.queue(), uniforms);
        }

        let surface_texture = match self.gpu.current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(error) => {
                recoverable(&error)?;
                warn!("skipping frame, surface texture unavailable: {}", error);
                if self.gpu.reconfigure(size) {
                    overlay.surface_reconfigured(&self.gpu);
                }
                return Ok(FrameOutcome::Skipped);
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (gpu, pipeline) = (&self.gpu, &self.pipeline);
        let command_buffer = command_buffer::create(gpu.device(), "mandel-frame", |encoder| {
            overlay.prepare(gpu, encoder);
            let overlay = &*overlay;

            encoder.push_debug_group("mandel-pass");
            encoder.with_clear_pass("mandel-pass", &surface_texture_view, |render_pass| {
                render_pass.insert_debug_marker("mandelbrot");
                pipeline.draw(render_pass);
                overlay.paint(render_pass);
            });
            encoder.pop_debug_group();
        });

        gpu.queue().submit([command_buffer]);
        surface_texture.present();
        trace!("frame presented");

        Ok(FrameOutcome::Presented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        input::{PointerButton, PointerTracker},
        viewport::ZOOM_STEP,
    };

    #[test]
    fn stale_surfaces_are_recoverable() {
        assert!(recoverable(&wgpu::SurfaceError::Timeout).is_ok());
        assert!(recoverable(&wgpu::SurfaceError::Outdated).is_ok());
        assert!(recoverable(&wgpu::SurfaceError::Lost).is_ok());
    }

    #[test]
    fn out_of_memory_is_fatal() {
        assert!(matches!(
            recoverable(&wgpu::SurfaceError::OutOfMemory),
            Err(FrameError::OutOfMemory)
        ));
    }

    #[test]
    fn default_overlay_never_captures_the_pointer() {
        assert!(!NoOverlay.wants_pointer());
    }

    #[test]
    fn outcome_decides_the_final_state() {
        assert_eq!(FrameOutcome::Presented.final_state(), FrameState::Rendering);
        assert_eq!(FrameOutcome::Skipped.final_state(), FrameState::SurfaceStale);
    }

    const SIZE: screen::Size = screen::Size {
        width: 512,
        height: 512,
    };

    fn settled_viewport(size: screen::Size) -> Viewport {
        let mut viewport = Viewport::new(Uniforms::new(size));
        viewport.resize(size);
        viewport.take_dirty();
        viewport
    }

    fn pressed(button: PointerButton, position: [f32; 2]) -> PointerTracker {
        let mut pointer = PointerTracker::default();
        pointer.moved(position);
        pointer.set_pressed(button, true);
        pointer
    }

    #[test]
    fn idle_frame_has_nothing_to_do() {
        let mut viewport = settled_viewport(SIZE);

        let update = update_viewport(&mut viewport, &PointerTracker::default(), SIZE, SIZE, false);

        assert_eq!(
            update,
            FrameUpdate {
                reconfigure: None,
                uniforms: None,
            }
        );
    }

    #[test]
    fn held_button_zooms_and_uploads_the_record() {
        let mut viewport = settled_viewport(SIZE);
        let pointer = pressed(PointerButton::Left, [256.0, 256.0]);

        let update = update_viewport(&mut viewport, &pointer, SIZE, SIZE, false);

        let uniforms = update.uniforms.expect("zoom should upload the record");
        assert_eq!(uniforms.scale, viewport.uniforms().scale);
        assert!(uniforms.scale[0] < Uniforms::DEFAULT_SCALE[0]);
        assert_eq!(update.reconfigure, None);
    }

    #[test]
    fn captured_pointer_does_not_zoom() {
        struct Captured;

        impl Overlay for Captured {
            fn wants_pointer(&self) -> bool {
                true
            }
        }

        let mut viewport = settled_viewport(SIZE);
        let pointer = pressed(PointerButton::Right, [10.0, 10.0]);

        let update = update_viewport(
            &mut viewport,
            &pointer,
            SIZE,
            SIZE,
            Captured.wants_pointer(),
        );

        assert_eq!(update.uniforms, None);
        assert_eq!(viewport.uniforms().scale, Uniforms::DEFAULT_SCALE);
    }

    #[test]
    fn size_change_reconfigures_and_resizes() {
        let mut viewport = settled_viewport(SIZE);
        let wider = screen::Size::new(1024, 512);

        let update = update_viewport(
            &mut viewport,
            &PointerTracker::default(),
            wider,
            SIZE,
            false,
        );

        assert_eq!(update.reconfigure, Some(wider));
        let uniforms = update.uniforms.expect("resize should upload the record");
        assert_eq!(uniforms.scale, [3.0, 1.5]);
        assert_eq!(uniforms.window_size, [1024.0, 512.0]);
    }

    #[test]
    fn minimised_window_is_left_alone() {
        let mut viewport = settled_viewport(SIZE);
        let minimised = screen::Size::new(0, 0);

        let update = update_viewport(
            &mut viewport,
            &PointerTracker::default(),
            minimised,
            SIZE,
            false,
        );

        assert_eq!(update.reconfigure, None);
        assert_eq!(update.uniforms, None);
        assert_eq!(viewport.uniforms().window_size, [512.0, 512.0]);
    }

    #[test]
    fn square_start_is_stretched_to_the_canvas_and_zoom_tracks_the_cursor() {
        // The browser build starts from the square inside a 1024x600 canvas.
        let canvas = screen::Size::new(1024, 600);
        let square = canvas.square();
        let mut viewport = settled_viewport(square);

        let first = update_viewport(
            &mut viewport,
            &PointerTracker::default(),
            canvas,
            square,
            false,
        );
        assert_eq!(first.reconfigure, Some(canvas));
        assert_eq!(viewport.uniforms().window_size, [1024.0, 600.0]);

        let cursor = [900.0, 300.0];
        let before = viewport.point_at(cursor);
        let pointer = pressed(PointerButton::Left, cursor);
        update_viewport(&mut viewport, &pointer, canvas, canvas, false);
        let after = viewport.point_at(cursor);

        for axis in 0..2 {
            let bound = viewport.uniforms().scale[axis] * ZOOM_STEP * ZOOM_STEP * 1.1 + 1e-6;
            assert!(
                (after[axis] - before[axis]).abs() <= bound,
                "point under cursor moved from {:?} to {:?}",
                before,
                after
            );
        }
    }
}
