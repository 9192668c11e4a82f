//! Mapping from framebuffer pixels to the complex plane.
//!
//! The [`Viewport`] owns the process-wide [`Uniforms`] record. Zoom and resize
//! mutate it in place and mark it dirty, and the frame loop pushes a dirty
//! record to the GPU before encoding the next draw.

use log::debug;

use crate::{screen, uniforms::Uniforms};

/// Magnitude of one zoom step per frame while a pointer button is held.
pub const ZOOM_STEP: f32 = 0.05;

/// The live-tunable colouring parameters of the record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Colouring {
    pub iterations: i32,
    pub colour_count: i32,
    pub shift: f32,
}

pub struct Viewport {
    uniforms: Uniforms,
    baseline: Option<screen::Size>,
    dirty: bool,
}

impl Viewport {
    pub fn new(uniforms: Uniforms) -> Self {
        Self {
            uniforms,
            baseline: None,
            dirty: false,
        }
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    /// Scale both axes by `1 + delta` around the pixel under `cursor`.
    ///
    /// A negative `delta` zooms in. The translation moves by the cursor's
    /// offset from the framebuffer centre times the new extent, so the cursor
    /// at the exact centre leaves the translation untouched. Scale is not
    /// clamped.
    pub fn zoom(&mut self, delta: f32, cursor: [f32; 2], framebuffer: screen::Size) {
        if framebuffer.is_empty() {
            return;
        }

        let half_extent = [
            framebuffer.width as f32 * 0.5,
            framebuffer.height as f32 * 0.5,
        ];

        for axis in 0..2 {
            self.uniforms.scale[axis] *= 1.0 + delta;
            let offset = (half_extent[axis] - cursor[axis]) / half_extent[axis];
            self.uniforms.translation[axis] += offset * delta * self.uniforms.scale[axis];
        }

        self.dirty = true;
    }

    /// Keep the complex-plane extent per pixel constant across a framebuffer
    /// resize.
    ///
    /// The first call only records the baseline size. Translation is never
    /// changed. Zero-sized framebuffers are ignored.
    pub fn resize(&mut self, size: screen::Size) {
        if size.is_empty() {
            return;
        }

        if let Some(previous) = self.baseline {
            self.uniforms.scale[0] *= size.width as f32 / previous.width as f32;
            self.uniforms.scale[1] *= size.height as f32 / previous.height as f32;
        }

        debug!(
            "viewport resized to {}x{}, scale {:?}",
            size.width, size.height, self.uniforms.scale
        );

        self.baseline = Some(size);
        self.uniforms.window_size = [size.width as f32, size.height as f32];
        self.dirty = true;
    }

    pub fn colouring(&self) -> Colouring {
        Colouring {
            iterations: self.uniforms.iterations,
            colour_count: self.uniforms.colour_count,
            shift: self.uniforms.shift,
        }
    }

    pub fn set_colouring(&mut self, colouring: Colouring) {
        if colouring == self.colouring() {
            return;
        }

        self.uniforms.iterations = colouring.iterations;
        self.uniforms.colour_count = colouring.colour_count;
        self.uniforms.shift = colouring.shift;
        self.dirty = true;
    }

    /// The complex number the fragment shader computes for `pixel`.
    pub fn point_at(&self, pixel: [f32; 2]) -> [f32; 2] {
        let Uniforms {
            scale,
            translation,
            window_size,
            ..
        } = self.uniforms;

        [
            translation[0] - scale[0] + pixel[0] / window_size[0] * (scale[0] * 2.0),
            translation[1] - scale[1] + pixel[1] / window_size[1] * (scale[1] * 2.0),
        ]
    }

    /// Returns the record once after each mutation.
    pub fn take_dirty(&mut self) -> Option<Uniforms> {
        if self.dirty {
            self.dirty = false;
            Some(self.uniforms)
        } else {
            None
        }
    }
}
