//! What the frame loop needs from a windowing backend.
//!
//! Each backend implements these once, so the zoom, resize and uniform logic
//! in [`viewport`](crate::viewport) and [`frame`](crate::frame) is shared by
//! every front-end.

use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle};

use crate::{screen, viewport::ZOOM_STEP};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

pub trait PointerState {
    /// Cursor position in physical pixels, relative to the top-left corner.
    fn cursor_position(&self) -> [f32; 2];

    fn is_pressed(&self, button: PointerButton) -> bool;
}

pub trait FramebufferSize {
    fn framebuffer_size(&self) -> screen::Size;
}

/// A window that `wgpu` can create a presentable surface for.
pub trait PresentSurface: HasRawWindowHandle + HasRawDisplayHandle + FramebufferSize {}

impl<A: HasRawWindowHandle + HasRawDisplayHandle + FramebufferSize> PresentSurface for A {}

/// Zoom delta for the current pointer state: left zooms in, right zooms out.
pub fn zoom_step(pointer: &impl PointerState) -> Option<f32> {
    if pointer.is_pressed(PointerButton::Left) {
        Some(-ZOOM_STEP)
    } else if pointer.is_pressed(PointerButton::Right) {
        Some(ZOOM_STEP)
    } else {
        None
    }
}

/// [`PointerState`] for event-driven backends, fed from window events.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    position: [f32; 2],
    left: bool,
    right: bool,
}

impl PointerTracker {
    pub fn moved(&mut self, position: [f32; 2]) {
        self.position = position;
    }

    pub fn set_pressed(&mut self, button: PointerButton, pressed: bool) {
        match button {
            PointerButton::Left => self.left = pressed,
            PointerButton::Right => self.right = pressed,
        }
    }

    /// The cursor left the window; held buttons no longer reach us.
    pub fn left_window(&mut self) {
        self.left = false;
        self.right = false;
    }
}

impl PointerState for PointerTracker {
    fn cursor_position(&self) -> [f32; 2] {
        self.position
    }

    fn is_pressed(&self, button: PointerButton) -> bool {
        match button {
            PointerButton::Left => self.left,
            PointerButton::Right => self.right,
        }
    }
}
