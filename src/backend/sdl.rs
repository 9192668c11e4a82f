//! The SDL2 front-end. Native only.

use std::{thread, time::Duration};

use log::{error, trace};
use sdl2::{
    event::{Event, WindowEvent},
    mouse::MouseState,
    video::Window,
};

use crate::{
    config::AppConfig,
    error::InitError,
    frame::{NoOverlay, Renderer},
    gpu::Gpu,
    input::{FramebufferSize, PointerButton, PointerState},
    screen,
};

/// Pause between frames. Keeps the loop from spinning when the platform does
/// not block in `present`.
const FRAME_PAUSE: Duration = Duration::from_millis(16);

impl FramebufferSize for Window {
    fn framebuffer_size(&self) -> screen::Size {
        let (width, height) = self.drawable_size();
        screen::Size::new(width, height)
    }
}

/// SDL's mouse state, with the cursor moved from window coordinates into
/// drawable pixels so it matches the framebuffer on HiDPI displays.
struct Pointer {
    mouse: MouseState,
    pixels_per_point: [f32; 2],
}

impl Pointer {
    fn sample(mouse: MouseState, window: &Window) -> Self {
        let (width, height) = window.size();
        Self {
            mouse,
            pixels_per_point: pixels_per_point(
                screen::Size::new(width, height),
                window.framebuffer_size(),
            ),
        }
    }
}

/// Drawable pixels per window coordinate on each axis.
fn pixels_per_point(window: screen::Size, drawable: screen::Size) -> [f32; 2] {
    if window.is_empty() {
        return [1.0, 1.0];
    }
    [
        drawable.width as f32 / window.width as f32,
        drawable.height as f32 / window.height as f32,
    ]
}

impl PointerState for Pointer {
    fn cursor_position(&self) -> [f32; 2] {
        [
            self.mouse.x() as f32 * self.pixels_per_point[0],
            self.mouse.y() as f32 * self.pixels_per_point[1],
        ]
    }

    fn is_pressed(&self, button: PointerButton) -> bool {
        match button {
            PointerButton::Left => self.mouse.left(),
            PointerButton::Right => self.mouse.right(),
        }
    }
}

/// Open a window and run the fractal until it is closed. Returns the process
/// exit code.
pub fn run(config: AppConfig) -> i32 {
    env_logger::init();

    match run_window(config) {
        Ok(()) => 0,
        Err(error) => {
            error!("{}", error);
            error.exit_code()
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    Frame(#[from] crate::error::FrameError),
}

impl RunError {
    fn exit_code(&self) -> i32 {
        match self {
            RunError::Init(error) => error.exit_code(),
            RunError::Frame(error) => error.exit_code(),
        }
    }
}

fn run_window(config: AppConfig) -> Result<(), RunError> {
    let sdl = sdl2::init().map_err(InitError::Window)?;
    let video = sdl.video().map_err(InitError::Window)?;

    let window = video
        .window(
            config.title,
            config.initial_size.width,
            config.initial_size.height,
        )
        .position_centered()
        .resizable()
        .build()
        .map_err(|error| InitError::Window(error.to_string()))?;

    let mut event_pump = sdl.event_pump().map_err(InitError::Window)?;

    let gpu = Gpu::acquire(&window, window.framebuffer_size())?;
    let mut renderer = Renderer::new(gpu, window.framebuffer_size());

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'running,
                Event::Window {
                    window_id,
                    win_event: WindowEvent::Close,
                    ..
                } if window_id == window.id() => break 'running,
                _ => {}
            }
        }

        let pointer = Pointer::sample(event_pump.mouse_state(), &window);
        let outcome = renderer.tick(&pointer, &window, &mut NoOverlay)?;
        trace!("tick finished: {:?}", outcome);

        thread::sleep(FRAME_PAUSE);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidpi_drawable_doubles_cursor_coordinates() {
        let ratio = pixels_per_point(screen::Size::new(512, 512), screen::Size::new(1024, 1024));
        assert_eq!(ratio, [2.0, 2.0]);
    }

    #[test]
    fn plain_display_keeps_cursor_coordinates() {
        let ratio = pixels_per_point(screen::Size::new(640, 480), screen::Size::new(640, 480));
        assert_eq!(ratio, [1.0, 1.0]);
    }

    #[test]
    fn minimised_window_does_not_divide_by_zero() {
        let ratio = pixels_per_point(screen::Size::new(0, 0), screen::Size::new(0, 0));
        assert_eq!(ratio, [1.0, 1.0]);
    }
}
