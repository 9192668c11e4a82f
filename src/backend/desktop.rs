//! The `winit` front-end, native and browser.

use log::error;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};

use crate::{
    config::AppConfig,
    error::InitError,
    frame::{NoOverlay, Overlay, Renderer},
    gpu::Gpu,
    input::{FramebufferSize, PointerButton, PointerTracker},
    screen,
    viewport::Viewport,
};

impl FramebufferSize for Window {
    fn framebuffer_size(&self) -> screen::Size {
        self.inner_size().into()
    }
}

/// Front-end specific behaviour plugged into the event loop.
pub trait Frontend: Overlay + 'static {
    /// Sees every window event before the pointer tracker does.
    fn on_window_event(&mut self, _window: &Window, _event: &WindowEvent) {}

    /// Runs before each tick and may edit the viewport.
    fn begin_frame(&mut self, _window: &Window, _viewport: &mut Viewport) {}

    /// The event loop is shutting down.
    fn exit(&mut self) {}
}

impl Frontend for NoOverlay {}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Right => Some(PointerButton::Right),
        _ => None,
    }
}

fn create_window(event_loop: &EventLoop<()>, config: &AppConfig) -> Result<Window, InitError> {
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(PhysicalSize::new(
            config.initial_size.width,
            config.initial_size.height,
        ))
        // Shown once the GPU is ready.
        .with_visible(cfg!(target_arch = "wasm32"))
        .build(event_loop)?;
    Ok(window)
}

#[cfg(not(target_arch = "wasm32"))]
fn fail(error: InitError) -> ! {
    error!("{}", error);
    std::process::exit(error.exit_code())
}

/// Open a window and run the fractal until it is closed.
///
/// `make_frontend` is called once the GPU is ready.
#[cfg(not(target_arch = "wasm32"))]
pub fn start<F, M>(config: AppConfig, make_frontend: M)
where
    F: Frontend,
    M: FnOnce(&EventLoopWindowTarget<()>, &Window, &Renderer) -> F + 'static,
{
    env_logger::init();

    let event_loop = EventLoop::new();
    let window = create_window(&event_loop, &config).unwrap_or_else(|e| fail(e));
    let baseline = window.framebuffer_size();

    pollster::block_on(run(event_loop, window, baseline, make_frontend));
}

/// Open a canvas and run the fractal in the browser.
#[cfg(target_arch = "wasm32")]
pub fn start<F, M>(config: AppConfig, make_frontend: M)
where
    F: Frontend,
    M: FnOnce(&EventLoopWindowTarget<()>, &Window, &Renderer) -> F + 'static,
{
    use winit::platform::web::WindowExtWebSys;

    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let event_loop = EventLoop::new();
    let window = match create_window(&event_loop, &config) {
        Ok(window) => window,
        Err(error) => {
            error!("{}", error);
            return;
        }
    };

    let attached = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.body())
        .and_then(|body| {
            body.append_child(&web_sys::Element::from(window.canvas()))
                .ok()
        });
    if attached.is_none() {
        error!("couldn't append canvas to document body");
        return;
    }

    // The canvas may not have its final size yet; start from a square and
    // let the first tick stretch it.
    let baseline = window.framebuffer_size().square();

    wasm_bindgen_futures::spawn_local(run(event_loop, window, baseline, make_frontend));
}

async fn run<F, M>(
    event_loop: EventLoop<()>,
    window: Window,
    baseline: screen::Size,
    make_frontend: M,
) where
    F: Frontend,
    M: FnOnce(&EventLoopWindowTarget<()>, &Window, &Renderer) -> F + 'static,
{
    // Configured for the baseline, so a canvas of another size shows up as a
    // resize on the first tick.
    let gpu = match Gpu::new(&window, baseline).await {
        Ok(gpu) => gpu,
        Err(error) => {
            #[cfg(not(target_arch = "wasm32"))]
            fail(error);
            #[cfg(target_arch = "wasm32")]
            {
                error!("{}", error);
                return;
            }
        }
    };

    let mut renderer = Renderer::new(gpu, baseline);
    let mut frontend = make_frontend(&event_loop, &window, &renderer);
    let mut pointer = PointerTracker::default();

    window.set_visible(true);

    event_loop.run(move |event, _, control_flow| {
        // To present frames in realtime, *don't* set `control_flow` to `Wait`.
        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                frontend.on_window_event(&window, &event);

                match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        pointer.moved([position.x as f32, position.y as f32]);
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        if let Some(button) = pointer_button(button) {
                            pointer.set_pressed(button, state == ElementState::Pressed);
                        }
                    }
                    WindowEvent::CursorLeft { .. } => {
                        pointer.left_window();
                    }
                    _ => {}
                }
            }
            Event::MainEventsCleared => {
                frontend.begin_frame(&window, renderer.viewport_mut());

                if let Err(error) = renderer.tick(&pointer, &window, &mut frontend) {
                    error!("{}", error);
                    *control_flow = ControlFlow::ExitWithCode(error.exit_code());
                }
            }
            Event::LoopDestroyed => {
                frontend.exit();
            }
            _ => {}
        }
    });
}
