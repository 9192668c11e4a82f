//! Realtime Mandelbrot explorer: the whole escape-time iteration runs in a
//! WGSL fragment shader and the host only maintains a small uniform record.
//!
//! The front-ends live in [`backend`]; the binaries just pick one.

pub mod backend;
pub mod command_buffer;
pub mod command_encoder;
pub mod config;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod input;
#[cfg(feature = "overlay")]
pub mod overlay;
pub mod pipeline;
pub mod screen;
pub mod uniforms;
pub mod var;
pub mod viewport;

pub use config::AppConfig;
pub use error::{FrameError, InitError};
pub use frame::{NoOverlay, Renderer};
