//! Windowing front-ends. Each one implements the capability traits of
//! [`input`](crate::input) and drives a [`Renderer`](crate::frame::Renderer).

pub mod desktop;
#[cfg(all(feature = "sdl", not(target_arch = "wasm32")))]
pub mod sdl;
