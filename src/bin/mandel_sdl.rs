use wgpu_mandel::{backend::sdl, AppConfig};

fn main() {
    std::process::exit(sdl::run(AppConfig::sdl()));
}
