use wgpu_mandel::{backend::desktop, overlay::EguiOverlay, AppConfig};

fn main() {
    desktop::start(AppConfig::overlay(), EguiOverlay::new);
}
