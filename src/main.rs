use wgpu_mandel::{backend::desktop, AppConfig, NoOverlay};

fn main() {
    desktop::start(AppConfig::desktop(), |_, _, _| NoOverlay);
}
