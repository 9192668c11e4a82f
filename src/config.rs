use crate::screen;

/// Window settings for one front-end.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: &'static str,
    pub initial_size: screen::Size,
}

impl AppConfig {
    pub fn desktop() -> Self {
        Self {
            title: "wgpu-mandel - winit",
            initial_size: screen::Size::new(512, 512),
        }
    }

    /// Larger window, so the control panel does not cover most of the fractal.
    pub fn overlay() -> Self {
        Self {
            title: "wgpu-mandel - egui overlay",
            initial_size: screen::Size::new(768, 768),
        }
    }

    pub fn sdl() -> Self {
        Self {
            title: "wgpu-mandel - SDL2",
            initial_size: screen::Size::new(512, 512),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_ends_have_distinct_titles() {
        let configs = [AppConfig::desktop(), AppConfig::overlay(), AppConfig::sdl()];

        assert_ne!(configs[0].title, configs[1].title);
        assert_ne!(configs[1].title, configs[2].title);
        assert!(configs.iter().all(|config| !config.initial_size.is_empty()));
    }

    #[test]
    fn overlay_window_is_larger() {
        assert_eq!(AppConfig::overlay().initial_size, screen::Size::new(768, 768));
        assert_eq!(AppConfig::desktop().initial_size, screen::Size::new(512, 512));
    }
}
