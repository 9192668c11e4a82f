//! One-time acquisition of the GPU device and the window's presentable surface.

use log::{debug, error, info};

use crate::{error::InitError, input::PresentSurface, screen};

pub struct Gpu {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_configuration: wgpu::SurfaceConfiguration,
}

impl Gpu {
    /// Request an adapter, a device and a surface for `window`.
    ///
    /// The surface must not outlive `window`; the frame loop owns both and
    /// drops the surface first.
    pub async fn new<W: PresentSurface>(window: &W, size: screen::Size) -> Result<Self, InitError> {
        let instance = wgpu::Instance::new(wgpu::Backends::all());

        let surface = unsafe { instance.create_surface(window) };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: Default::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or(InitError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!(
            "using adapter \"{}\" ({:?})",
            adapter_info.name, adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("device"),
                    features: wgpu::Features::empty(),
                    limits: Self::limits(&adapter),
                },
                None,
            )
            .await?;

        device.on_uncaptured_error(|error| {
            error!("uncaptured GPU error: {}", error);
        });

        let format = surface
            .get_supported_formats(&adapter)
            .first()
            .copied()
            .ok_or(InitError::NoSurfaceFormat)?;
        debug!("preferred surface format {:?}", format);

        let surface_configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
        };
        surface.configure(&device, &surface_configuration);

        Ok(Self {
            surface,
            device,
            queue,
            surface_configuration,
        })
    }

    /// [`Gpu::new`], waiting until the adapter and device are ready.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn acquire<W: PresentSurface>(window: &W, size: screen::Size) -> Result<Self, InitError> {
        pollster::block_on(Self::new(window, size))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn limits(_adapter: &wgpu::Adapter) -> wgpu::Limits {
        wgpu::Limits::default()
    }

    #[cfg(target_arch = "wasm32")]
    fn limits(adapter: &wgpu::Adapter) -> wgpu::Limits {
        wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.surface_configuration.format
    }

    pub fn surface_size(&self) -> screen::Size {
        screen::Size::new(
            self.surface_configuration.width,
            self.surface_configuration.height,
        )
    }

    /// Reconfigure the surface for `size`. Returns `false` for a zero-sized
    /// framebuffer, which cannot be configured.
    pub fn reconfigure(&mut self, size: screen::Size) -> bool {
        if size.is_empty() {
            return false;
        }

        debug!("configuring surface for {}x{}", size.width, size.height);

        self.surface_configuration.width = size.width;
        self.surface_configuration.height = size.height;
        self.surface.configure(&self.device, &self.surface_configuration);
        true
    }

    pub fn current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }
}
