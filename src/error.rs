use thiserror::Error;

/// Unrecoverable failures while acquiring the window and GPU resources.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("failed to create window: {0}")]
    Window(String),
    #[error("no GPU adapter is compatible with the window surface")]
    NoAdapter,
    #[error("failed to request GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("the window surface supports no texture format on this adapter")]
    NoSurfaceFormat,
}

impl InitError {
    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            InitError::Window(_) => 1,
            InitError::NoAdapter => 2,
            InitError::RequestDevice(_) => 3,
            InitError::NoSurfaceFormat => 4,
        }
    }
}

impl From<winit::error::OsError> for InitError {
    fn from(err: winit::error::OsError) -> Self {
        InitError::Window(err.to_string())
    }
}

/// Per-frame failures that are not handled by reconfiguring the surface.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("out of memory while acquiring the next surface texture")]
    OutOfMemory,
}

impl FrameError {
    pub fn exit_code(&self) -> i32 {
        4
    }
}
