/// Framebuffer size in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A minimised window reports a zero-sized framebuffer.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The largest square that fits, used for the initial canvas in the browser.
    pub fn square(&self) -> Self {
        let side = self.width.min(self.height);
        Self::new(side, side)
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Size {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}
