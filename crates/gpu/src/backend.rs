use foundation::handles::Handle;

use crate::renderer::RenderFrame;
use crate::vertex::{LineVertex, MeshVertex};

/// GPU-side buffer owned by a [`RenderBackend`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub Handle);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        self.width.max(1) as f64 / self.height.max(1) as f64
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        SurfaceSize::new(800, 600)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuError {
    SurfaceUnavailable,
    ContextLost,
    NotAttached,
    Upload(String),
}

impl std::fmt::Display for GpuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuError::SurfaceUnavailable => write!(f, "render surface unavailable"),
            GpuError::ContextLost => write!(f, "rendering context lost"),
            GpuError::NotAttached => write!(f, "render surface is not attached"),
            GpuError::Upload(msg) => write!(f, "buffer upload failed: {msg}"),
        }
    }
}

impl std::error::Error for GpuError {}

/// Everything the globe needs from a graphics API.
///
/// All calls happen on the thread that owns the view; implementations do not
/// need to be `Send`.
pub trait RenderBackend {
    /// Acquires the render surface inside the host container.
    fn attach(&mut self) -> Result<SurfaceSize, GpuError>;
    /// Detaches the surface from the host container. Idempotent.
    fn detach(&mut self);
    fn resize(&mut self, size: SurfaceSize);
    fn upload_lines(&mut self, vertices: &[LineVertex]) -> Result<BufferHandle, GpuError>;
    fn upload_mesh(
        &mut self,
        vertices: &[MeshVertex],
        indices: &[u32],
    ) -> Result<BufferHandle, GpuError>;
    /// Frees a buffer. Unknown handles are ignored.
    fn release(&mut self, handle: BufferHandle);
    /// Issues one draw of `frame`.
    fn submit(&mut self, frame: &RenderFrame) -> Result<(), GpuError>;
}
