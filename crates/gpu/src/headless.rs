//! Backend that records what would have reached the GPU.
//!
//! Used by the viewer's tests and by hosts without a display; it tracks live
//! buffers and submitted frames so resource leaks show up as assertions.

use std::collections::BTreeMap;

use foundation::handles::HandleAllocator;
use tracing::{debug, trace};

use crate::backend::{BufferHandle, GpuError, RenderBackend, SurfaceSize};
use crate::renderer::RenderFrame;
use crate::vertex::{LineVertex, MeshVertex};

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    size: SurfaceSize,
    attached: bool,
    surface_available: bool,
    context_lost: bool,
    handles: HandleAllocator,
    buffers: BTreeMap<BufferHandle, usize>,
    frames_submitted: u64,
    last_frame: Option<RenderFrame>,
    attach_count: u64,
    detach_count: u64,
}

impl HeadlessBackend {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            surface_available: true,
            ..Self::default()
        }
    }

    /// A backend whose surface can never be acquired.
    pub fn unavailable() -> Self {
        Self {
            surface_available: false,
            ..Self::default()
        }
    }

    pub fn set_surface_available(&mut self, available: bool) {
        self.surface_available = available;
    }

    /// Simulates a lost context: every later upload and submit fails.
    pub fn lose_context(&mut self) {
        self.context_lost = true;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_bytes(&self) -> usize {
        self.buffers.values().sum()
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    pub fn attach_count(&self) -> u64 {
        self.attach_count
    }

    pub fn detach_count(&self) -> u64 {
        self.detach_count
    }

    fn check_ready(&self) -> Result<(), GpuError> {
        if self.context_lost {
            return Err(GpuError::ContextLost);
        }
        if !self.attached {
            return Err(GpuError::NotAttached);
        }
        Ok(())
    }

    fn store(&mut self, bytes: usize) -> BufferHandle {
        let handle = BufferHandle(self.handles.allocate());
        self.buffers.insert(handle, bytes);
        handle
    }
}

impl RenderBackend for HeadlessBackend {
    fn attach(&mut self) -> Result<SurfaceSize, GpuError> {
        if !self.surface_available {
            return Err(GpuError::SurfaceUnavailable);
        }
        if self.context_lost {
            return Err(GpuError::ContextLost);
        }
        self.attached = true;
        self.attach_count += 1;
        debug!(width = self.size.width, height = self.size.height, "surface attached");
        Ok(self.size)
    }

    fn detach(&mut self) {
        if self.attached {
            self.attached = false;
            self.detach_count += 1;
            debug!("surface detached");
        }
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn upload_lines(&mut self, vertices: &[LineVertex]) -> Result<BufferHandle, GpuError> {
        self.check_ready()?;
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        Ok(self.store(bytes.len()))
    }

    fn upload_mesh(
        &mut self,
        vertices: &[MeshVertex],
        indices: &[u32],
    ) -> Result<BufferHandle, GpuError> {
        self.check_ready()?;
        if let Some(bad) = indices.iter().find(|i| **i as usize >= vertices.len()) {
            return Err(GpuError::Upload(format!(
                "index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }
        let vb: &[u8] = bytemuck::cast_slice(vertices);
        let ib: &[u8] = bytemuck::cast_slice(indices);
        Ok(self.store(vb.len() + ib.len()))
    }

    fn release(&mut self, handle: BufferHandle) {
        if self.buffers.remove(&handle).is_some() {
            self.handles.release(handle.0);
        }
    }

    fn submit(&mut self, frame: &RenderFrame) -> Result<(), GpuError> {
        self.check_ready()?;
        self.frames_submitted += 1;
        trace!(commands = frame.commands.len(), "frame submitted");
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
