use gpu::{BufferHandle, DrawCommand, GpuError, LineVertex, MeshVertex, RenderBackend, RenderFrame};
use scene::{PrimitiveRole, RegionKey, RegionRegistry};

/// GPU buffers uploaded for one registry build.
#[derive(Debug, Default)]
pub(crate) struct GpuScene {
    buffers: Vec<(RegionKey, PrimitiveRole, BufferHandle)>,
}

impl GpuScene {
    /// Uploads every primitive. On failure, whatever was uploaded is released.
    pub(crate) fn upload<B: RenderBackend>(
        backend: &mut B,
        registry: &RegionRegistry,
    ) -> Result<Self, GpuError> {
        let mut scene = GpuScene::default();
        if let Err(err) = scene.upload_all(backend, registry) {
            scene.release(backend);
            return Err(err);
        }
        Ok(scene)
    }

    fn upload_all<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        registry: &RegionRegistry,
    ) -> Result<(), GpuError> {
        for (key, region) in registry.iter() {
            for line in &region.boundaries {
                let handle = backend.upload_lines(&LineVertex::from_points(&line.points))?;
                self.buffers.push((key, PrimitiveRole::Boundary, handle));
            }
            if let Some(fill) = &region.fill {
                let vertices = MeshVertex::radial(&fill.vertices);
                let handle = backend.upload_mesh(&vertices, &fill.indices)?;
                self.buffers.push((key, PrimitiveRole::Fill, handle));
            }
        }
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.buffers.len()
    }

    pub(crate) fn release<B: RenderBackend>(&mut self, backend: &mut B) {
        for (_, _, handle) in self.buffers.drain(..) {
            backend.release(handle);
        }
    }

    /// Appends region draws to `frame`: fills first, outlines on top.
    pub(crate) fn record(&self, registry: &RegionRegistry, frame: &mut RenderFrame) {
        for (key, role, buffer) in &self.buffers {
            if *role != PrimitiveRole::Fill {
                continue;
            }
            if let Some(color) = registry
                .get(*key)
                .and_then(|r| r.fill.as_ref())
                .map(|f| f.color())
            {
                frame.push(DrawCommand::Mesh {
                    buffer: *buffer,
                    color,
                });
            }
        }
        for (key, role, buffer) in &self.buffers {
            if *role != PrimitiveRole::Boundary {
                continue;
            }
            if let Some(color) = registry
                .get(*key)
                .and_then(|r| r.boundaries.first())
                .map(|l| l.color())
            {
                frame.push(DrawCommand::Lines {
                    buffer: *buffer,
                    color,
                });
            }
        }
    }
}
