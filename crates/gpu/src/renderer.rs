use foundation::color::Rgba;

use crate::backend::BufferHandle;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrawCommand {
    /// Base sphere, drawn first.
    Globe { radius: f32, color: Rgba },
    Lines { buffer: BufferHandle, color: Rgba },
    Mesh { buffer: BufferHandle, color: Rgba },
}

/// One frame's worth of draw commands, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub clear_color: Rgba,
    /// Column-major view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    pub fn new(clear_color: Rgba, view_proj: [[f32; 4]; 4]) -> Self {
        Self {
            clear_color,
            view_proj,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn line_draws(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Lines { .. }))
            .count()
    }

    pub fn mesh_draws(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Mesh { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawCommand, RenderFrame};
    use crate::backend::BufferHandle;
    use foundation::color::Rgba;
    use foundation::handles::Handle;

    #[test]
    fn counts_draws_by_kind() {
        let mut frame = RenderFrame::new(Rgba::TRANSPARENT, [[0.0; 4]; 4]);
        frame.push(DrawCommand::Globe {
            radius: 1.0,
            color: Rgba::TRANSPARENT,
        });
        frame.push(DrawCommand::Lines {
            buffer: BufferHandle(Handle::new(0, 0)),
            color: Rgba::TRANSPARENT,
        });
        frame.push(DrawCommand::Mesh {
            buffer: BufferHandle(Handle::new(1, 0)),
            color: Rgba::TRANSPARENT,
        });
        assert_eq!(frame.line_draws(), 1);
        assert_eq!(frame.mesh_draws(), 1);
    }
}
