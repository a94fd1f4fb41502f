use bytemuck::{Pod, Zeroable};
use foundation::math::Vec3;

/// Boundary line-strip vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

/// Filled-mesh vertex with a per-vertex normal for lighting.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl LineVertex {
    pub fn from_points(points: &[Vec3]) -> Vec<LineVertex> {
        points
            .iter()
            .map(|p| LineVertex {
                position: p.to_f32(),
            })
            .collect()
    }
}

impl MeshVertex {
    /// Vertices on (or just above) the globe, lit with the outward radial
    /// direction as normal.
    pub fn radial(points: &[Vec3]) -> Vec<MeshVertex> {
        points
            .iter()
            .map(|p| MeshVertex {
                position: p.to_f32(),
                normal: p.normalized().unwrap_or(Vec3::Y).to_f32(),
            })
            .collect()
    }
}
