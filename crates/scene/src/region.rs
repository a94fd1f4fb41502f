use foundation::bounds::Aabb3;
use foundation::color::Rgba;
use foundation::math::Vec3;
use formats::Polygon;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Countries of the world dataset.
    Base,
    /// Subdivisions (and outline) of the detailed country.
    Detailed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveRole {
    Boundary,
    Fill,
}

/// Line strip for one ring.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    pub points: Vec<Vec3>,
    color: Rgba,
}

impl LinePrimitive {
    pub(crate) fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            color: Rgba::TRANSPARENT,
        }
    }

    pub fn color(&self) -> Rgba {
        self.color
    }
}

/// Indexed triangle mesh covering a visited region.
#[derive(Debug, Clone, PartialEq)]
pub struct FillPrimitive {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
    /// Polygons that had to fall back to a disc marker.
    pub fallback_discs: usize,
    color: Rgba,
}

impl FillPrimitive {
    pub(crate) fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            fallback_discs: 0,
            color: Rgba::TRANSPARENT,
        }
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a triangle list whose indices refer to `vertices`.
    pub(crate) fn append(&mut self, vertices: &[Vec3], indices: impl IntoIterator<Item = u32>) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.indices.extend(indices.into_iter().map(|i| base + i));
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// One country or one subdivision of the detailed country.
///
/// `visited` is fixed at build time: a visited-list change rebuilds the
/// registry because it decides whether a fill exists at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: String,
    pub layer: LayerKind,
    pub visited: bool,
    /// Radius of the shell the region's layer is drawn on.
    pub radius: f64,
    pub polygons: Vec<Polygon>,
    pub bounds: Aabb3,
    pub centroid: Vec3,
    pub boundaries: Vec<LinePrimitive>,
    pub fill: Option<FillPrimitive>,
}

impl Region {
    pub fn has_fill(&self) -> bool {
        self.fill.is_some()
    }

    pub(crate) fn set_color(&mut self, role: PrimitiveRole, color: Rgba) {
        match role {
            PrimitiveRole::Boundary => {
                for line in &mut self.boundaries {
                    line.color = color;
                }
            }
            PrimitiveRole::Fill => {
                if let Some(fill) = &mut self.fill {
                    fill.color = color;
                }
            }
        }
    }
}
