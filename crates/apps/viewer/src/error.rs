use gpu::GpuError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The render surface or context could not be used; the view is unmounted
    /// and a later `mount` may retry.
    Gpu(GpuError),
}

impl std::fmt::Display for ViewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewError::Gpu(err) => write!(f, "globe view unavailable: {err}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewError::Gpu(err) => Some(err),
        }
    }
}

impl From<GpuError> for ViewError {
    fn from(err: GpuError) -> Self {
        ViewError::Gpu(err)
    }
}
