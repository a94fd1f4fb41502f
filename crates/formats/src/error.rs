#[derive(Debug)]
pub enum DatasetError {
    Json(String),
    NotAFeatureCollection,
    InvalidVisitedList(String),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Json(msg) => write!(f, "JSON parse error: {msg}"),
            DatasetError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            DatasetError::InvalidVisitedList(msg) => write!(f, "invalid visited list: {msg}"),
        }
    }
}

impl std::error::Error for DatasetError {}
