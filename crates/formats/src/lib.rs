pub mod error;
pub mod geojson;
pub mod visited;

pub use error::*;
pub use geojson::*;
pub use visited::*;
