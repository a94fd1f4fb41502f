pub mod backend;
pub mod headless;
pub mod renderer;
pub mod vertex;

pub use backend::*;
pub use headless::*;
pub use renderer::*;
pub use vertex::*;
