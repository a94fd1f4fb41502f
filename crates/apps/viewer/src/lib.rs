//! Globe view lifecycle: mounts the region scene into a host surface, drives
//! the render loop and turns pointer input into hover/selection output.

mod error;
mod events;
mod gpu_scene;
mod host;
mod view;

pub use error::ViewError;
pub use events::GlobeEvent;
pub use host::{HostBindings, RecordingHost};
pub use view::{GlobeInputs, GlobeView};
