pub mod event_bus;
pub mod frame;
pub mod metrics;
pub mod throttle;
pub mod ticker;

pub use event_bus::*;
pub use frame::*;
pub use metrics::Metrics;
pub use throttle::*;
pub use ticker::*;
