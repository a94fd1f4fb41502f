pub mod builder;
pub mod camera;
pub mod config;
pub mod controller;
pub mod controls;
pub mod materials;
pub mod picking;
pub mod region;
pub mod registry;

pub use builder::{RegionBuilder, subdivision_id};
pub use camera::{Camera, Viewport};
pub use config::{BuildConfig, ControlConfig, FramingConfig, GlobeConfig, PickConfig};
pub use controller::{CameraUpdate, SceneController};
pub use controls::OrbitControls;
pub use materials::{MaterialManager, Theme, ThemePalette, region_label};
pub use picking::{PickHit, Ray, RegionPicker, ray_sphere_hit};
pub use region::{FillPrimitive, LayerKind, LinePrimitive, PrimitiveRole, Region};
pub use registry::{BuildStats, RegionKey, RegionRegistry};
