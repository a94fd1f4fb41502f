//! Tunables for building, picking and navigating the globe.
//!
//! Every struct deserializes with `#[serde(default)]`, so a host can override
//! a handful of fields and inherit the rest.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub controls: ControlConfig,
    pub build: BuildConfig,
    pub pick: PickConfig,
    pub framing: FramingConfig,
}

impl GlobeConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Fraction of the pending rotation applied per frame (0..=1).
    pub damping_factor: f64,
    pub rotate_speed: f64,
    pub auto_rotate: bool,
    /// Full turns per minute.
    pub auto_rotate_speed: f64,
    pub zoom_speed: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub min_polar_rad: f64,
    pub max_polar_rad: f64,
    /// Auto-rotation stays off this long after programmatic framing.
    pub framing_cooldown_s: f64,
    /// Auto-rotation stays off this long after a region was hovered.
    pub hover_hold_s: f64,
    /// Camera travel that triggers a re-pick of the last pointer position.
    pub repick_delta: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            rotate_speed: 0.5,
            auto_rotate: true,
            auto_rotate_speed: 0.5,
            zoom_speed: 0.8,
            min_distance: 1.5,
            max_distance: 6.0,
            min_polar_rad: 0.35,
            max_polar_rad: std::f64::consts::PI - 0.35,
            framing_cooldown_s: 5.0,
            hover_hold_s: 2.0,
            repick_delta: 1e-3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub globe_radius: f64,
    pub base_scale: f64,
    /// Slightly above the base layer so both outlines stay visible.
    pub detailed_scale: f64,
    pub centroid_lift: f64,
    pub fill_lift: f64,
    pub disc_radius: f64,
    pub disc_segments: u32,
    pub degenerate_normal_eps: f64,
    pub degenerate_area_eps: f64,
    /// Country whose base outline is replaced by the detailed dataset.
    pub detailed_country: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            globe_radius: 1.0,
            base_scale: 1.0,
            detailed_scale: 1.002,
            centroid_lift: 0.01,
            fill_lift: 0.001,
            disc_radius: 0.01,
            disc_segments: 16,
            degenerate_normal_eps: 1e-9,
            degenerate_area_eps: 1e-12,
            detailed_country: "中国".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PickConfig {
    /// Regions whose bounding diagonal is below this get the small-region bias.
    pub small_region_diagonal: f64,
    pub small_region_ratio: f64,
    pub subdivision_ratio: f64,
    pub pointer_throttle_s: f64,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            small_region_diagonal: 0.05,
            small_region_ratio: 2.0,
            subdivision_ratio: 1.5,
            pointer_throttle_s: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub distance: f64,
    pub narrow_distance: f64,
    /// Viewports narrower than this (in pixels) use `narrow_distance`.
    pub narrow_width_px: u32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            lat_deg: 35.0,
            lon_deg: 105.0,
            distance: 2.6,
            narrow_distance: 3.4,
            narrow_width_px: 768,
        }
    }
}

impl FramingConfig {
    pub fn distance_for_width(&self, width_px: u32) -> f64 {
        if width_px < self.narrow_width_px {
            self.narrow_distance
        } else {
            self.distance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GlobeConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = GlobeConfig::from_json_str(
            r#"{"pick": {"small_region_diagonal": 0.1}, "controls": {"auto_rotate": false}}"#,
        )
        .expect("config");
        let mut expected = GlobeConfig::default();
        expected.pick.small_region_diagonal = 0.1;
        expected.controls.auto_rotate = false;
        assert_eq!(cfg, expected);
    }

    #[test]
    fn narrow_viewports_back_off() {
        let f = GlobeConfig::default().framing;
        assert_eq!(f.distance_for_width(400), f.narrow_distance);
        assert_eq!(f.distance_for_width(1280), f.distance);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(GlobeConfig::from_json_str("{").is_err());
    }
}
