//! Orbit controls around the globe center.
//!
//! The camera sits on a sphere described by azimuth, polar angle and distance.
//! Pointer drags feed a pending rotation that is drained a fraction per frame
//! (damping), so releasing a drag leaves the globe drifting to a stop.

use foundation::math::Vec3;

use crate::config::ControlConfig;

/// Frames per second the damping factor is calibrated for.
const REFERENCE_FPS: f64 = 60.0;

/// Pending rotation below this (radians) is dropped.
const REST_EPSILON: f64 = 1e-6;

/// Zoom smoothing factor (higher = faster response).
const ZOOM_SMOOTHING: f64 = 8.0;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    config: ControlConfig,
    azimuth: f64,
    polar: f64,
    distance: f64,
    target_distance: f64,
    pending_azimuth: f64,
    pending_polar: f64,
    dragging: bool,
    last_pos_px: [f64; 2],
    auto_rotate: bool,
}

impl OrbitControls {
    pub fn new(config: ControlConfig) -> Self {
        let distance = 0.5 * (config.min_distance + config.max_distance);
        let auto_rotate = config.auto_rotate;
        let mut controls = Self {
            config,
            azimuth: 0.0,
            polar: std::f64::consts::FRAC_PI_2,
            distance,
            target_distance: distance,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            dragging: false,
            last_pos_px: [0.0, 0.0],
            auto_rotate,
        };
        controls.clamp();
        controls
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Places the camera at `position` (relative to the globe center) and
    /// drops any pending motion.
    pub fn look_from(&mut self, position: Vec3) {
        let r = position.length();
        if r <= 0.0 || !r.is_finite() {
            return;
        }
        self.distance = r;
        self.target_distance = r;
        self.polar = (position.y / r).clamp(-1.0, 1.0).acos();
        self.azimuth = position.x.atan2(position.z);
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.clamp();
    }

    pub fn position(&self) -> Vec3 {
        let s = self.polar.sin();
        Vec3::new(
            self.distance * s * self.azimuth.sin(),
            self.distance * self.polar.cos(),
            self.distance * s * self.azimuth.cos(),
        )
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn polar(&self) -> f64 {
        self.polar
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn auto_rotate_enabled(&self) -> bool {
        self.auto_rotate
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    /// True while a drag, drift or zoom is still moving the camera.
    pub fn is_moving(&self) -> bool {
        self.dragging
            || self.pending_azimuth.abs() > REST_EPSILON
            || self.pending_polar.abs() > REST_EPSILON
            || (self.target_distance - self.distance).abs() > REST_EPSILON
    }

    pub fn on_pointer_down(&mut self, pos_px: [f64; 2]) {
        self.dragging = true;
        self.last_pos_px = pos_px;
    }

    /// Rotates by the drag since the last event; `viewport_height_px` maps a
    /// full-height drag to one full turn.
    pub fn on_pointer_move(&mut self, pos_px: [f64; 2], viewport_height_px: f64) {
        if !self.dragging {
            return;
        }
        let h = viewport_height_px.max(1.0);
        let dx = pos_px[0] - self.last_pos_px[0];
        let dy = pos_px[1] - self.last_pos_px[1];
        self.last_pos_px = pos_px;

        let k = std::f64::consts::TAU * self.config.rotate_speed / h;
        self.pending_azimuth -= dx * k;
        self.pending_polar -= dy * k;
    }

    pub fn on_pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Positive `delta` zooms out.
    pub fn on_wheel(&mut self, delta: f64) {
        let factor = (delta * 0.002 * self.config.zoom_speed).exp();
        self.target_distance = (self.target_distance * factor)
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Advances damping, auto-rotation and zoom by `dt` seconds.
    ///
    /// `auto_rotate_allowed` lets the caller hold auto-rotation off (cooldowns,
    /// hover) without touching the enabled flag.
    pub fn update(&mut self, dt: f64, auto_rotate_allowed: bool) {
        let dt = dt.max(0.0);

        if self.auto_rotate && auto_rotate_allowed && !self.dragging {
            // `auto_rotate_speed` full turns per minute.
            self.azimuth += std::f64::consts::TAU / 60.0 * self.config.auto_rotate_speed * dt;
        }

        let damping = self.config.damping_factor.clamp(0.0, 1.0);
        let applied = if damping >= 1.0 || damping <= 0.0 {
            1.0
        } else {
            1.0 - (1.0 - damping).powf(dt * REFERENCE_FPS)
        };
        let da = self.pending_azimuth * applied;
        let dp = self.pending_polar * applied;
        self.azimuth += da;
        self.polar += dp;
        self.pending_azimuth -= da;
        self.pending_polar -= dp;
        if self.pending_azimuth.abs() <= REST_EPSILON {
            self.pending_azimuth = 0.0;
        }
        if self.pending_polar.abs() <= REST_EPSILON {
            self.pending_polar = 0.0;
        }

        let zoom_alpha = 1.0 - (-ZOOM_SMOOTHING * dt).exp();
        self.distance += (self.target_distance - self.distance) * zoom_alpha;
        self.clamp();
    }

    fn clamp(&mut self) {
        let lo = self.config.min_polar_rad.max(1e-6);
        let hi = self
            .config
            .max_polar_rad
            .min(std::f64::consts::PI - 1e-6)
            .max(lo);
        if self.polar <= lo || self.polar >= hi {
            self.pending_polar = 0.0;
        }
        self.polar = self.polar.clamp(lo, hi);
        self.azimuth = self.azimuth.rem_euclid(std::f64::consts::TAU);
        let (min_d, max_d) = (
            self.config.min_distance,
            self.config.max_distance.max(self.config.min_distance),
        );
        self.distance = self.distance.clamp(min_d, max_d);
        self.target_distance = self.target_distance.clamp(min_d, max_d);
    }
}
