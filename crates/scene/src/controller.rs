use foundation::math::{Vec3, project};
use foundation::time::Time;
use runtime::frame::Frame;
use tracing::debug;

use crate::camera::{Camera, Viewport};
use crate::config::{ControlConfig, FramingConfig};
use crate::controls::OrbitControls;

/// What a frame update did to the camera.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct CameraUpdate {
    pub moved: bool,
    /// The camera travelled far enough that the last pointer position should
    /// be picked again.
    pub repick: bool,
}

/// Owns the camera and its orbit controls.
///
/// Auto-rotation is held off by two independent deadlines: the cooldown after
/// programmatic framing and the hold after a region was hovered.
#[derive(Debug, Clone)]
pub struct SceneController {
    controls: OrbitControls,
    framing: FramingConfig,
    viewport: Viewport,
    framing_until: Option<Time>,
    hover_until: Option<Time>,
    last_position: Vec3,
    last_pick_position: Vec3,
}

impl SceneController {
    pub fn new(controls: ControlConfig, framing: FramingConfig, viewport: Viewport) -> Self {
        let controls = OrbitControls::new(controls);
        let position = controls.position();
        Self {
            controls,
            framing,
            viewport,
            framing_until: None,
            hover_until: None,
            last_position: position,
            last_pick_position: position,
        }
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.controls.position(), self.viewport.aspect())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// Points the camera at the default view and holds auto-rotation for the
    /// framing cooldown.
    pub fn frame_default_view(&mut self, now: Time) {
        let distance = self.framing.distance_for_width(self.viewport.width);
        let position = project(self.framing.lat_deg, self.framing.lon_deg, distance);
        self.controls.look_from(position);
        self.last_position = self.controls.position();
        self.last_pick_position = self.last_position;
        let cooldown = self.controls.config().framing_cooldown_s;
        self.suspend_auto_rotate(now, cooldown);
        debug!(
            lat = self.framing.lat_deg,
            lon = self.framing.lon_deg,
            distance,
            "camera framed"
        );
    }

    pub fn suspend_auto_rotate(&mut self, now: Time, seconds: f64) {
        self.framing_until = later(self.framing_until, now.after(seconds.max(0.0)));
    }

    /// Holds auto-rotation while a region is hovered.
    pub fn hold_for_hover(&mut self, now: Time) {
        let hold = self.controls.config().hover_hold_s;
        self.hover_until = later(self.hover_until, now.after(hold));
    }

    /// Lifts the hover hold; a running framing cooldown stays in force.
    pub fn release_hover_hold(&mut self) {
        self.hover_until = None;
    }

    pub fn auto_rotate_resume_at(&self) -> Option<Time> {
        match (self.framing_until, self.hover_until) {
            (Some(a), Some(b)) => Some(if a > b { a } else { b }),
            (a, b) => a.or(b),
        }
    }

    pub fn auto_rotate_active(&self, now: Time) -> bool {
        self.controls.auto_rotate_enabled()
            && self.auto_rotate_resume_at().is_none_or(|t| now >= t)
    }

    /// Advances controls for one frame.
    pub fn update(&mut self, frame: &Frame) -> CameraUpdate {
        let allowed = self.auto_rotate_resume_at().is_none_or(|t| frame.time >= t);
        self.controls.update(frame.dt_s, allowed);

        let position = self.controls.position();
        let moved = position.distance(self.last_position) > 0.0;
        self.last_position = position;

        let repick =
            position.distance(self.last_pick_position) > self.controls.config().repick_delta;
        if repick {
            self.last_pick_position = position;
        }
        CameraUpdate { moved, repick }
    }

    /// Records that a pick happened from the current pose.
    pub fn mark_picked(&mut self) {
        self.last_pick_position = self.controls.position();
    }
}

fn later(current: Option<Time>, candidate: Time) -> Option<Time> {
    match current {
        Some(t) if t > candidate => Some(t),
        _ => Some(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::SceneController;
    use crate::camera::Viewport;
    use crate::config::{ControlConfig, FramingConfig};
    use foundation::math::project;
    use foundation::time::Time;
    use runtime::frame::Frame;

    fn controller(width: u32) -> SceneController {
        SceneController::new(
            ControlConfig::default(),
            FramingConfig::default(),
            Viewport::new(width, 600),
        )
    }

    #[test]
    fn frames_default_view_with_narrow_fallback() {
        let mut wide = controller(1280);
        wide.frame_default_view(Time(0.0));
        let f = FramingConfig::default();
        let expected = project(f.lat_deg, f.lon_deg, f.distance);
        assert!(wide.camera().position.distance(expected) < 1e-9);

        let mut narrow = controller(375);
        narrow.frame_default_view(Time(0.0));
        assert!((narrow.camera().distance() - f.narrow_distance).abs() < 1e-9);
    }

    #[test]
    fn auto_rotation_waits_for_cooldown() {
        let mut c = controller(1280);
        c.frame_default_view(Time(0.0));
        assert!(!c.auto_rotate_active(Time(1.0)));

        let mut frame = Frame::first(Time(0.0));
        let start = c.camera().position;
        for i in 1..=30 {
            frame = frame.next(Time(i as f64 * 0.1));
            let update = c.update(&frame);
            assert!(!update.moved);
        }
        assert_eq!(c.camera().position, start);

        assert!(c.auto_rotate_active(Time(5.0)));
        frame = frame.next(Time(5.1));
        frame = frame.next(Time(5.2));
        assert!(c.update(&frame).moved);
    }

    #[test]
    fn hover_hold_never_shortens_framing_cooldown() {
        let mut c = controller(1280);
        c.frame_default_view(Time(0.0));
        c.hold_for_hover(Time(0.5));
        assert_eq!(c.auto_rotate_resume_at(), Some(Time(5.0)));

        c.hold_for_hover(Time(4.0));
        assert_eq!(c.auto_rotate_resume_at(), Some(Time(6.0)));

        c.release_hover_hold();
        assert!(!c.auto_rotate_active(Time(4.5)));
        assert!(c.auto_rotate_active(Time(5.0)));
    }

    #[test]
    fn camera_travel_requests_repick() {
        let mut c = controller(1280);
        c.frame_default_view(Time(0.0));
        let mut frame = Frame::first(Time(10.0));
        frame = frame.next(Time(10.1));
        let update = c.update(&frame);
        assert!(update.moved);
        assert!(update.repick);
    }
}
