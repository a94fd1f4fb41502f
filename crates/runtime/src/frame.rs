use foundation::time::Time;

/// Upper bound on a single frame's delta; a backgrounded tab can hand us
/// multi-second gaps that would otherwise fling the damped controls.
pub const MAX_FRAME_DT_S: f64 = 0.1;

/// Frame metadata for one tick of the render loop.
///
/// Frames are driven by the host's animation-frame timestamps rather than a
/// fixed timestep, so `dt_s` varies from frame to frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the previous frame, clamped to `[0, MAX_FRAME_DT_S]`.
    pub dt_s: f64,
    /// Host timestamp at the start of the frame.
    pub time: Time,
}

impl Frame {
    pub fn first(time: Time) -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time,
        }
    }

    pub fn next(self, now: Time) -> Self {
        Self {
            index: self.index + 1,
            dt_s: now.since(self.time).min(MAX_FRAME_DT_S),
            time: now,
        }
    }
}
