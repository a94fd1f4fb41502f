use foundation::time::Time;

/// Leading-edge throttle: the first call passes, further calls within
/// `interval_s` of the last accepted one are dropped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Throttle {
    interval_s: f64,
    last: Option<Time>,
}

impl Throttle {
    pub fn new(interval_s: f64) -> Self {
        Self {
            interval_s: interval_s.max(0.0),
            last: None,
        }
    }

    pub fn interval_s(&self) -> f64 {
        self.interval_s
    }

    pub fn try_acquire(&mut self, now: Time) -> bool {
        if let Some(last) = self.last
            && now.since(last) < self.interval_s
            && now.seconds() >= last.seconds()
        {
            return false;
        }
        self.last = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
