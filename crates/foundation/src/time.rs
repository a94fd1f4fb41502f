/// Time primitives
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn seconds(self) -> f64 {
        self.0
    }

    /// Seconds elapsed since `earlier`; never negative.
    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    pub fn after(self, seconds: f64) -> Time {
        Time(self.0 + seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn since_is_clamped_at_zero() {
        assert_eq!(Time(3.0).since(Time(1.0)), 2.0);
        assert_eq!(Time(1.0).since(Time(3.0)), 0.0);
    }

    #[test]
    fn after_offsets_forward() {
        assert_eq!(Time(1.5).after(2.0), Time(3.5));
    }
}
