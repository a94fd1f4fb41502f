use std::collections::BTreeMap;
use std::fmt;

/// Counter and gauge names used by the globe view.
pub mod names {
    pub const FRAMES_DRAWN: &str = "frames_drawn";
    pub const EXTRA_RENDERS: &str = "extra_renders";
    pub const PICKS: &str = "picks";
    pub const PICKS_THROTTLED: &str = "picks_throttled";
    pub const REBUILDS: &str = "rebuilds";
    pub const LIVE_BUFFERS: &str = "live_gpu_buffers";
    pub const REGIONS: &str = "regions";
}

/// Counters and gauges for one view.
///
/// Keys are static names from [`names`]; sorted maps keep the rendered form
/// stable across runs so log lines can be diffed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<&'static str, u64>,
    gauges: BTreeMap<&'static str, i64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn incr(&mut self, name: &'static str) {
        self.add(name, 1);
    }

    pub fn add(&mut self, name: &'static str, by: u64) {
        let slot = self.counters.entry(name).or_insert(0);
        *slot = slot.saturating_add(by);
    }

    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).copied()
    }

    pub fn set_gauge(&mut self, name: &'static str, value: i64) {
        self.gauges.insert(name, value);
    }
}

/// `name=value` pairs, counters first, each group sorted by name.
impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let pairs = self
            .counters
            .iter()
            .map(|(k, v)| (*k, *v as i64))
            .chain(self.gauges.iter().map(|(k, v)| (*k, *v)));
        for (name, value) in pairs {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Metrics, names};

    #[test]
    fn counters_accumulate() {
        let mut m = Metrics::new();
        m.incr(names::PICKS);
        m.add(names::PICKS, 2);
        assert_eq!(m.counter(names::PICKS), 3);
        assert_eq!(m.counter(names::REBUILDS), 0);
        assert_eq!(m.gauge(names::REGIONS), None);
    }

    #[test]
    fn renders_sorted_pairs() {
        let mut m = Metrics::new();
        m.incr(names::REBUILDS);
        m.incr(names::FRAMES_DRAWN);
        m.set_gauge(names::REGIONS, 4);
        m.set_gauge(names::LIVE_BUFFERS, 7);
        m.set_gauge(names::LIVE_BUFFERS, 0);
        assert_eq!(
            m.to_string(),
            "frames_drawn=1 rebuilds=1 live_gpu_buffers=0 regions=4"
        );
    }
}
