use std::cell::RefCell;
use std::rc::Rc;

/// Host-side wiring the view switches on when mounted and off on teardown.
pub trait HostBindings {
    /// Pointer and resize listeners.
    fn attach_listeners(&mut self);
    fn detach_listeners(&mut self);
    /// Whatever the host uses to notice theme changes.
    fn observe_theme(&mut self);
    fn disconnect_theme(&mut self);
}

#[derive(Debug, Default)]
struct HostState {
    listeners: bool,
    theme_observed: bool,
    attach_calls: u64,
    detach_calls: u64,
}

/// Host that only records its state. Clones share it.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    state: Rc<RefCell<HostState>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listeners_attached(&self) -> bool {
        self.state.borrow().listeners
    }

    pub fn theme_observed(&self) -> bool {
        self.state.borrow().theme_observed
    }

    pub fn attach_calls(&self) -> u64 {
        self.state.borrow().attach_calls
    }

    pub fn detach_calls(&self) -> u64 {
        self.state.borrow().detach_calls
    }
}

impl HostBindings for RecordingHost {
    fn attach_listeners(&mut self) {
        let mut s = self.state.borrow_mut();
        s.listeners = true;
        s.attach_calls += 1;
    }

    fn detach_listeners(&mut self) {
        let mut s = self.state.borrow_mut();
        s.listeners = false;
        s.detach_calls += 1;
    }

    fn observe_theme(&mut self) {
        self.state.borrow_mut().theme_observed = true;
    }

    fn disconnect_theme(&mut self) {
        self.state.borrow_mut().theme_observed = false;
    }
}
