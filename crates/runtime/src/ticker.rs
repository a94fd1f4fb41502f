//! Frame scheduling.
//!
//! The render loop never calls a platform API directly: it asks a
//! [`FrameScheduler`] for "one more frame" and the host later delivers that
//! request back through [`FrameLoop::begin_frame`]. In a browser the scheduler
//! wraps `requestAnimationFrame`; in tests it is a [`ManualTicker`].

use std::cell::RefCell;
use std::rc::Rc;

use foundation::time::Time;

use crate::frame::Frame;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(pub u64);

pub trait FrameScheduler {
    /// Schedules exactly one future frame callback.
    fn request_frame(&mut self) -> FrameRequestId;
    /// Cancels a pending request. Unknown or already-fired ids are ignored.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

#[derive(Debug, Default)]
struct TickerState {
    next_id: u64,
    pending: Vec<FrameRequestId>,
    requested: u64,
    cancelled: u64,
}

/// Test scheduler: requests queue up until the test fires them.
///
/// Clones share state, so a test can keep one handle while the loop owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    state: Rc<RefCell<TickerState>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Vec<FrameRequestId> {
        self.state.borrow().pending.clone()
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Removes and returns the oldest pending request, as if the host fired it.
    pub fn fire_next(&self) -> Option<FrameRequestId> {
        let mut s = self.state.borrow_mut();
        if s.pending.is_empty() {
            return None;
        }
        Some(s.pending.remove(0))
    }

    pub fn requested_total(&self) -> u64 {
        self.state.borrow().requested
    }

    pub fn cancelled_total(&self) -> u64 {
        self.state.borrow().cancelled
    }
}

impl FrameScheduler for ManualTicker {
    fn request_frame(&mut self) -> FrameRequestId {
        let mut s = self.state.borrow_mut();
        let id = FrameRequestId(s.next_id);
        s.next_id += 1;
        s.requested += 1;
        s.pending.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        let mut s = self.state.borrow_mut();
        let before = s.pending.len();
        s.pending.retain(|p| *p != id);
        if s.pending.len() != before {
            s.cancelled += 1;
        }
    }
}

/// Continuous render loop with at most one outstanding frame request.
///
/// The next frame is requested by [`FrameLoop::end_frame`], i.e. only after the
/// current frame has been drawn, so ticks never overlap.
#[derive(Debug)]
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameRequestId>,
    last_frame: Option<Frame>,
    running: bool,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            last_frame: None,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_frame = None;
        self.pending = Some(self.scheduler.request_frame());
    }

    /// Accepts a fired request. Returns `None` for stale ids or a stopped loop.
    pub fn begin_frame(&mut self, id: FrameRequestId, now: Time) -> Option<Frame> {
        if !self.running || self.pending != Some(id) {
            return None;
        }
        self.pending = None;
        let frame = match self.last_frame {
            None => Frame::first(now),
            Some(prev) => prev.next(now),
        };
        self.last_frame = Some(frame);
        Some(frame)
    }

    /// Schedules the following frame.
    pub fn end_frame(&mut self) {
        if self.running && self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    /// Stops the loop and cancels the outstanding request synchronously.
    pub fn stop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
