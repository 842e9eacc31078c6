//! Scroll position tracker.
//!
//! Owns the last known viewport sample and a list of subscribers.  Samples
//! are recorded as fast as the environment produces them; subscribers see a
//! throttled stream of [`ScrollTick`]s in subscription order.

use std::cell::Cell;
use std::rc::Rc;

use super::pacer::{Millis, Pacer};

/// Default throttle window for scroll ticks.
pub const DEFAULT_THROTTLE_MS: Millis = 10;

/// One throttled observation of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTick {
    /// Vertical scroll offset (document coordinates of the viewport top).
    pub offset: f64,
    /// Viewport height in the same unit.
    pub viewport: f64,
    /// When the tick was delivered.
    pub at: Millis,
}

type Callback = Box<dyn FnMut(ScrollTick)>;

struct Listener {
    alive: Rc<Cell<bool>>,
    callback: Callback,
}

/// Handle returned by [`ScrollTracker::subscribe`].  Dropping it (or calling
/// [`Subscription::dispose`]) detaches the listener before the next tick.
#[must_use = "dropping a Subscription detaches its listener"]
pub struct Subscription {
    alive: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn dispose(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

pub struct ScrollTracker {
    offset: f64,
    viewport: f64,
    pacer: Pacer,
    listeners: Vec<Listener>,
}

impl ScrollTracker {
    pub fn new(throttle_ms: Millis) -> Self {
        Self {
            offset: 0.0,
            viewport: 0.0,
            pacer: Pacer::throttle(throttle_ms),
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(ScrollTick) + 'static) -> Subscription {
        let alive = Rc::new(Cell::new(true));
        self.listeners.push(Listener {
            alive: Rc::clone(&alive),
            callback: Box::new(callback),
        });
        Subscription { alive }
    }

    /// Record a raw sample from the environment.  Delivers a tick right away
    /// when the throttle window is open; otherwise the sample is held for
    /// the trailing edge.
    pub fn record(&mut self, offset: f64, viewport: f64, now: Millis) {
        self.offset = offset;
        self.viewport = viewport;
        if self.pacer.signal(now) {
            self.dispatch(now);
        }
    }

    /// Whether a throttled sample is waiting for its trailing tick.
    pub fn is_pending(&self) -> bool {
        self.pacer.is_pending()
    }

    /// Flush the trailing tick if its window has elapsed.  Call once per frame.
    pub fn poll(&mut self, now: Millis) -> bool {
        if self.pacer.poll(now) {
            self.dispatch(now);
            true
        } else {
            false
        }
    }

    /// Record a sample and deliver it to every subscriber exactly once,
    /// bypassing the throttle (initial check, reflow).  The throttle window
    /// restarts from here.
    pub fn notify_now(&mut self, offset: f64, viewport: f64, now: Millis) {
        self.offset = offset;
        self.viewport = viewport;
        self.pacer.force(now);
        self.dispatch(now);
    }

    fn dispatch(&mut self, now: Millis) {
        self.listeners.retain(|l| l.alive.get());
        let tick = ScrollTick {
            offset: self.offset,
            viewport: self.viewport,
            at: now,
        };
        for listener in &mut self.listeners {
            if listener.alive.get() {
                (listener.callback)(tick);
            }
        }
    }
}

#[cfg(test)]
impl Subscription {
    pub fn is_active(&self) -> bool {
        self.alive.get()
    }
}

#[cfg(test)]
impl ScrollTracker {
    /// Current offset, read on demand (not throttled).
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.iter().filter(|l| l.alive.get()).count()
    }
}
