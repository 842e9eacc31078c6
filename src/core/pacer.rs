//! Throttle / debounce primitive.
//!
//! One type covers both rate-limiting shapes used by the page: the scroll
//! tracker's throttle (at most one firing per window, trailing edge kept) and
//! the resize debounce (fire once the input has been quiet for a window).
//!
//! Time is passed in explicitly, so the same code runs against the terminal
//! clock and in tests.

/// Milliseconds since the page clock started.
pub type Millis = u64;

/// How the window is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceKind {
    /// Window counts from the last *firing*.
    Throttle,
    /// Window counts from the last *signal*.
    Debounce,
}

/// Rate limiter driven by `signal` (input arrived) and `poll` (time passed).
#[derive(Debug, Clone)]
pub struct Pacer {
    window: Millis,
    kind: PaceKind,
    /// Fire on the first signal of a burst as well as on the trailing edge.
    leading: bool,
    last_fire: Option<Millis>,
    last_signal: Option<Millis>,
    /// Start of the current unfired burst, if any.
    pending_since: Option<Millis>,
}

impl Pacer {
    pub fn new(window: Millis, kind: PaceKind, leading: bool) -> Self {
        Self {
            window,
            kind,
            leading,
            last_fire: None,
            last_signal: None,
            pending_since: None,
        }
    }

    /// Leading + trailing throttle: fires immediately when idle, then at most
    /// once per `window`, and always once more for the last signal of a burst.
    pub fn throttle(window: Millis) -> Self {
        Self::new(window, PaceKind::Throttle, true)
    }

    /// Trailing debounce: fires once `window` has passed with no new signal.
    pub fn debounce(window: Millis) -> Self {
        Self::new(window, PaceKind::Debounce, false)
    }

    /// Record an input.  Returns `true` when the caller should act now
    /// (leading-edge firing).
    pub fn signal(&mut self, now: Millis) -> bool {
        let reference = match self.kind {
            PaceKind::Throttle => self.last_fire,
            PaceKind::Debounce => self.last_signal,
        };
        let quiet = reference.map_or(true, |t| now.saturating_sub(t) >= self.window);
        self.last_signal = Some(now);

        if quiet && self.leading {
            self.fire(now);
            return true;
        }
        if self.pending_since.is_none() {
            self.pending_since = Some(now);
        }
        false
    }

    /// Check whether a trailing firing is due.  Returns `true` at most once
    /// per pending burst.
    pub fn poll(&mut self, now: Millis) -> bool {
        match self.deadline() {
            Some(due) if now >= due => {
                self.fire(now);
                true
            }
            _ => false,
        }
    }

    /// When the pending trailing firing becomes due, if one is pending.
    pub fn deadline(&self) -> Option<Millis> {
        let since = self.pending_since?;
        let base = match self.kind {
            PaceKind::Throttle if self.leading => self.last_fire.unwrap_or(since),
            PaceKind::Throttle => since,
            PaceKind::Debounce => self.last_signal.unwrap_or(since),
        };
        Some(base.saturating_add(self.window))
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Count a firing made outside the pacer: drops any pending trailing
    /// firing and restarts the window from `now`.
    pub fn force(&mut self, now: Millis) {
        self.fire(now);
    }

    fn fire(&mut self, now: Millis) {
        self.last_fire = Some(now);
        self.pending_since = None;
    }
}
