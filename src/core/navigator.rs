//! Smooth scroll navigation with ease-in-out-cubic timing.
//!
//! A navigation request resolves a fragment to an element top, compensates
//! for the navigation bar, and starts a [`ScrollAnimation`].  The animation
//! is stepped once per frame by the caller; starting a new one replaces the
//! old, so only the most recent request ever writes the offset.

use super::pacer::Millis;

/// Default animation length.
pub const DEFAULT_DURATION_MS: Millis = 900;

/// `4t³` on the first half, mirrored on the second.  `t` is clamped to `[0, 1]`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Scroll offset that puts `element_top` just below the navigation bar.
/// Never negative.
pub fn target_offset(element_top: f64, nav_height: f64, padding: f64) -> f64 {
    (element_top - nav_height - padding).max(0.0)
}

/// An in-flight smooth scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub from: f64,
    pub to: f64,
    pub start: Millis,
    pub duration: Millis,
}

impl ScrollAnimation {
    pub fn new(from: f64, to: f64, start: Millis, duration: Millis) -> Self {
        Self {
            from,
            to,
            start,
            duration: duration.max(1),
        }
    }

    /// Elapsed fraction in `[0, 1]`.
    pub fn progress(&self, now: Millis) -> f64 {
        let elapsed = now.saturating_sub(self.start);
        (elapsed as f64 / self.duration as f64).min(1.0)
    }

    pub fn sample(&self, now: Millis) -> f64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * ease_in_out_cubic(t)
    }

    pub fn is_done(&self, now: Millis) -> bool {
        now.saturating_sub(self.start) >= self.duration
    }
}

/// Owns the (single) active animation.
#[derive(Debug, Clone)]
pub struct SmoothScrollNavigator {
    duration: Millis,
    padding: f64,
    active: Option<ScrollAnimation>,
}

impl SmoothScrollNavigator {
    pub fn new(duration: Millis, padding: f64) -> Self {
        Self {
            duration,
            padding,
            active: None,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Start an animation from `from` to `to`, superseding any in flight.
    pub fn start(&mut self, from: f64, to: f64, now: Millis) -> ScrollAnimation {
        if let Some(prev) = self.active.take() {
            tracing::debug!(prev_to = prev.to, new_to = to, "superseding scroll animation");
        }
        let anim = ScrollAnimation::new(from, to, now, self.duration);
        self.active = Some(anim);
        anim
    }

    /// Navigate to `fragment` (`"#about"` or `"about"`).
    ///
    /// `resolve` maps an element id to its document-relative top and
    /// `max_offset` is the largest scrollable offset.  An unresolved fragment
    /// is ignored and returns `None`.
    pub fn navigate(
        &mut self,
        fragment: &str,
        resolve: impl Fn(&str) -> Option<f64>,
        current: f64,
        nav_height: f64,
        max_offset: f64,
        now: Millis,
    ) -> Option<ScrollAnimation> {
        let id = fragment.strip_prefix('#').unwrap_or(fragment);
        if id.is_empty() {
            return None;
        }
        let Some(top) = resolve(id) else {
            tracing::debug!(fragment, "navigation target not found");
            return None;
        };
        let to = target_offset(top, nav_height, self.padding).min(max_offset.max(0.0));
        tracing::debug!(fragment, from = current, to, "smooth scroll");
        Some(self.start(current, to, now))
    }

    /// Advance one frame.  Returns the offset to write, or `None` when idle.
    /// The final frame lands exactly on the target and ends the animation.
    pub fn frame(&mut self, now: Millis) -> Option<f64> {
        let anim = self.active?;
        let offset = anim.sample(now);
        if anim.is_done(now) {
            self.active = None;
        }
        Some(offset)
    }

    /// A user scroll gesture takes over the viewport.  Returns `true` if an
    /// animation was cancelled.
    pub fn interrupt(&mut self) -> bool {
        self.active.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-12);
        assert!((ease_in_out_cubic(0.25) - 0.0625).abs() < 1e-12);
        assert!((ease_in_out_cubic(0.75) - 0.9375).abs() < 1e-12);
    }

    #[test]
    fn target_offset_compensates_for_nav_and_floors_at_zero() {
        assert_eq!(target_offset(800.0, 70.0, 20.0), 710.0);
        assert_eq!(target_offset(50.0, 70.0, 20.0), 0.0);
    }

    #[test]
    fn animation_hits_endpoints_and_never_overshoots() {
        let anim = ScrollAnimation::new(1000.0, 0.0, 0, 900);
        assert_eq!(anim.sample(0), 1000.0);
        assert!(anim.sample(900).abs() < 1e-9);

        let mut prev = anim.sample(0);
        for t in (0..=900).step_by(5) {
            let cur = anim.sample(t);
            assert!(cur <= prev, "t={t}: {cur} > {prev}");
            assert!((0.0..=1000.0).contains(&cur));
            prev = cur;
        }
        assert_eq!(anim.sample(5000), 0.0);
    }

    #[test]
    fn frames_run_to_completion_then_go_idle() {
        let mut nav = SmoothScrollNavigator::new(100, 20.0);
        nav.start(0.0, 500.0, 1000);
        assert_eq!(nav.frame(1000), Some(0.0));
        let mid = nav.frame(1050).unwrap_or_default();
        assert!((mid - 250.0).abs() < 1e-9);
        assert_eq!(nav.frame(1100), Some(500.0));
        assert!(!nav.is_animating());
        assert_eq!(nav.frame(1116), None);
    }

    #[test]
    fn new_request_supersedes_in_flight_animation() {
        let mut nav = SmoothScrollNavigator::new(900, 20.0);
        nav.start(0.0, 2000.0, 0);
        let here = nav.frame(300).unwrap_or_default();
        nav.start(here, 100.0, 300);

        // Only the newest target is ever approached from here on.
        let mut last = here;
        for t in (316..=1216).step_by(16) {
            if let Some(off) = nav.frame(t) {
                assert!(off <= last + 1e-9);
                last = off;
            }
        }
        assert!((last - 100.0).abs() < 1e-9);
    }

    #[test]
    fn unresolved_fragment_is_a_no_op() {
        let mut nav = SmoothScrollNavigator::new(900, 20.0);
        let resolve = |id: &str| (id == "about").then_some(800.0);
        assert!(nav.navigate("#missing", resolve, 0.0, 70.0, 5000.0, 0).is_none());
        assert!(nav.navigate("#", resolve, 0.0, 70.0, 5000.0, 0).is_none());
        assert!(!nav.is_animating());

        let anim = nav.navigate("#about", resolve, 0.0, 70.0, 5000.0, 0);
        assert_eq!(anim.map(|a| a.to), Some(710.0));
    }

    #[test]
    fn target_is_clamped_to_scrollable_range() {
        let mut nav = SmoothScrollNavigator::new(900, 20.0);
        let anim = nav.navigate("end", |_| Some(3000.0), 0.0, 70.0, 1200.0, 0);
        assert_eq!(anim.map(|a| a.to), Some(1200.0));
    }

    #[test]
    fn user_gesture_interrupts() {
        let mut nav = SmoothScrollNavigator::new(900, 20.0);
        nav.start(0.0, 500.0, 0);
        assert!(nav.interrupt());
        assert!(!nav.interrupt());
        assert_eq!(nav.frame(100), None);
    }
}
