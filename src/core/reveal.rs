//! Staggered, one-shot content reveals driven by viewport intersection.
//!
//! Targets start hidden once observed.  The first time a target intersects
//! the (margin-adjusted) viewport by at least the threshold fraction, it is
//! latched as revealed and given a delay proportional to its position in the
//! batch of targets from the same group that entered together.

use std::collections::HashMap;

use super::pacer::Millis;

pub const DEFAULT_THRESHOLD: f64 = 0.1;
pub const DEFAULT_STAGGER_MS: Millis = 50;

/// Observation options, in the spirit of an intersection observer's
/// `threshold` and `rootMargin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionConfig {
    /// Minimum visible fraction of the target, `0.0..=1.0`.
    pub threshold: f64,
    /// Added to the viewport's bottom edge.  Negative values shrink the
    /// observed area so triggers fire before the target reaches the fold.
    pub bottom_margin: f64,
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            bottom_margin: 0.0,
        }
    }
}

impl IntersectionConfig {
    /// Does a target at `[top, top + height)` count as intersecting a
    /// viewport at `[offset, offset + viewport)`?
    ///
    /// A target taller than the observed area counts once it fills it, so
    /// tall content is never stuck below the threshold.
    pub fn intersects(&self, top: f64, height: f64, offset: f64, viewport: f64) -> bool {
        let root_top = offset;
        let root_bottom = offset + (viewport + self.bottom_margin).max(0.0);
        let visible = (top + height).min(root_bottom) - top.max(root_top);
        if visible <= 0.0 || height <= 0.0 {
            return false;
        }
        let ratio = visible / height;
        ratio >= self.threshold || visible >= root_bottom - root_top
    }
}

/// Lifecycle of one target.  `Revealed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Unobserved,
    Observing,
    Revealed { visible_at: Millis },
}

#[derive(Debug, Clone)]
pub struct RevealTarget {
    pub id: String,
    /// Stagger counters are scoped to this group.
    pub group: String,
    pub top: f64,
    pub height: f64,
    state: RevealState,
}

impl RevealTarget {
    pub fn state(&self) -> RevealState {
        self.state
    }
}

/// Emitted once per target when it first intersects.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealEvent {
    pub id: String,
    pub group: String,
    /// Position within this group's batch.
    pub index: usize,
    pub delay: Millis,
    pub visible_at: Millis,
}

pub struct RevealScheduler {
    config: IntersectionConfig,
    stagger: Millis,
    /// `false` when intersection checks are unavailable; everything then
    /// stays in its default visible state.
    enabled: bool,
    targets: Vec<RevealTarget>,
}

impl RevealScheduler {
    pub fn new(config: IntersectionConfig, stagger: Millis) -> Self {
        Self {
            config,
            stagger,
            enabled: true,
            targets: Vec::new(),
        }
    }

    /// A scheduler that observes nothing and reveals nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(IntersectionConfig::default(), 0)
        }
    }

    pub fn targets(&self) -> &[RevealTarget] {
        &self.targets
    }

    /// Register a target and start observing it.
    pub fn observe(&mut self, id: impl Into<String>, group: impl Into<String>, top: f64, height: f64) {
        if !self.enabled {
            return;
        }
        self.targets.push(RevealTarget {
            id: id.into(),
            group: group.into(),
            top,
            height,
            state: RevealState::Observing,
        });
    }

    /// Refresh a target's geometry after a reflow.  Unknown ids are ignored.
    pub fn update_geometry(&mut self, id: &str, top: f64, height: f64) {
        if let Some(t) = self.targets.iter_mut().find(|t| t.id == id) {
            t.top = top;
            t.height = height;
        }
    }

    pub fn state(&self, id: &str) -> RevealState {
        self.targets
            .iter()
            .find(|t| t.id == id)
            .map_or(RevealState::Unobserved, |t| t.state)
    }

    /// Whether `id` should be drawn at `now`.  Unobserved content is visible.
    pub fn is_visible(&self, id: &str, now: Millis) -> bool {
        match self.state(id) {
            RevealState::Unobserved => true,
            RevealState::Observing => false,
            RevealState::Revealed { visible_at } => now >= visible_at,
        }
    }

    /// Run one intersection pass against the viewport.  Newly intersecting
    /// targets are latched and returned in document order.
    pub fn check(&mut self, offset: f64, viewport: f64, now: Millis) -> Vec<RevealEvent> {
        if !self.enabled {
            return Vec::new();
        }
        let mut batch: HashMap<String, usize> = HashMap::new();
        let mut events = Vec::new();

        for target in &mut self.targets {
            if target.state != RevealState::Observing {
                continue;
            }
            if !self
                .config
                .intersects(target.top, target.height, offset, viewport)
            {
                continue;
            }
            let counter = batch.entry(target.group.clone()).or_insert(0);
            let index = *counter;
            *counter += 1;

            let delay = self.stagger.saturating_mul(index as Millis);
            let visible_at = now.saturating_add(delay);
            target.state = RevealState::Revealed { visible_at };
            events.push(RevealEvent {
                id: target.id.clone(),
                group: target.group.clone(),
                index,
                delay,
                visible_at,
            });
        }

        if !events.is_empty() {
            tracing::debug!(count = events.len(), offset, "reveal batch");
        }
        events
    }
}

#[cfg(test)]
impl RevealScheduler {
    pub fn observing_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| t.state == RevealState::Observing)
            .count()
    }
}
