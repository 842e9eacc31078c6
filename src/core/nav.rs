//! Navigation state: link highlighting, the collapsible menu, and the
//! auto-hiding bar.

/// A link in the navigation bar pointing at a section.
#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    /// Section id this link targets (its fragment without `#`).
    pub id: String,
    pub label: String,
    active: bool,
}

impl NavLink {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn fragment(&self) -> String {
        format!("#{}", self.id)
    }
}

// ───────────────────────────────────────── highlighter ───────

/// Keeps zero or one link active, matching the current section.
#[derive(Debug, Clone, Default)]
pub struct NavHighlighter {
    links: Vec<NavLink>,
    current: Option<String>,
    /// Number of individual link flag flips performed so far.
    writes: usize,
}

impl NavHighlighter {
    pub fn new(links: Vec<NavLink>) -> Self {
        Self {
            links,
            current: None,
            writes: 0,
        }
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn active(&self) -> Option<&NavLink> {
        self.links.iter().find(|l| l.active)
    }

    /// Make the link for `current` the only active one.  Returns `true` when
    /// anything changed; repeating the same value is a no-op.
    pub fn apply(&mut self, current: Option<&str>) -> bool {
        if self.current.as_deref() == current {
            return false;
        }
        for link in &mut self.links {
            let want = current == Some(link.id.as_str());
            if link.active != want {
                link.active = want;
                self.writes += 1;
            }
        }
        self.current = current.map(str::to_owned);
        true
    }
}

// ───────────────────────────────────────── menu ──────────────

/// Open/closed state of the collapsed navigation menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Returns `true` if the menu was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

// ───────────────────────────────────────── auto-hide ─────────

/// Hides the bar while scrolling down past a threshold; any upward scroll
/// brings it back.
#[derive(Debug, Clone)]
pub struct NavBarAutoHide {
    hide_after: f64,
    last_offset: f64,
    hidden: bool,
}

impl NavBarAutoHide {
    pub fn new(hide_after: f64) -> Self {
        Self {
            hide_after,
            last_offset: 0.0,
            hidden: false,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Feed a new offset.  An unchanged offset keeps the current state.
    pub fn observe(&mut self, offset: f64) -> bool {
        if offset > self.last_offset && offset > self.hide_after {
            self.hidden = true;
        } else if offset < self.last_offset || offset <= self.hide_after {
            self.hidden = false;
        }
        self.last_offset = offset;
        self.hidden
    }
}

#[cfg(test)]
impl NavHighlighter {
    pub fn active_count(&self) -> usize {
        self.links.iter().filter(|l| l.active).count()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}
