//! Page controller: owns the viewport offset and wires the scroll-sync
//! components together.
//!
//! [`Page::init`] is the single entry point, called once the document has
//! been parsed and the terminal size is known.  Each component initializes
//! independently: a page without sections gets no highlighter or navigator,
//! and a disabled reveal scheduler simply leaves every heading and card
//! visible.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ScrollSettings;
use crate::core::{
    document::Document,
    effects::{Parallax, Typewriter, PARALLAX_RATE},
    flow::{PageLayout, HEADING_GROUP},
    nav::{NavBarAutoHide, NavHighlighter, NavLink},
    navigator::SmoothScrollNavigator,
    pacer::{Millis, Pacer},
    reveal::{IntersectionConfig, RevealScheduler, RevealState},
    sections::{Section, SectionRegistry},
    tracker::{ScrollTick, ScrollTracker, Subscription},
};

/// Resize events are folded together for this long before re-laying out.
const REFLOW_DEBOUNCE_MS: Millis = 250;

/// Locator + highlighter state behind one tracker subscription.
struct Highlight {
    registry: SectionRegistry,
    highlighter: NavHighlighter,
    bias: f64,
    /// `false` while the registry fails validation; highlighting is cleared.
    valid: bool,
}

impl Highlight {
    fn new(registry: SectionRegistry, links: Vec<NavLink>, bias: f64) -> Self {
        let mut h = Self {
            registry,
            highlighter: NavHighlighter::new(links),
            bias,
            valid: true,
        };
        h.revalidate();
        h
    }

    /// Swap in reflowed geometry.
    fn replace_sections(&mut self, sections: Vec<Section>) {
        self.registry.replace(sections);
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.valid = match self.registry.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("section layout rejected, highlighting disabled: {e}");
                false
            }
        };
    }

    fn on_tick(&mut self, tick: ScrollTick) {
        let Highlight {
            registry,
            highlighter,
            bias,
            valid,
        } = self;
        let current = if *valid {
            registry.locate(tick.offset, *bias).map(|s| s.id.as_str())
        } else {
            None
        };
        if highlighter.apply(current) {
            tracing::debug!(section = ?current, offset = tick.offset, "active section");
        }
    }
}

pub struct Page {
    document: Document,
    layout: PageLayout,
    settings: ScrollSettings,
    offset: f64,
    viewport: f64,
    nav_height: f64,
    tracker: ScrollTracker,
    highlight: Option<Rc<RefCell<Highlight>>>,
    navigator: Option<SmoothScrollNavigator>,
    reveal: Rc<RefCell<RevealScheduler>>,
    navbar: Rc<RefCell<NavBarAutoHide>>,
    reflow: Pacer,
    pending_width: Option<u16>,
    typewriter: Option<Typewriter>,
    parallax: Parallax,
    subscriptions: Vec<Subscription>,
}

impl Page {
    /// Lay out `document` at `width` and wire every component.  The page is
    /// padded by `nav_height` rows at the top so the hero starts below the
    /// navigation bar.
    pub fn init(
        document: Document,
        width: u16,
        viewport: f64,
        nav_height: f64,
        settings: &ScrollSettings,
        now: Millis,
    ) -> Self {
        let layout = PageLayout::compute(&document, width, top_inset(nav_height));
        let mut tracker = ScrollTracker::new(settings.throttle_ms);
        let mut subscriptions = Vec::new();

        // ── locator + highlighter, navigator ──────────────────
        let (highlight, navigator) = if document.sections.is_empty() {
            tracing::debug!("page has no sections; navigation disabled");
            (None, None)
        } else {
            let links = document
                .sections
                .iter()
                .map(|s| NavLink::new(s.id.clone(), s.label.clone()))
                .collect();
            let registry = SectionRegistry::new(layout.sections.clone());
            let highlight = Rc::new(RefCell::new(Highlight::new(
                registry,
                links,
                settings.section_bias,
            )));
            let sink = Rc::clone(&highlight);
            subscriptions.push(tracker.subscribe(move |tick| sink.borrow_mut().on_tick(tick)));
            let navigator =
                SmoothScrollNavigator::new(settings.scroll_duration_ms, settings.nav_padding);
            (Some(highlight), Some(navigator))
        };

        // ── reveal scheduler ──────────────────────────────────
        let reveal = if settings.reveal {
            let mut scheduler = RevealScheduler::new(
                IntersectionConfig {
                    threshold: settings.reveal_threshold,
                    bottom_margin: settings.reveal_margin,
                },
                settings.stagger_ms,
            );
            for heading in &layout.headings {
                scheduler.observe(heading.id.clone(), HEADING_GROUP, heading.row as f64, 1.0);
            }
            for card in &layout.cards {
                scheduler.observe(
                    card.id.clone(),
                    card.group.clone(),
                    card.top as f64,
                    card.height as f64,
                );
            }
            scheduler
        } else {
            tracing::debug!("reveal disabled; content renders immediately");
            RevealScheduler::disabled()
        };
        let reveal = Rc::new(RefCell::new(reveal));
        let sink = Rc::clone(&reveal);
        subscriptions.push(tracker.subscribe(move |tick| {
            sink.borrow_mut().check(tick.offset, tick.viewport, tick.at);
        }));

        // ── navigation bar auto-hide ──────────────────────────
        let navbar = Rc::new(RefCell::new(NavBarAutoHide::new(settings.hide_after)));
        let sink = Rc::clone(&navbar);
        subscriptions.push(tracker.subscribe(move |tick| {
            sink.borrow_mut().observe(tick.offset);
        }));

        let typewriter = document
            .subtitle
            .as_deref()
            .filter(|_| settings.typewriter)
            .map(|s| Typewriter::new(s, now));

        let mut page = Self {
            document,
            layout,
            settings: settings.clone(),
            offset: 0.0,
            viewport,
            nav_height,
            tracker,
            highlight,
            navigator,
            reveal,
            navbar,
            reflow: Pacer::debounce(REFLOW_DEBOUNCE_MS),
            pending_width: None,
            typewriter,
            parallax: Parallax::new(PARALLAX_RATE),
            subscriptions,
        };
        page.tracker.notify_now(page.offset, viewport, now);
        page
    }

    // ── accessors ───────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn viewport(&self) -> f64 {
        self.viewport
    }

    pub fn max_offset(&self) -> f64 {
        self.layout.max_offset(self.viewport)
    }

    pub fn has_navigation(&self) -> bool {
        self.highlight.is_some()
    }

    pub fn nav_links(&self) -> Vec<NavLink> {
        self.highlight
            .as_ref()
            .map(|h| h.borrow().highlighter.links().to_vec())
            .unwrap_or_default()
    }

    pub fn current_section(&self) -> Option<String> {
        let h = self.highlight.as_ref()?.borrow();
        h.highlighter.current().map(str::to_owned)
    }

    /// Label of the highlighted navigation link.
    pub fn current_label(&self) -> Option<String> {
        let h = self.highlight.as_ref()?.borrow();
        h.highlighter.active().map(|l| l.label.clone())
    }

    pub fn is_animating(&self) -> bool {
        self.navigator.as_ref().is_some_and(|n| n.is_animating())
    }

    pub fn navbar_hidden(&self) -> bool {
        self.navbar.borrow().is_hidden()
    }

    pub fn is_card_visible(&self, card: usize, now: Millis) -> bool {
        let Some(card) = self.layout.cards.get(card) else {
            return true;
        };
        self.reveal.borrow().is_visible(&card.id, now)
    }

    pub fn is_heading_visible(&self, heading: usize, now: Millis) -> bool {
        let Some(heading) = self.layout.headings.get(heading) else {
            return true;
        };
        self.reveal.borrow().is_visible(&heading.id, now)
    }

    /// Subtitle text at `now` and whether the typing cursor is shown.
    pub fn subtitle(&self, now: Millis) -> Option<(String, bool)> {
        let full = self.document.subtitle.as_ref()?;
        Some(match &self.typewriter {
            Some(tw) => (tw.text(now), tw.cursor_visible(now)),
            None => (full.clone(), false),
        })
    }

    /// Row shift for hero content.
    pub fn hero_shift(&self) -> i32 {
        self.parallax.shift().round() as i32
    }

    /// Whether something time-based is still changing on screen.
    pub fn needs_frames(&self, now: Millis) -> bool {
        self.is_animating()
            || self.tracker.is_pending()
            || self.reflow.is_pending()
            || self.typewriter.as_ref().is_some_and(|t| t.cursor_visible(now))
            || self.reveal_pending(now)
    }

    fn reveal_pending(&self, now: Millis) -> bool {
        self.reveal.borrow().targets().iter().any(|t| {
            matches!(t.state(), RevealState::Revealed { visible_at } if visible_at > now)
        })
    }

    // ── environment input ───────────────────────────────────────

    /// One display frame: apply pending reflow, step the animation, and
    /// flush throttled scroll ticks.
    pub fn frame(&mut self, now: Millis) {
        if self.reflow.poll(now) {
            if let Some(width) = self.pending_width.take() {
                self.relayout(width, now);
            }
        }
        if let Some(offset) = self.navigator.as_mut().and_then(|n| n.frame(now)) {
            self.write_offset(offset, now);
        }
        self.tracker.poll(now);
    }

    /// User scroll gesture.  Overrides any in-flight animation.
    pub fn scroll_by(&mut self, delta: f64, now: Millis) {
        if self.navigator.as_mut().is_some_and(|n| n.interrupt()) {
            tracing::debug!("smooth scroll interrupted by user");
        }
        self.write_offset(self.offset + delta, now);
    }

    /// Animate to an absolute offset (top/bottom of page).  Without a
    /// navigator the jump is immediate.
    pub fn scroll_to(&mut self, offset: f64, now: Millis) {
        let to = offset.clamp(0.0, self.max_offset());
        match self.navigator.as_mut() {
            Some(nav) => {
                nav.start(self.offset, to, now);
            }
            None => self.write_offset(to, now),
        }
    }

    /// Smooth-scroll to an in-page fragment.  Unknown fragments are ignored.
    pub fn navigate(&mut self, fragment: &str, now: Millis) -> bool {
        let max_offset = self.max_offset();
        let Some(nav) = self.navigator.as_mut() else {
            return false;
        };
        let layout = &self.layout;
        nav.navigate(
            fragment,
            |id| layout.anchor_top(id),
            self.offset,
            self.nav_height,
            max_offset,
            now,
        )
        .is_some()
    }

    /// Navigate to the section `step` positions away from the current one.
    pub fn navigate_relative(&mut self, step: isize, now: Millis) -> bool {
        let sections = &self.layout.sections;
        if sections.is_empty() {
            return false;
        }
        let current = self.current_section();
        let index = match current.and_then(|id| sections.iter().position(|s| s.id == id)) {
            Some(i) => i as isize + step,
            None => {
                let pos = self.offset + self.settings.section_bias;
                if step > 0 {
                    sections.iter().position(|s| s.start > pos).unwrap_or(sections.len()) as isize
                } else {
                    sections.iter().rposition(|s| s.end() <= pos).map_or(-1, |i| i as isize)
                }
            }
        };
        if index < 0 || index as usize >= sections.len() {
            return false;
        }
        let id = sections[index as usize].id.clone();
        self.navigate(&id, now)
    }

    /// Navigate to the `n`-th section (0-based).
    pub fn navigate_index(&mut self, n: usize, now: Millis) -> bool {
        let Some(id) = self.layout.sections.get(n).map(|s| s.id.clone()) else {
            return false;
        };
        self.navigate(&id, now)
    }

    /// Terminal resized.  Height applies immediately; a width change
    /// re-lays out the page once resizing settles.
    pub fn resize(&mut self, width: u16, viewport: f64, now: Millis) {
        self.viewport = viewport;
        if width != self.layout.width {
            self.pending_width = Some(width);
            self.reflow.signal(now);
        }
        self.write_offset(self.offset, now);
    }

    fn relayout(&mut self, width: u16, now: Millis) {
        // Keep the reader anchored to the same section across the reflow.
        let anchor = self.current_section();
        let old_start = anchor
            .as_deref()
            .and_then(|id| self.layout.anchor_top(id))
            .unwrap_or(0.0);
        let within = self.offset - old_start;

        self.layout = PageLayout::compute(&self.document, width, top_inset(self.nav_height));
        tracing::debug!(width, rows = self.layout.lines.len(), "reflow");

        if let Some(h) = &self.highlight {
            h.borrow_mut()
                .replace_sections(self.layout.sections.clone());
        }
        {
            let mut reveal = self.reveal.borrow_mut();
            for heading in &self.layout.headings {
                reveal.update_geometry(&heading.id, heading.row as f64, 1.0);
            }
            for card in &self.layout.cards {
                reveal.update_geometry(&card.id, card.top as f64, card.height as f64);
            }
        }

        let new_offset = match anchor.as_deref().and_then(|id| self.layout.anchor_top(id)) {
            Some(start) if within >= 0.0 => start + within,
            _ => self.offset,
        };
        self.offset = new_offset.clamp(0.0, self.max_offset());
        self.parallax.update(self.offset, self.viewport);
        self.tracker.notify_now(self.offset, self.viewport, now);
    }

    fn write_offset(&mut self, offset: f64, now: Millis) {
        self.offset = offset.clamp(0.0, self.max_offset());
        self.parallax.update(self.offset, self.viewport);
        self.tracker.record(self.offset, self.viewport, now);
    }

    /// Detach every component from the tracker.
    pub fn teardown(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
    }
}

/// Blank rows reserved above the hero for a bar `nav_height` rows tall.
fn top_inset(nav_height: f64) -> usize {
    nav_height.max(0.0).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ScrollSettings {
        ScrollSettings {
            typewriter: false,
            ..ScrollSettings::default()
        }
    }

    fn doc() -> Document {
        let mut text = String::from("# Ada\n> Analyst\n");
        for id in ["home", "about", "work", "contact"] {
            text.push_str(&format!("== {id} | {id}\n"));
            for i in 0..30 {
                text.push_str(&format!("line {i} of {id}\n"));
            }
            text.push_str("-- cards | One\nbody\n-- cards | Two\nbody\n");
        }
        Document::parse(&text).expect("valid page")
    }

    /// Run frames every 16ms until idle or `until`.
    fn run(page: &mut Page, from: Millis, until: Millis) -> Millis {
        let mut now = from;
        while now < until {
            now += 16;
            page.frame(now);
        }
        now
    }

    #[test]
    fn scroll_scenario_moves_highlight_from_home_to_about() {
        let mut tracker = ScrollTracker::new(10);
        let highlight = Rc::new(RefCell::new(Highlight::new(
            SectionRegistry::new(vec![
                Section::new("home", 0.0, 500.0),
                Section::new("about", 500.0, 400.0),
            ]),
            vec![NavLink::new("home", "Home"), NavLink::new("about", "About")],
            150.0,
        )));
        let sink = Rc::clone(&highlight);
        let _sub = tracker.subscribe(move |tick| sink.borrow_mut().on_tick(tick));

        tracker.record(0.0, 800.0, 0);
        assert_eq!(highlight.borrow().highlighter.current(), Some("home"));

        tracker.record(600.0, 800.0, 100);
        let h = highlight.borrow();
        assert_eq!(h.highlighter.current(), Some("about"));
        assert!(!h.highlighter.links()[0].is_active());
        assert!(h.highlighter.links()[1].is_active());
        assert_eq!(h.highlighter.active_count(), 1);
    }

    #[test]
    fn overlapping_layout_disables_highlighting() {
        let mut h = Highlight::new(
            SectionRegistry::new(vec![
                Section::new("a", 0.0, 300.0),
                Section::new("b", 100.0, 300.0),
            ]),
            vec![NavLink::new("a", "A"), NavLink::new("b", "B")],
            0.0,
        );
        h.on_tick(ScrollTick {
            offset: 150.0,
            viewport: 100.0,
            at: 0,
        });
        assert_eq!(h.highlighter.active_count(), 0);
    }

    #[test]
    fn init_highlights_first_section() {
        let page = Page::init(doc(), 80, 20.0, 3.0, &settings(), 0);
        assert!(page.has_navigation());
        assert_eq!(page.current_section().as_deref(), Some("home"));
        assert_eq!(page.nav_links().iter().filter(|l| l.is_active()).count(), 1);
    }

    #[test]
    fn navigation_animates_to_compensated_target() {
        let s = settings();
        let mut page = Page::init(doc(), 80, 20.0, 3.0, &s, 0);
        assert!(page.navigate("#work", 0));
        assert!(page.is_animating());

        let end = run(&mut page, 0, s.scroll_duration_ms + 50);
        assert!(!page.is_animating());
        let top = page.layout().anchor_top("work").unwrap_or_default();
        assert_eq!(page.offset(), top - 3.0 - s.nav_padding);

        run(&mut page, end, end + 50);
        assert_eq!(page.current_section().as_deref(), Some("work"));
    }

    #[test]
    fn missing_fragment_is_ignored() {
        let mut page = Page::init(doc(), 80, 20.0, 3.0, &settings(), 0);
        assert!(!page.navigate("#nowhere", 0));
        assert!(!page.is_animating());
        assert_eq!(page.offset(), 0.0);
    }

    #[test]
    fn user_scroll_overrides_animation() {
        let mut page = Page::init(doc(), 80, 20.0, 3.0, &settings(), 0);
        page.navigate("#contact", 0);
        run(&mut page, 0, 200);
        let mid = page.offset();
        page.scroll_by(-1.0, 210);
        assert!(!page.is_animating());
        run(&mut page, 210, 2000);
        assert_eq!(page.offset(), (mid - 1.0).max(0.0));
    }

    #[test]
    fn relative_navigation_steps_through_sections() {
        let s = settings();
        let mut page = Page::init(doc(), 80, 20.0, 3.0, &s, 0);
        assert!(page.navigate_relative(1, 0));
        run(&mut page, 0, 1000);
        assert_eq!(page.current_section().as_deref(), Some("about"));
        assert!(page.navigate_relative(-1, 1000));
        run(&mut page, 1000, 2000);
        assert_eq!(page.current_section().as_deref(), Some("home"));
        assert!(!page.navigate_relative(-1, 2000), "nothing before the first section");
    }

    #[test]
    fn cards_reveal_once_in_view() {
        let mut page = Page::init(doc(), 80, 20.0, 3.0, &settings(), 0);
        let last = page.layout().cards.len() - 1;
        assert!(!page.is_card_visible(last, 0));

        page.scroll_by(page.max_offset(), 100);
        run(&mut page, 100, 500);
        assert!(page.is_card_visible(last, 500));

        page.scroll_by(-page.max_offset(), 600);
        run(&mut page, 600, 700);
        assert!(page.is_card_visible(last, 700), "reveal is a one-way latch");
    }

    #[test]
    fn reveal_disabled_shows_everything() {
        let s = ScrollSettings {
            reveal: false,
            ..settings()
        };
        let page = Page::init(doc(), 80, 20.0, 3.0, &s, 0);
        let last = page.layout().cards.len() - 1;
        assert!(page.is_card_visible(last, 0));
    }

    #[test]
    fn page_without_sections_skips_navigation_only() {
        let doc = Document::parse("# Just a title\n> and a subtitle\n").expect("valid page");
        let mut page = Page::init(doc, 80, 20.0, 3.0, &settings(), 0);
        assert!(!page.has_navigation());
        assert!(page.nav_links().is_empty());
        assert!(!page.navigate("#anything", 0));
        assert!(!page.navigate_relative(1, 0));
        assert_eq!(page.subtitle(0).map(|(s, _)| s), Some("and a subtitle".to_string()));
    }

    #[test]
    fn width_change_reflows_after_debounce() {
        let mut page = Page::init(doc(), 80, 20.0, 3.0, &settings(), 0);
        page.resize(30, 20.0, 0);
        page.resize(20, 20.0, 100);
        assert_eq!(page.layout().width, 80);
        page.frame(200);
        assert_eq!(page.layout().width, 80, "still resizing");
        page.frame(350);
        assert_eq!(page.layout().width, 20);
        assert_eq!(page.current_section().as_deref(), Some("home"));
    }

    #[test]
    fn reflow_swaps_geometry_into_the_registry() {
        let mut page = Page::init(doc(), 80, 20.0, 3.0, &settings(), 0);
        page.resize(20, 20.0, 0);
        page.frame(300);
        let highlight = page.highlight.as_ref().map(Rc::clone).expect("has sections");
        let h = highlight.borrow();
        assert_eq!(h.registry.sections(), page.layout().sections.as_slice());
        assert!(h.valid);
    }

    #[test]
    fn forced_ticks_reach_each_listener_once() {
        let mut page = Page::init(doc(), 80, 20.0, 3.0, &settings(), 0);
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        let _sub = page.tracker.subscribe(move |_| *sink.borrow_mut() += 1);

        page.relayout(60, 1000);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn hero_sits_below_the_bar_and_top_belongs_to_first_section() {
        let page = Page::init(doc(), 80, 20.0, 3.0, &settings(), 0);
        let layout = page.layout();
        assert_eq!(layout.hero_rows, 7);
        assert_eq!(layout.lines[4].text, "Ada");
        assert_eq!(layout.sections[0].start, 0.0);
        assert_eq!(page.current_label().as_deref(), Some("home"));
    }

    #[test]
    fn headings_reveal_as_they_scroll_in() {
        let mut page = Page::init(doc(), 80, 20.0, 3.0, &settings(), 0);
        assert!(page.is_heading_visible(0, 0));
        assert!(!page.is_heading_visible(3, 0));

        let row = page.layout().headings[3].row as f64;
        page.scroll_by(row - 5.0, 100);
        assert!(page.is_heading_visible(3, 100));
    }

    #[test]
    fn parallax_holds_once_past_the_first_screen() {
        let mut page = Page::init(doc(), 80, 20.0, 3.0, &settings(), 0);
        page.scroll_by(10.0, 100);
        assert_eq!(page.hero_shift(), -2);
        page.scroll_by(50.0, 200);
        assert_eq!(page.hero_shift(), -2);
        page.scroll_by(-55.0, 300);
        assert_eq!(page.hero_shift(), -1);
    }

    #[test]
    fn teardown_detaches_listeners() {
        let mut page = Page::init(doc(), 80, 20.0, 3.0, &settings(), 0);
        page.teardown();
        page.scroll_by(500.0, 100);
        run(&mut page, 100, 200);
        assert_eq!(page.current_section().as_deref(), Some("home"));
    }
}
