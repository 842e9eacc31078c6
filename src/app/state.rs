//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::Instant;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{nav::NavMenu, pacer::Millis};
use crate::ui::layout::AppLayout;
use crate::ui::nav_bar::{menu_rect, NavBarGeometry};

use super::page::Page;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Page,
    Help,
}

/// Top-level application state.
pub struct AppState {
    /// The laid-out page and its scroll-sync components.
    pub page: Page,
    /// User-configurable keybindings and scroll tuning.
    pub config: AppConfig,
    /// Collapsed navigation menu.
    pub menu: NavMenu,
    /// Keyboard focus mode: the link index currently outlined.
    pub focus: Option<usize>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Full terminal area as of the last resize, for hit testing.
    pub area: Rect,
    started: Instant,
}

impl AppState {
    pub fn new(page: Page, config: AppConfig, area: Rect) -> Self {
        Self {
            page,
            config,
            menu: NavMenu::default(),
            focus: None,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            area,
            started: Instant::now(),
        }
    }

    /// Milliseconds on the page clock.
    pub fn now(&self) -> Millis {
        self.started.elapsed().as_millis() as Millis
    }

    pub fn layout(&self) -> AppLayout {
        AppLayout::from_area(self.area)
    }

    /// Whether the bar is drawn this frame.  It stays up while the menu is
    /// open or a link has keyboard focus.
    pub fn nav_visible(&self) -> bool {
        self.page.has_navigation()
            && (!self.page.navbar_hidden() || self.menu.is_open() || self.focus.is_some())
    }

    pub fn nav_geometry(&self) -> NavBarGeometry {
        let links = self.page.nav_links();
        let labels: Vec<&str> = links.iter().map(|l| l.label.as_str()).collect();
        NavBarGeometry::compute(self.layout().nav_area, &self.page.document().title, &labels)
    }

    pub fn menu_area(&self) -> Rect {
        let links = self.page.nav_links();
        let labels: Vec<&str> = links.iter().map(|l| l.label.as_str()).collect();
        let layout = self.layout();
        menu_rect(layout.nav_area, &labels, layout.page_area)
    }
}
