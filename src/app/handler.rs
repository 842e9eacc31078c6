//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;
use crate::ui::layout::point_in_rect;
use crate::ui::nav_bar::menu_item_at;

use super::state::{ActiveView, AppState};

/// Rows moved per arrow key press.
const LINE_STEP: f64 = 1.0;
/// Rows moved per mouse wheel notch.
const WHEEL_STEP: f64 = 3.0;
/// Rows of context kept on page up/down.
const PAGE_OVERLAP: f64 = 2.0;

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Page => handle_page_key(state, key),
        ActiveView::Help => {
            // Any key dismisses the help overlay.
            state.active_view = ActiveView::Page;
        }
    }
}

// ── Page view (configurable bindings) ───────────────────────────

fn handle_page_key(state: &mut AppState, key: KeyEvent) {
    let now = state.now();

    if key.code == KeyCode::Esc {
        if state.menu.close() {
            tracing::debug!("menu closed");
        } else {
            state.focus = None;
        }
        return;
    }

    // Digits jump straight to the n-th section.
    if let KeyCode::Char(c @ '1'..='9') = key.code {
        if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            let index = (c as u8 - b'1') as usize;
            if state.page.navigate_index(index, now) {
                state.menu.close();
            }
            return;
        }
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    let page_step = (state.page.viewport() - PAGE_OVERLAP).max(1.0);
    match action {
        Action::Quit => state.should_quit = true,
        Action::ScrollUp => state.page.scroll_by(-LINE_STEP, now),
        Action::ScrollDown => state.page.scroll_by(LINE_STEP, now),
        Action::PageUp => state.page.scroll_by(-page_step, now),
        Action::PageDown => state.page.scroll_by(page_step, now),
        Action::Top => state.page.scroll_to(0.0, now),
        Action::Bottom => {
            let bottom = state.page.max_offset();
            state.page.scroll_to(bottom, now);
        }
        Action::PrevSection => {
            state.page.navigate_relative(-1, now);
        }
        Action::NextSection => {
            state.page.navigate_relative(1, now);
        }
        Action::ToggleMenu => {
            if state.page.has_navigation() {
                state.menu.toggle();
            }
        }
        Action::FocusNextLink => {
            let count = state.page.nav_links().len();
            if count > 0 {
                state.focus = Some(state.focus.map_or(0, |i| (i + 1) % count));
            }
        }
        Action::FollowLink => {
            if let Some(index) = state.focus {
                follow_link(state, index);
            }
        }
        Action::ShowHelp => {
            state.menu.close();
            state.active_view = ActiveView::Help;
        }
    }
}

/// Activate the `index`-th navigation link.  The menu closes either way.
fn follow_link(state: &mut AppState, index: usize) {
    let now = state.now();
    let links = state.page.nav_links();
    if let Some(link) = links.get(index) {
        state.page.navigate(&link.fragment(), now);
    }
    state.menu.close();
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let now = state.now();
    let (col, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(button) => {
            // Any pointer press leaves keyboard focus mode.
            state.focus = None;
            if state.active_view == ActiveView::Help {
                state.active_view = ActiveView::Page;
                return;
            }
            if button == MouseButton::Left {
                handle_left_click(state, col, row);
            }
        }
        MouseEventKind::ScrollUp => state.page.scroll_by(-WHEEL_STEP, now),
        MouseEventKind::ScrollDown => state.page.scroll_by(WHEEL_STEP, now),
        _ => {}
    }
}

fn handle_left_click(state: &mut AppState, col: u16, row: u16) {
    let geometry = state.nav_geometry();

    if state.menu.is_open() {
        let menu = state.menu_area();
        let count = state.page.nav_links().len();
        if let Some(index) = menu_item_at(menu, count, col, row) {
            follow_link(state, index);
            return;
        }
        if geometry.toggle_hit(col, row) {
            state.menu.close();
            return;
        }
        if !point_in_rect(menu, col, row) {
            state.menu.close();
            tracing::debug!(col, row, "menu closed by outside click");
        }
    }

    if !state.nav_visible() {
        return;
    }
    if let Some(index) = geometry.link_at(col, row) {
        follow_link(state, index);
    } else if geometry.toggle_hit(col, row) {
        state.menu.toggle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::page::Page;
    use crate::config::{AppConfig, ScrollSettings};
    use crate::core::document::Document;
    use ratatui::layout::Rect;

    fn state(width: u16) -> AppState {
        let mut text = String::from("# Ada\n> Analyst\n");
        for id in ["home", "about", "work"] {
            text.push_str(&format!("== {id} | {id}\n"));
            for i in 0..40 {
                text.push_str(&format!("line {i}\n"));
            }
        }
        let doc = Document::parse(&text).expect("valid page");
        let config = AppConfig {
            scroll: ScrollSettings {
                typewriter: false,
                ..ScrollSettings::default()
            },
            ..AppConfig::default()
        };
        let area = Rect::new(0, 0, width, 24);
        let layout = crate::ui::layout::AppLayout::from_area(area);
        let page = Page::init(
            doc,
            layout.page_area.width,
            layout.page_area.height as f64,
            3.0,
            &config.scroll,
            0,
        );
        AppState::new(page, config, area)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn quit_and_ctrl_c() {
        let mut s = state(80);
        handle_key(&mut s, press(KeyCode::Char('q')));
        assert!(s.should_quit);

        let mut s = state(80);
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(s.should_quit);
    }

    #[test]
    fn arrow_keys_scroll_and_cancel_animation() {
        let mut s = state(80);
        handle_key(&mut s, press(KeyCode::Down));
        assert_eq!(s.page.offset(), 1.0);

        handle_key(&mut s, press(KeyCode::Char('n')));
        assert!(s.page.is_animating());
        handle_key(&mut s, press(KeyCode::Up));
        assert!(!s.page.is_animating());
    }

    #[test]
    fn digit_jumps_to_section() {
        let mut s = state(80);
        handle_key(&mut s, press(KeyCode::Char('3')));
        assert!(s.page.is_animating());

        let mut s = state(80);
        handle_key(&mut s, press(KeyCode::Char('9')));
        assert!(!s.page.is_animating(), "no ninth section");
    }

    #[test]
    fn menu_toggles_and_escape_closes() {
        let mut s = state(80);
        handle_key(&mut s, press(KeyCode::Char('m')));
        assert!(s.menu.is_open());
        handle_key(&mut s, press(KeyCode::Esc));
        assert!(!s.menu.is_open());
    }

    #[test]
    fn tab_focus_then_enter_follows_link() {
        let mut s = state(80);
        handle_key(&mut s, press(KeyCode::Tab));
        handle_key(&mut s, press(KeyCode::Tab));
        assert_eq!(s.focus, Some(1));
        handle_key(&mut s, press(KeyCode::Enter));
        assert!(s.page.is_animating());

        s.focus = Some(2);
        handle_key(&mut s, press(KeyCode::Tab));
        assert_eq!(s.focus, Some(0), "focus wraps around");
    }

    #[test]
    fn mouse_press_leaves_focus_mode() {
        let mut s = state(80);
        handle_key(&mut s, press(KeyCode::Tab));
        handle_mouse(&mut s, click(40, 12));
        assert_eq!(s.focus, None);
    }

    #[test]
    fn clicking_a_nav_link_navigates() {
        let mut s = state(80);
        let geometry = s.nav_geometry();
        assert!(!geometry.collapsed);
        let target = geometry.links[2];
        handle_mouse(&mut s, click(target.x, target.y));
        assert!(s.page.is_animating());
    }

    #[test]
    fn outside_click_closes_menu_and_item_click_follows() {
        let mut s = state(80);
        s.menu.toggle();
        handle_mouse(&mut s, click(0, 20));
        assert!(!s.menu.is_open());

        s.menu.toggle();
        let menu = s.menu_area();
        handle_mouse(&mut s, click(menu.x + 2, menu.y + 2));
        assert!(!s.menu.is_open(), "activating a link closes the menu");
        assert!(s.page.is_animating());
    }

    #[test]
    fn narrow_terminal_uses_toggle() {
        let mut s = state(20);
        let geometry = s.nav_geometry();
        assert!(geometry.collapsed);
        let toggle = geometry.toggle.unwrap_or_default();
        handle_mouse(&mut s, click(toggle.x, toggle.y));
        assert!(s.menu.is_open());
        handle_mouse(&mut s, click(toggle.x, toggle.y));
        assert!(!s.menu.is_open());
    }

    #[test]
    fn wheel_scrolls_by_several_rows() {
        let mut s = state(80);
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 10,
            row: 10,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut s, wheel);
        assert_eq!(s.page.offset(), WHEEL_STEP);
    }

    #[test]
    fn help_opens_and_any_key_closes() {
        let mut s = state(80);
        handle_key(&mut s, press(KeyCode::Char('?')));
        assert_eq!(s.active_view, ActiveView::Help);
        handle_key(&mut s, press(KeyCode::Char('x')));
        assert_eq!(s.active_view, ActiveView::Page);
        assert!(!s.should_quit);
    }
}
