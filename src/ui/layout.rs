//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows taken by the navigation bar (border, links, border).
pub const NAV_HEIGHT: u16 = 3;

/// Primary screen layout: page pane with the navigation bar overlaid on its
/// top rows, and a bottom status bar.
pub struct AppLayout {
    pub page_area: Rect,
    pub nav_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // page pane (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let page_area = chunks[0];
        let nav_area = Rect {
            height: NAV_HEIGHT.min(page_area.height),
            ..page_area
        };
        Self {
            page_area,
            nav_area,
            status_area: chunks[1],
        }
    }
}

/// Whether the cell at `(col, row)` lies inside `area`.
pub fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.x + area.width && row >= area.y && row < area.y + area.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_overlays_top_of_page_pane() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.page_area, Rect::new(0, 0, 80, 23));
        assert_eq!(layout.nav_area, Rect::new(0, 0, 80, NAV_HEIGHT));
        assert_eq!(layout.status_area, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn point_hit_testing_is_exclusive_at_far_edges() {
        let r = Rect::new(2, 1, 4, 2);
        assert!(point_in_rect(r, 2, 1));
        assert!(point_in_rect(r, 5, 2));
        assert!(!point_in_rect(r, 6, 1));
        assert!(!point_in_rect(r, 2, 3));
    }
}
