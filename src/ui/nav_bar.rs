//! Navigation bar and collapsible menu widgets.
//!
//! Geometry is computed separately from rendering so mouse handling can hit
//! test against exactly what was drawn.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::core::nav::NavLink;

use super::theme::Theme;

const TOGGLE_LABEL: &str = " ☰ ";
const LINK_GAP: u16 = 1;
const MENU_MIN_WIDTH: u16 = 16;

fn text_width(s: &str) -> u16 {
    s.chars().count() as u16
}

// ───────────────────────────────────────── geometry ──────────

/// Where each link (or the menu toggle) landed in the bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavBarGeometry {
    /// `true` when the links do not fit and only the toggle is shown.
    pub collapsed: bool,
    /// One rect per link, in link order.  Empty when collapsed.
    pub links: Vec<Rect>,
    pub toggle: Option<Rect>,
}

impl NavBarGeometry {
    pub fn compute(area: Rect, title: &str, labels: &[&str]) -> Self {
        if area.height < 3 || area.width < 4 || labels.is_empty() {
            return Self::default();
        }
        let row = area.y + 1;
        let right = area.x + area.width - 2;
        let title_end = area.x + 2 + text_width(title);

        let needed: u16 = labels
            .iter()
            .map(|l| text_width(l) + 2 + LINK_GAP)
            .sum::<u16>()
            .saturating_sub(LINK_GAP);

        if title_end + 2 + needed <= right {
            let mut x = right - needed;
            let links = labels
                .iter()
                .map(|l| {
                    let w = text_width(l) + 2;
                    let rect = Rect::new(x, row, w, 1);
                    x += w + LINK_GAP;
                    rect
                })
                .collect();
            Self {
                collapsed: false,
                links,
                toggle: None,
            }
        } else {
            let w = text_width(TOGGLE_LABEL);
            Self {
                collapsed: true,
                links: Vec::new(),
                toggle: Some(Rect::new(right.saturating_sub(w), row, w, 1)),
            }
        }
    }

    pub fn link_at(&self, col: u16, row: u16) -> Option<usize> {
        self.links
            .iter()
            .position(|r| super::layout::point_in_rect(*r, col, row))
    }

    pub fn toggle_hit(&self, col: u16, row: u16) -> bool {
        self.toggle
            .is_some_and(|r| super::layout::point_in_rect(r, col, row))
    }
}

/// Dropdown rectangle for the open menu, hanging below the bar's right edge.
pub fn menu_rect(nav_area: Rect, labels: &[&str], bounds: Rect) -> Rect {
    let widest = labels.iter().map(|l| text_width(l)).max().unwrap_or(0);
    let w = (widest + 6).max(MENU_MIN_WIDTH).min(bounds.width);
    let h = (labels.len() as u16 + 2).min(bounds.height.saturating_sub(nav_area.height));
    let x = (nav_area.x + nav_area.width)
        .saturating_sub(w + 1)
        .max(bounds.x);
    Rect::new(x, nav_area.y + nav_area.height, w, h)
}

/// Which menu entry sits at `(col, row)`, if any.
pub fn menu_item_at(menu: Rect, count: usize, col: u16, row: u16) -> Option<usize> {
    if !super::layout::point_in_rect(menu, col, row) || row <= menu.y {
        return None;
    }
    let index = (row - menu.y - 1) as usize;
    (index < count).then_some(index)
}

// ───────────────────────────────────────── bar widget ────────

pub struct NavBar<'a> {
    pub title: &'a str,
    pub links: &'a [NavLink],
    pub geometry: &'a NavBarGeometry,
    pub focus: Option<usize>,
    pub menu_open: bool,
}

impl<'a> Widget for NavBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_style());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        buf.set_stringn(
            inner.x + 1,
            inner.y,
            self.title,
            inner.width.saturating_sub(1) as usize,
            Theme::title_style(),
        );

        for (i, (link, rect)) in self.links.iter().zip(&self.geometry.links).enumerate() {
            let mut style = if link.is_active() {
                Theme::nav_active_style()
            } else {
                Theme::nav_link_style()
            };
            if self.focus == Some(i) {
                style = style.patch(Theme::nav_focus_style());
            }
            buf.set_stringn(
                rect.x,
                rect.y,
                format!(" {} ", link.label),
                rect.width as usize,
                style,
            );
        }

        if let Some(rect) = self.geometry.toggle {
            let style = if self.menu_open {
                Theme::nav_active_style()
            } else {
                Theme::nav_link_style()
            };
            buf.set_stringn(rect.x, rect.y, TOGGLE_LABEL, rect.width as usize, style);
        }
    }
}

// ───────────────────────────────────────── menu popup ────────

/// Vertical list of links shown while the menu is open.
pub struct NavMenuPopup<'a> {
    pub links: &'a [NavLink],
    pub focus: Option<usize>,
}

impl<'a> Widget for NavMenuPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .title(" Sections ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .links
            .iter()
            .enumerate()
            .map(|(i, link)| {
                let marker = if link.is_active() { " ▸ " } else { "   " };
                let mut style = if link.is_active() {
                    Theme::nav_active_style()
                } else {
                    Theme::nav_link_style()
                };
                if self.focus == Some(i) {
                    style = style.patch(Theme::nav_focus_style());
                }
                Line::from(Span::styled(format!("{marker}{}", link.label), style))
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
