//! Popup overlay for the key binding help.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::config::{Action, AppConfig};

use super::theme::Theme;

/// Read-only list of every action and the keys bound to it.
pub struct HelpPopup<'a> {
    pub config: &'a AppConfig,
}

impl<'a> Widget for HelpPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // actions + section digits + 2 blanks + hint + 2 border
        let height = (Action::ALL.len() as u16) + 7;
        let popup = centered_fixed(52, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Controls ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::dim_style());

        let inner = block.inner(popup);
        block.render(popup, buf);

        let dim = Theme::dim_style();
        let label_style = Style::default().fg(Color::White);
        let key_style = Style::default().fg(Color::Yellow);
        let inner_width = inner.width as usize;

        let row = |label: &str, keys: &str| {
            // Fixed-width columns: label left-aligned, keys right-aligned.
            let label_col = format!("   {label:<22}");
            let keys_width = inner_width.saturating_sub(label_col.chars().count()).max(1);
            Line::from(vec![
                Span::styled(label_col, label_style),
                Span::styled(format!("{keys:>keys_width$}"), key_style),
            ])
        };

        let mut lines = vec![Line::raw("")];
        for &action in Action::ALL {
            lines.push(row(action.label(), &self.config.display_bindings(action)));
        }
        lines.push(row("Jump to section", "1–9"));
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("  Config: {}", crate::config::config_path().display()),
            dim,
        )));
        lines.push(Line::from(Span::styled("  Esc: close", dim)));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_clamped() {
        let area = Rect::new(0, 0, 30, 10);
        assert_eq!(centered_fixed(10, 4, area), Rect::new(10, 3, 10, 4));
        assert_eq!(centered_fixed(50, 40, area), area);
    }
}
