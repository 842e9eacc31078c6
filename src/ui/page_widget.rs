//! Custom Ratatui widget that renders the laid-out page at the current
//! scroll offset.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

use crate::app::page::Page;
use crate::core::{flow::LineKind, pacer::Millis};

use super::theme::Theme;

const LEFT_MARGIN: u16 = 2;
const CARD_RULE: &str = "│ ";
const CURSOR: &str = "▌";

pub struct PageWidget<'a> {
    page: &'a Page,
    now: Millis,
}

impl<'a> PageWidget<'a> {
    pub fn new(page: &'a Page, now: Millis) -> Self {
        Self { page, now }
    }

    fn line_style(kind: LineKind) -> Style {
        match kind {
            LineKind::HeroTitle => Theme::hero_title_style(),
            LineKind::HeroSubtitle => Theme::hero_subtitle_style(),
            LineKind::Heading => Theme::heading_style(),
            LineKind::CardTitle => Theme::card_title_style(),
            LineKind::Text | LineKind::CardBody | LineKind::Blank => Theme::text_style(),
        }
    }
}

impl<'a> Widget for PageWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width <= LEFT_MARGIN {
            return;
        }
        let layout = self.page.layout();
        let top = self.page.offset().floor() as i64;
        let shift = self.page.hero_shift() as i64;

        for (i, line) in layout.lines.iter().enumerate() {
            let mut screen = i as i64 - top;
            if i < layout.hero_rows {
                screen += shift;
            }
            if screen < 0 || screen >= area.height as i64 {
                continue;
            }
            if line.kind == LineKind::Blank {
                continue;
            }
            if let Some(card) = line.card {
                if !self.page.is_card_visible(card, self.now) {
                    continue;
                }
            }
            if let Some(heading) = line.heading {
                if !self.page.is_heading_visible(heading, self.now) {
                    continue;
                }
            }

            let y = area.y + screen as u16;
            let mut x = area.x + LEFT_MARGIN;
            let max = (area.x + area.width).saturating_sub(x) as usize;
            let style = Self::line_style(line.kind);

            match line.kind {
                LineKind::CardTitle | LineKind::CardBody => {
                    let (nx, _) = buf.set_stringn(x, y, CARD_RULE, max, Theme::card_rule_style());
                    let rest = (area.x + area.width).saturating_sub(nx) as usize;
                    buf.set_stringn(nx, y, &line.text, rest, style);
                }
                LineKind::HeroSubtitle => {
                    let (text, cursor) = self
                        .page
                        .subtitle(self.now)
                        .unwrap_or_else(|| (line.text.clone(), false));
                    let (nx, _) = buf.set_stringn(x, y, &text, max, style);
                    x = nx;
                    if cursor && x < area.x + area.width {
                        buf.set_stringn(x, y, CURSOR, 1, Theme::cursor_style());
                    }
                }
                _ => {
                    buf.set_stringn(x, y, &line.text, max, style);
                }
            }
        }
    }
}
