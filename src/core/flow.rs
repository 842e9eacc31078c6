//! Page flow: turns a [`Document`] into rows for a given pane width.
//!
//! The result is the page's "layout": every rendered row, plus the measured
//! geometry of sections (for the locator), plus headings and cards (for
//! reveals).  It is recomputed whenever the width changes.
//!
//! The page starts with `top_inset` blank rows so the hero clears the
//! navigation bar drawn over the top of the pane.  The first section also
//! owns everything above its heading, so the top of the page is never
//! outside a section.

use super::document::Document;
use super::sections::Section;

/// Horizontal space kept free on each side of the text column.
const SIDE_MARGIN: usize = 2;
const MIN_TEXT_WIDTH: usize = 12;
/// Blank rows after the last section so it can reach the top of the pane.
const TAIL_ROWS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    HeroTitle,
    /// Placeholder for the (possibly typewritten) subtitle.
    HeroSubtitle,
    Heading,
    Text,
    CardTitle,
    CardBody,
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLine {
    pub kind: LineKind,
    pub text: String,
    /// Index into [`PageLayout::cards`] when the row belongs to a card.
    pub card: Option<usize>,
    /// Index into [`PageLayout::headings`] for a section heading row.
    pub heading: Option<usize>,
}

impl PageLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            card: None,
            heading: None,
        }
    }

    fn blank() -> Self {
        Self::new(LineKind::Blank, "")
    }
}

/// Row span of one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardBox {
    pub id: String,
    pub group: String,
    pub top: usize,
    pub height: usize,
}

/// Row of one section heading.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingRow {
    /// Reveal id, distinct from the section id.
    pub id: String,
    pub row: usize,
}

/// Reveal group shared by all section headings.
pub const HEADING_GROUP: &str = "headers";

#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub width: u16,
    pub lines: Vec<PageLine>,
    pub sections: Vec<Section>,
    pub headings: Vec<HeadingRow>,
    pub cards: Vec<CardBox>,
    /// Rows before the first heading, inset included.
    pub hero_rows: usize,
}

impl PageLayout {
    pub fn compute(doc: &Document, width: u16, top_inset: usize) -> Self {
        let text_width = (width as usize)
            .saturating_sub(SIDE_MARGIN * 2)
            .max(MIN_TEXT_WIDTH);
        let mut lines = Vec::new();
        let mut sections = Vec::new();
        let mut headings = Vec::new();
        let mut cards = Vec::new();

        // ── hero ──────────────────────────────────────────────
        lines.extend((0..top_inset).map(|_| PageLine::blank()));
        lines.push(PageLine::blank());
        if !doc.title.is_empty() {
            lines.push(PageLine::new(LineKind::HeroTitle, doc.title.clone()));
        }
        if let Some(sub) = &doc.subtitle {
            lines.push(PageLine::new(LineKind::HeroSubtitle, sub.clone()));
        }
        lines.push(PageLine::blank());
        let hero_rows = lines.len();

        // ── sections ──────────────────────────────────────────
        let mut starts = Vec::with_capacity(doc.sections.len());
        for section in &doc.sections {
            starts.push(lines.len());
            headings.push(HeadingRow {
                id: format!("{}-heading", section.id),
                row: lines.len(),
            });
            lines.push(PageLine {
                heading: Some(headings.len() - 1),
                ..PageLine::new(LineKind::Heading, section.label.clone())
            });
            lines.push(PageLine::blank());
            for para in &section.body {
                for row in wrap(para, text_width) {
                    lines.push(PageLine::new(LineKind::Text, row));
                }
            }
            if !section.body.is_empty() {
                lines.push(PageLine::blank());
            }

            for card in &section.cards {
                let index = cards.len();
                let top = lines.len();
                let mut push = |kind, text: String| {
                    lines.push(PageLine {
                        card: Some(index),
                        ..PageLine::new(kind, text)
                    })
                };
                push(LineKind::CardTitle, card.title.clone());
                for para in &card.body {
                    for row in wrap(para, text_width.saturating_sub(2).max(MIN_TEXT_WIDTH)) {
                        push(LineKind::CardBody, row);
                    }
                }
                cards.push(CardBox {
                    id: card.id.clone(),
                    group: card.group.clone(),
                    top,
                    height: lines.len() - top,
                });
                lines.push(PageLine::blank());
            }
            lines.push(PageLine::blank());
        }
        lines.extend((0..TAIL_ROWS).map(|_| PageLine::blank()));

        for (i, section) in doc.sections.iter().enumerate() {
            let start = if i == 0 { 0 } else { starts[i] };
            let end = starts.get(i + 1).copied().unwrap_or(lines.len());
            sections.push(Section::new(
                section.id.clone(),
                start as f64,
                (end - start) as f64,
            ));
        }

        Self {
            width,
            lines,
            sections,
            headings,
            cards,
            hero_rows,
        }
    }

    pub fn height(&self) -> f64 {
        self.lines.len() as f64
    }

    /// Largest offset that still fills a viewport of `viewport` rows.
    pub fn max_offset(&self, viewport: f64) -> f64 {
        (self.height() - viewport).max(0.0)
    }

    /// Document-relative top of a section or card element.  The first
    /// section resolves to the top of the page.
    pub fn anchor_top(&self, id: &str) -> Option<f64> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.start)
            .or_else(|| {
                self.cards
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.top as f64)
            })
    }
}

/// Greedy word wrap on character counts.  Words longer than `width` are
/// split; an empty paragraph yields a single empty row.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                rows.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            rows.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            rows.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 || rows.is_empty() {
        rows.push(current);
    }
    rows
}
