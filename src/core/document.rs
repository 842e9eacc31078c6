//! Portfolio page document and its line-oriented text format.
//!
//! ```text
//! ; comment
//! # Ada Lovelace
//! > Analyst, metaphysician, and founder of scientific computing
//! == about | About
//! Body text for the section.
//! -- projects | Analytical Engine notes
//! Card body text.
//! ```

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

/// Built-in sample page used when no file is given.
pub const SAMPLE_PAGE: &str = include_str!("../../assets/portfolio.page");

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read page file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl PageError {
    fn parse(line: usize, message: impl Into<String>) -> Self {
        PageError::Parse {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Unique element id, derived from the section id and position.
    pub id: String,
    /// Reveal group (card category).
    pub group: String,
    pub title: String,
    pub body: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSection {
    pub id: String,
    pub label: String,
    pub body: Vec<String>,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub title: String,
    pub subtitle: Option<String>,
    pub sections: Vec<PageSection>,
}

impl Document {
    pub fn load(path: &Path) -> Result<Self, PageError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn sample() -> Result<Self, PageError> {
        Self::parse(SAMPLE_PAGE)
    }

    pub fn parse(text: &str) -> Result<Self, PageError> {
        let mut doc = Document::default();
        let mut ids = HashSet::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end();

            if line.starts_with(';') {
                continue;
            }
            if let Some(rest) = line.strip_prefix("== ") {
                let (id, label) = split_header(rest)
                    .ok_or_else(|| PageError::parse(line_no, "expected `== id | Label`"))?;
                if !ids.insert(id.to_string()) {
                    return Err(PageError::parse(line_no, format!("duplicate section id `{id}`")));
                }
                doc.sections.push(PageSection {
                    id: id.to_string(),
                    label: label.to_string(),
                    body: Vec::new(),
                    cards: Vec::new(),
                });
                continue;
            }
            if let Some(rest) = line.strip_prefix("-- ") {
                let (group, title) = split_header(rest)
                    .ok_or_else(|| PageError::parse(line_no, "expected `-- group | Title`"))?;
                let Some(section) = doc.sections.last_mut() else {
                    return Err(PageError::parse(line_no, "card outside of a section"));
                };
                let id = format!("{}-{}", section.id, section.cards.len() + 1);
                section.cards.push(Card {
                    id,
                    group: group.to_string(),
                    title: title.to_string(),
                    body: Vec::new(),
                });
                continue;
            }

            let Some(section) = doc.sections.last_mut() else {
                if let Some(title) = line.strip_prefix("# ") {
                    doc.title = title.trim().to_string();
                } else if let Some(sub) = line.strip_prefix("> ") {
                    doc.subtitle = Some(sub.trim().to_string());
                } else if !line.trim().is_empty() {
                    return Err(PageError::parse(line_no, "text before the first section"));
                }
                continue;
            };
            match section.cards.last_mut() {
                Some(card) => card.body.push(line.to_string()),
                None => section.body.push(line.to_string()),
            }
        }

        for section in &mut doc.sections {
            trim_blank_tail(&mut section.body);
            for card in &mut section.cards {
                trim_blank_tail(&mut card.body);
            }
        }
        Ok(doc)
    }
}

fn split_header(rest: &str) -> Option<(&str, &str)> {
    let (key, label) = rest.split_once('|')?;
    let key = key.trim();
    let label = label.trim();
    if key.is_empty() || key.contains(char::is_whitespace) || label.is_empty() {
        return None;
    }
    Some((key, label))
}

fn trim_blank_tail(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
; sample
# Ada
> Analyst

== home | Home
Hello there.

== work | Work
-- projects | Engine
Gears.

-- projects | Notes
Loops.
";

    #[test]
    fn parses_sections_cards_and_hero() {
        let doc = Document::parse(PAGE).expect("valid page");
        assert_eq!(doc.title, "Ada");
        assert_eq!(doc.subtitle.as_deref(), Some("Analyst"));
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].body, vec!["Hello there."]);

        let work = &doc.sections[1];
        assert_eq!(work.label, "Work");
        assert_eq!(work.cards.len(), 2);
        assert_eq!(work.cards[0].id, "work-1");
        assert_eq!(work.cards[1].group, "projects");
        assert_eq!(work.cards[0].body, vec!["Gears."]);
    }

    #[test]
    fn rejects_duplicate_section_ids() {
        let err = Document::parse("== a | A\n== a | Again\n").unwrap_err();
        assert!(matches!(err, PageError::Parse { line: 2, .. }));
    }

    #[test]
    fn rejects_orphan_cards_and_stray_text() {
        assert!(matches!(
            Document::parse("-- g | Card\n"),
            Err(PageError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            Document::parse("# T\nstray\n"),
            Err(PageError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn malformed_header_reports_line() {
        let err = Document::parse("== no-label\n").unwrap_err();
        assert_eq!(err.to_string(), "line 1: expected `== id | Label`");
    }

    #[test]
    fn sample_page_parses() {
        let doc = Document::sample().expect("bundled sample is valid");
        assert!(doc.sections.len() >= 4);
        assert!(doc.sections.iter().any(|s| !s.cards.is_empty()));
    }
}
