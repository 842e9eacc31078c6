//! Section registry and locator.
//!
//! Sections are vertical bands of the page, recomputed from layout on every
//! reflow.  The locator answers "which section is current" for a scroll
//! offset plus a look-ahead bias.

use std::collections::HashSet;

use thiserror::Error;

/// A named, vertically bounded region of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    /// Document-relative top.
    pub start: f64,
    pub height: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, start: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            start,
            height,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.height
    }

    /// Half-open containment: `[start, start + height)`.
    pub fn contains(&self, pos: f64) -> bool {
        pos >= self.start && pos < self.end()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("section `{0}` is registered more than once")]
    DuplicateId(String),
    #[error("section `{id}` has invalid geometry (start {start}, height {height})")]
    InvalidGeometry { id: String, start: f64, height: f64 },
    #[error("section `{first}` overlaps section `{second}`")]
    Overlap { first: String, second: String },
}

/// Sections in registration (document) order.
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    sections: Vec<Section>,
}

impl SectionRegistry {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Swap in freshly measured geometry after a reflow.
    pub fn replace(&mut self, sections: Vec<Section>) {
        self.sections = sections;
    }

    /// Check ids are unique, geometry is sane, and no two ranges overlap.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::new();
        for s in &self.sections {
            if !seen.insert(s.id.as_str()) {
                return Err(LayoutError::DuplicateId(s.id.clone()));
            }
            if !(s.start >= 0.0 && s.height > 0.0) {
                return Err(LayoutError::InvalidGeometry {
                    id: s.id.clone(),
                    start: s.start,
                    height: s.height,
                });
            }
        }

        let mut by_start: Vec<&Section> = self.sections.iter().collect();
        by_start.sort_by(|a, b| a.start.total_cmp(&b.start));
        for pair in by_start.windows(2) {
            if pair[1].start < pair[0].end() {
                return Err(LayoutError::Overlap {
                    first: pair[0].id.clone(),
                    second: pair[1].id.clone(),
                });
            }
        }
        Ok(())
    }

    /// The section containing `offset + bias`, if any.
    ///
    /// Linear scan in registration order; when ranges overlap the first
    /// registered match wins.
    pub fn locate(&self, offset: f64, bias: f64) -> Option<&Section> {
        let pos = offset + bias;
        self.sections.iter().find(|s| s.contains(pos))
    }
}

#[cfg(test)]
impl SectionRegistry {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> SectionRegistry {
        SectionRegistry::new(vec![
            Section::new("home", 0.0, 500.0),
            Section::new("about", 500.0, 400.0),
            Section::new("contact", 1000.0, 300.0),
        ])
    }

    #[test]
    fn locates_with_bias() {
        let reg = page();
        assert_eq!(reg.locate(600.0, 150.0).map(|s| s.id.as_str()), Some("about"));
        assert_eq!(reg.locate(0.0, 150.0).map(|s| s.id.as_str()), Some("home"));
    }

    #[test]
    fn boundaries_are_half_open() {
        let reg = page();
        assert_eq!(reg.locate(499.0, 0.0).map(|s| s.id.as_str()), Some("home"));
        assert_eq!(reg.locate(500.0, 0.0).map(|s| s.id.as_str()), Some("about"));
        assert!(reg.locate(1300.0, 0.0).is_none());
    }

    #[test]
    fn gaps_and_outside_match_nothing() {
        let reg = page();
        assert!(reg.locate(950.0, 0.0).is_none(), "gap between about and contact");
        assert!(reg.locate(-10.0, 0.0).is_none());
        assert!(reg.locate(5000.0, 0.0).is_none());
        assert!(SectionRegistry::default().locate(0.0, 0.0).is_none());
    }

    #[test]
    fn at_most_one_match_for_every_offset() {
        let reg = page();
        for step in 0..=300 {
            let pos = step as f64 * 5.0 - 50.0;
            let hits = reg.sections().iter().filter(|s| s.contains(pos)).count();
            assert!(hits <= 1, "offset {pos} matched {hits} sections");
            assert_eq!(hits == 1, reg.locate(pos, 0.0).is_some());
        }
    }

    #[test]
    fn overlap_tie_break_is_registration_order() {
        let reg = SectionRegistry::new(vec![
            Section::new("first", 0.0, 300.0),
            Section::new("second", 200.0, 300.0),
        ]);
        assert_eq!(reg.locate(250.0, 0.0).map(|s| s.id.as_str()), Some("first"));
        assert_eq!(
            reg.validate(),
            Err(LayoutError::Overlap {
                first: "first".into(),
                second: "second".into(),
            })
        );
    }

    #[test]
    fn validate_rejects_duplicates_and_bad_geometry() {
        let dup = SectionRegistry::new(vec![
            Section::new("a", 0.0, 10.0),
            Section::new("a", 10.0, 10.0),
        ]);
        assert_eq!(dup.validate(), Err(LayoutError::DuplicateId("a".into())));

        let flat = SectionRegistry::new(vec![Section::new("a", 0.0, 0.0)]);
        assert!(matches!(flat.validate(), Err(LayoutError::InvalidGeometry { .. })));

        assert!(page().validate().is_ok());
    }

    #[test]
    fn replace_picks_up_reflowed_geometry() {
        let mut reg = page();
        reg.replace(vec![
            Section::new("home", 0.0, 800.0),
            Section::new("about", 800.0, 400.0),
        ]);
        assert_eq!(reg.locate(600.0, 150.0).map(|s| s.id.as_str()), Some("home"));
        assert_eq!(reg.len(), 2);
    }
}
