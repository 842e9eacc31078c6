//! Hero effects: typewriter subtitle and parallax shift.

use super::pacer::Millis;

pub const TYPE_DELAY_MS: Millis = 2000;
pub const TYPE_SPEED_MS: Millis = 60;
pub const CURSOR_LINGER_MS: Millis = 1000;
pub const PARALLAX_RATE: f64 = -0.2;

/// Types `text` one character at a time after an initial delay, with a
/// trailing cursor that disappears shortly after the last character.
#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    start: Millis,
    speed: Millis,
    linger: Millis,
}

impl Typewriter {
    pub fn new(text: &str, now: Millis) -> Self {
        Self {
            chars: text.chars().collect(),
            start: now.saturating_add(TYPE_DELAY_MS),
            speed: TYPE_SPEED_MS.max(1),
            linger: CURSOR_LINGER_MS,
        }
    }

    /// Number of characters shown at `now`.
    pub fn typed(&self, now: Millis) -> usize {
        if now < self.start {
            return 0;
        }
        let n = (now - self.start) / self.speed + 1;
        (n as usize).min(self.chars.len())
    }

    pub fn text(&self, now: Millis) -> String {
        self.chars[..self.typed(now)].iter().collect()
    }

    fn finished_at(&self) -> Millis {
        let n = self.chars.len().saturating_sub(1) as Millis;
        self.start.saturating_add(n.saturating_mul(self.speed))
    }

    /// The cursor is drawn from the start until `linger` after completion.
    pub fn cursor_visible(&self, now: Millis) -> bool {
        now < self.finished_at().saturating_add(self.linger)
    }
}

/// Vertical shift for hero content: `offset * rate` while the hero can
/// still be on screen.  Past the first screen the last shift is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    rate: f64,
    shift: f64,
}

impl Parallax {
    pub fn new(rate: f64) -> Self {
        Self { rate, shift: 0.0 }
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// Feed a new offset.  Returns the shift in effect afterwards.
    pub fn update(&mut self, offset: f64, viewport: f64) -> f64 {
        if offset < viewport {
            self.shift = offset * self.rate;
        }
        self.shift
    }
}

#[cfg(test)]
impl Typewriter {
    pub fn is_done(&self, now: Millis) -> bool {
        self.typed(now) == self.chars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_starts_after_delay_and_advances_per_char() {
        let tw = Typewriter::new("hello", 0);
        assert_eq!(tw.text(1999), "");
        assert_eq!(tw.text(2000), "h");
        assert_eq!(tw.text(2060), "he");
        assert_eq!(tw.text(2240), "hello");
        assert_eq!(tw.text(99_999), "hello");
        assert!(tw.is_done(2240));
        assert!(!tw.is_done(2180));
    }

    #[test]
    fn cursor_lingers_after_completion() {
        let tw = Typewriter::new("abc", 0);
        assert!(tw.cursor_visible(0));
        // Last char lands at 2120; cursor stays until 3120.
        assert!(tw.cursor_visible(3119));
        assert!(!tw.cursor_visible(3120));
    }

    #[test]
    fn multibyte_text_is_split_on_chars() {
        let tw = Typewriter::new("héllo — ✓", 0);
        assert_eq!(tw.text(2060), "hé");
    }

    #[test]
    fn parallax_follows_offset_within_first_screen() {
        let mut p = Parallax::new(PARALLAX_RATE);
        assert_eq!(p.update(100.0, 800.0), -20.0);
        assert_eq!(p.update(50.0, 800.0), -10.0);
        assert_eq!(p.shift(), -10.0);
    }

    #[test]
    fn parallax_keeps_last_shift_past_first_screen() {
        let mut p = Parallax::new(PARALLAX_RATE);
        p.update(750.0, 800.0);
        assert_eq!(p.update(900.0, 800.0), -150.0);
        assert_eq!(p.update(5000.0, 800.0), -150.0);
        assert_eq!(p.update(0.0, 800.0), 0.0);
    }
}
