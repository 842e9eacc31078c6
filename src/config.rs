//! User configuration: keybindings, scroll tuning, and persistence.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/folio/config.toml` (default `~/.config/folio/config.toml`).
//! Distances are in terminal rows.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::{navigator, reveal, tracker};

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    PrevSection,
    NextSection,
    ToggleMenu,
    FocusNextLink,
    FollowLink,
    ShowHelp,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::Top,
        Action::Bottom,
        Action::PrevSection,
        Action::NextSection,
        Action::ToggleMenu,
        Action::FocusNextLink,
        Action::FollowLink,
        Action::ShowHelp,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::ScrollUp => "Scroll Up",
            Action::ScrollDown => "Scroll Down",
            Action::PageUp => "Page Up",
            Action::PageDown => "Page Down",
            Action::Top => "Top of Page",
            Action::Bottom => "Bottom of Page",
            Action::PrevSection => "Previous Section",
            Action::NextSection => "Next Section",
            Action::ToggleMenu => "Toggle Menu",
            Action::FocusNextLink => "Focus Next Link",
            Action::FollowLink => "Follow Link",
            Action::ShowHelp => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::PrevSection => "prev_section",
            Action::NextSection => "next_section",
            Action::ToggleMenu => "toggle_menu",
            Action::FocusNextLink => "focus_next_link",
            Action::FollowLink => "follow_link",
            Action::ShowHelp => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    /// SHIFT is ignored for punctuation, which terminals report inconsistently.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mut mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        if matches!(self.code, KeyCode::Char(c) if !c.is_ascii_alphabetic()) {
            mask.remove(KeyModifiers::SHIFT);
        }
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Ctrl+c"`, `"↑"`, `"q"`).
    pub fn display(&self) -> String {
        self.render(true)
    }

    /// Serialise to config-file format (e.g. `"Ctrl+c"`, `"Up"`, `"q"`).
    fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match (self.code, pretty) {
            (KeyCode::Char(' '), _) => "Space".into(),
            (KeyCode::Char(c), _) => c.to_string(),
            (KeyCode::Up, true) => "↑".into(),
            (KeyCode::Down, true) => "↓".into(),
            (KeyCode::Up, false) => "Up".into(),
            (KeyCode::Down, false) => "Down".into(),
            (KeyCode::Left, _) => "Left".into(),
            (KeyCode::Right, _) => "Right".into(),
            (KeyCode::Enter, _) => "Enter".into(),
            (KeyCode::Esc, _) => "Esc".into(),
            (KeyCode::Tab, _) => "Tab".into(),
            (KeyCode::Home, _) => "Home".into(),
            (KeyCode::End, _) => "End".into(),
            (KeyCode::PageUp, true) => "PgUp".into(),
            (KeyCode::PageDown, true) => "PgDn".into(),
            (KeyCode::PageUp, false) => "PageUp".into(),
            (KeyCode::PageDown, false) => "PageDown".into(),
            (KeyCode::F(n), _) => format!("F{n}"),
            (other, _) => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── scroll tuning ─────

/// Tunables for the scroll-sync engine.  Distances are rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSettings {
    /// Look-ahead added to the offset when picking the current section.
    pub section_bias: f64,
    pub throttle_ms: u64,
    pub scroll_duration_ms: u64,
    /// Gap left under the navigation bar after a jump.
    pub nav_padding: f64,
    pub reveal_threshold: f64,
    /// Added to the viewport bottom for reveal checks (negative = earlier cut-off).
    pub reveal_margin: f64,
    pub stagger_ms: u64,
    /// Offset past which scrolling down hides the navigation bar.
    pub hide_after: f64,
    pub reveal: bool,
    pub typewriter: bool,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            section_bias: 6.0,
            throttle_ms: tracker::DEFAULT_THROTTLE_MS,
            scroll_duration_ms: navigator::DEFAULT_DURATION_MS,
            nav_padding: 1.0,
            reveal_threshold: reveal::DEFAULT_THRESHOLD,
            reveal_margin: -2.0,
            stagger_ms: reveal::DEFAULT_STAGGER_MS,
            hide_after: 4.0,
            reveal: true,
            typewriter: true,
        }
    }
}

impl ScrollSettings {
    /// Apply one `key = value` pair.  Returns `false` for unknown keys.
    /// Out-of-range numbers are clamped; unparsable values are ignored.
    fn set(&mut self, key: &str, value: &str) -> bool {
        let num = || value.parse::<f64>().ok().filter(|v| v.is_finite());
        let int = || value.parse::<u64>().ok();
        match key {
            "section_bias" => {
                if let Some(v) = num() {
                    self.section_bias = v.clamp(0.0, 100.0);
                }
            }
            "throttle_ms" => {
                if let Some(v) = int() {
                    self.throttle_ms = v.clamp(1, 500);
                }
            }
            "scroll_duration_ms" => {
                if let Some(v) = int() {
                    self.scroll_duration_ms = v.clamp(50, 5000);
                }
            }
            "nav_padding" => {
                if let Some(v) = num() {
                    self.nav_padding = v.clamp(0.0, 20.0);
                }
            }
            "reveal_threshold" => {
                if let Some(v) = num() {
                    self.reveal_threshold = v.clamp(0.0, 1.0);
                }
            }
            "reveal_margin" => {
                if let Some(v) = num() {
                    self.reveal_margin = v.clamp(-50.0, 50.0);
                }
            }
            "stagger_ms" => {
                if let Some(v) = int() {
                    self.stagger_ms = v.min(1000);
                }
            }
            "hide_after" => {
                if let Some(v) = num() {
                    self.hide_after = v.max(0.0);
                }
            }
            "reveal" => self.reveal = value == "true",
            "typewriter" => self.typewriter = value == "true",
            _ => return false,
        }
        true
    }

    fn serialise(&self, lines: &mut Vec<String>) {
        lines.push(format!("section_bias = {}", self.section_bias));
        lines.push(format!("throttle_ms = {}", self.throttle_ms));
        lines.push(format!("scroll_duration_ms = {}", self.scroll_duration_ms));
        lines.push(format!("nav_padding = {}", self.nav_padding));
        lines.push(format!("reveal_threshold = {}", self.reveal_threshold));
        lines.push(format!("reveal_margin = {}", self.reveal_margin));
        lines.push(format!("stagger_ms = {}", self.stagger_ms));
        lines.push(format!("hide_after = {}", self.hide_after));
        lines.push(format!("reveal = {}", self.reveal));
        lines.push(format!("typewriter = {}", self.typewriter));
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: keybindings and scroll tuning.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub scroll: ScrollSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            scroll: ScrollSettings::default(),
        }
    }
}

impl AppConfig {
    /// Hard-coded default bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('b'), n)]);
        m.insert(Action::PageDown, vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)]);
        m.insert(Top, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(Bottom, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), KeyModifiers::SHIFT)]);
        m.insert(PrevSection, vec![KeyBind::new(Char('p'), n)]);
        m.insert(NextSection, vec![KeyBind::new(Char('n'), n)]);
        m.insert(ToggleMenu, vec![KeyBind::new(Char('m'), n)]);
        m.insert(FocusNextLink, vec![KeyBind::new(Tab, n)]);
        m.insert(FollowLink, vec![KeyBind::new(Enter, n)]);
        m.insert(ShowHelp, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}/{}: sections | 1-9: jump | {}: menu | {}: help",
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::PrevSection),
            self.short_binding(Action::NextSection),
            self.short_binding(Action::ToggleMenu),
            self.short_binding(Action::ShowHelp),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(_) => Self::default(),
        }
    }

    /// Persist current config to the default location.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if config.scroll.set(key, value) {
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "ignoring unknown config key");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# folio configuration".to_string(),
            String::new(),
            "# Scroll tuning (distances in terminal rows)".to_string(),
        ];
        self.scroll.serialise(&mut lines);
        lines.extend([
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ]);

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/folio/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("folio").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        let mut ev = KeyEvent::new(code, modifiers);
        ev.kind = KeyEventKind::Press;
        ev
    }

    #[test]
    fn default_bindings_resolve() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.match_key(key(KeyCode::Char('j'), KeyModifiers::NONE)), Some(Action::ScrollDown));
        assert_eq!(cfg.match_key(key(KeyCode::Tab, KeyModifiers::NONE)), Some(Action::FocusNextLink));
        assert_eq!(cfg.match_key(key(KeyCode::Char('x'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn parses_tuning_and_bindings_with_clamping() {
        let cfg = AppConfig::parse_config(
            "# comment\nsection_bias = 8.5\nthrottle_ms = 0\nreveal = false\nquit = Ctrl+x, Esc\nbogus = 1\n",
        );
        assert_eq!(cfg.scroll.section_bias, 8.5);
        assert_eq!(cfg.scroll.throttle_ms, 1);
        assert!(!cfg.scroll.reveal);
        assert_eq!(
            cfg.match_key(key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(cfg.match_key(key(KeyCode::Char('q'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn unparsable_values_keep_defaults() {
        let cfg = AppConfig::parse_config("section_bias = lots\nstagger_ms = -3\nnext_section = Ctrl+Nope+x\n");
        let defaults = ScrollSettings::default();
        assert_eq!(cfg.scroll.section_bias, defaults.section_bias);
        assert_eq!(cfg.scroll.stagger_ms, defaults.stagger_ms);
        assert_eq!(cfg.display_bindings(Action::NextSection), "n");
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("folio").join("config.toml");

        let mut cfg = AppConfig::default();
        cfg.scroll.scroll_duration_ms = 800;
        cfg.scroll.typewriter = false;
        cfg.bindings
            .insert(Action::ToggleMenu, vec![KeyBind::new(KeyCode::F(2), KeyModifiers::NONE)]);
        cfg.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.scroll, cfg.scroll);
        assert_eq!(loaded.display_bindings(Action::ToggleMenu), "F2");
        assert_eq!(loaded.display_bindings(Action::ScrollUp), "↑/k");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = AppConfig::load_from(&dir.path().join("absent.toml"));
        assert_eq!(cfg.scroll, ScrollSettings::default());
    }
}
