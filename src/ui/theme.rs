//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── page ───────────────────────────────────────────────────
    pub fn hero_title_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hero_subtitle_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn heading_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn card_title_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_rule_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn cursor_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    // ── navigation ─────────────────────────────────────────────
    pub fn nav_link_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn nav_active_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_focus_style() -> Style {
        Style::default().add_modifier(Modifier::UNDERLINED | Modifier::REVERSED)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn dim_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }
}
