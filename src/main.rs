//! A single-page portfolio viewer for the terminal.
//!
//! Run the binary with a page file (or none, for the built-in sample) to
//! scroll through its sections.  The navigation bar follows the section in
//! view, links glide smoothly to their targets, and cards fade in as they
//! scroll into the viewport.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    page::Page,
    state::{ActiveView, AppState},
};
use crate::config::{AppConfig, ScrollSettings};
use crate::core::document::Document;
use crate::ui::{
    layout::{AppLayout, NAV_HEIGHT},
    nav_bar::{NavBar, NavMenuPopup},
    page_widget::PageWidget,
    popup,
    theme::Theme,
};

/// Target frame interval while something is animating.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll-synced portfolio page viewer")]
struct Cli {
    /// Page file to open (defaults to the built-in sample portfolio).
    page: Option<PathBuf>,

    /// Rows of look-ahead when picking the current section.
    #[arg(long)]
    bias: Option<f64>,

    /// Smooth scroll duration in milliseconds.
    #[arg(long = "duration-ms")]
    duration_ms: Option<u64>,

    /// Show every card immediately instead of revealing on scroll.
    #[arg(long = "no-reveal")]
    no_reveal: bool,

    /// Show the subtitle without the typing effect.
    #[arg(long = "no-typewriter")]
    no_typewriter: bool,
}

impl Cli {
    /// Session overrides on top of the loaded config.
    fn apply(&self, scroll: &mut ScrollSettings) {
        if let Some(bias) = self.bias {
            scroll.section_bias = bias.max(0.0);
        }
        if let Some(ms) = self.duration_ms {
            scroll.scroll_duration_ms = ms.max(1);
        }
        if self.no_reveal {
            scroll.reveal = false;
        }
        if self.no_typewriter {
            scroll.typewriter = false;
        }
    }
}

// ───────────────────────────────────────── drawing ──────────

fn draw(frame: &mut Frame, state: &AppState) {
    let now = state.now();
    let layout = AppLayout::from_area(frame.area());

    frame.render_widget(PageWidget::new(&state.page, now), layout.page_area);

    let links = state.page.nav_links();
    if state.nav_visible() {
        let geometry = state.nav_geometry();
        frame.render_widget(
            NavBar {
                title: &state.page.document().title,
                links: &links,
                geometry: &geometry,
                focus: state.focus,
                menu_open: state.menu.is_open(),
            },
            layout.nav_area,
        );
        if state.menu.is_open() {
            frame.render_widget(
                NavMenuPopup {
                    links: &links,
                    focus: state.focus,
                },
                state.menu_area(),
            );
        }
    }

    // ── status bar ─────────────────────────────────────────────
    let hint = state.config.status_bar_hint();
    let left = match state.active_view {
        ActiveView::Page => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::Help => "",
    };
    let section = state.page.current_label().unwrap_or_default();
    let max = state.page.max_offset();
    let percent = if max > 0.0 {
        (state.page.offset() / max * 100.0).round() as u32
    } else {
        100
    };
    let right = format!("{section}  {percent:>3}% ");

    frame.render_widget(
        Paragraph::new(left).style(Theme::status_bar_style()),
        layout.status_area,
    );
    frame.render_widget(
        Paragraph::new(right)
            .alignment(Alignment::Right)
            .style(Theme::status_bar_style()),
        layout.status_area,
    );

    if state.active_view == ActiveView::Help {
        frame.render_widget(popup::HelpPopup { config: &state.config }, frame.area());
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    // ── config + page ─────────────────────────────────────────
    let mut config = AppConfig::load();
    if !config::config_path().exists() {
        if let Err(e) = config.save() {
            tracing::debug!("could not write default config: {e:#}");
        }
    }
    cli.apply(&mut config.scroll);

    let document = match &cli.page {
        Some(path) => Document::load(path)
            .with_context(|| format!("failed to load page {}", path.display()))?,
        None => Document::sample().context("built-in sample page is invalid")?,
    };
    tracing::debug!(
        title = %document.title,
        sections = document.sections.len(),
        "page loaded"
    );

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let area = Rect::new(0, 0, size.width, size.height);
    let layout = AppLayout::from_area(area);
    let nav_height = if document.sections.is_empty() {
        0.0
    } else {
        NAV_HEIGHT as f64
    };
    let page = Page::init(
        document,
        layout.page_area.width,
        layout.page_area.height as f64,
        nav_height,
        &config.scroll,
        0,
    );
    let mut state = AppState::new(page, config, area);

    // ── event loop ────────────────────────────────────────────
    let mut events = spawn_event_reader();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut dirty = true;

    loop {
        if dirty {
            terminal.draw(|frame| draw(frame, &state))?;
            dirty = false;
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(w, h) => {
                        state.area = Rect::new(0, 0, w, h);
                        let layout = state.layout();
                        let now = state.now();
                        state.page.resize(
                            layout.page_area.width,
                            layout.page_area.height as f64,
                            now,
                        );
                    }
                }
                dirty = true;
            }

            _ = frames.tick() => {
                let now = state.now();
                if state.page.needs_frames(now) {
                    state.page.frame(now);
                    dirty = true;
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    state.page.teardown();

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
