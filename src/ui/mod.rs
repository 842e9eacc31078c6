//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the page controller's state and turns it into cells on
//! the terminal.  No file I/O happens here.

pub mod layout;
pub mod nav_bar;
pub mod page_widget;
pub mod popup;
pub mod theme;
