//! Core algorithms – page model, layout, and the scroll-sync engine.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Time is
//! always passed in as [`pacer::Millis`], so every component can be driven
//! from tests without a clock.

pub mod document;
pub mod effects;
pub mod flow;
pub mod nav;
pub mod navigator;
pub mod pacer;
pub mod reveal;
pub mod sections;
pub mod tracker;
