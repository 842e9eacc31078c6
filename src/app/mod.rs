//! Application orchestration: page controller, state, event loop input,
//! and input handling.

pub mod event;
pub mod handler;
pub mod page;
pub mod state;
