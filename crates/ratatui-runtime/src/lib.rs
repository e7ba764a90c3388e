//! Minimal frame driver for ratatui applications.
//!
//! [`Runtime`] owns the terminal loop and calls back into an [`App`]:
//! `update` on every tick with the time since the loop started, `draw`
//! whenever a render is due, and `handle_event` for terminal input.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
