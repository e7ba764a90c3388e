use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Trait for TUI applications driven by [`Runtime::run`].
pub trait App {
    /// Called once before the loop starts. Configure tick and render rates here.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the loop should stop.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);

    /// Advances application state.
    ///
    /// `now` is the monotonic time since the loop started, sampled when the
    /// tick fired.
    fn update(&mut self, runtime: &mut Runtime, now: Duration);
}
