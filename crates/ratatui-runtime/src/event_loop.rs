use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render at fixed intervals.
    Interval(Duration),
    /// Render after state changes (tick or crossterm event).
    #[default]
    OnDirty,
    /// Render after state changes, but with minimum interval between renders.
    ///
    /// If events occur faster than the interval, they are batched into one render.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Throttled` mode from frame rate (FPS).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Event loop state.
///
/// Tracks when the next tick and render are due. Ticks are stamped with
/// the time since the loop was created so applications can measure frame
/// deltas themselves.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    started: Instant,
    last_tick: Option<Instant>,
    last_render: Option<Instant>,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl EventLoop {
    /// Tick interval is unset, and render mode defaults to `OnDirty`.
    pub fn new(started: Instant) -> Self {
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            started,
            last_tick: None,
            last_render: None,
            dirty: true, // Initial render is required on startup
        }
    }

    /// Pass `None` to disable tick events.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/render time is reached or a crossterm event occurs.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    /// Returns a tick or render event if one is due at `now`.
    ///
    /// Ticks take precedence over renders.
    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(tick_interval) = self.tick_interval
            && is_due(self.last_tick, tick_interval, now)
        {
            self.last_tick = Some(now);
            self.dirty = true;
            let elapsed = now.saturating_duration_since(self.started);
            tracing::trace!(?elapsed, "tick");
            return Some(TuiEvent::Tick(elapsed));
        }

        let do_render = match self.render_mode {
            RenderMode::Interval(interval) => is_due(self.last_render, interval, now),
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && is_due(self.last_render, interval, now)
            }
        };
        if do_render {
            self.last_render = Some(now);
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self
            .tick_interval
            .map(|interval| self.last_tick.map_or(now, |last| last + interval));
        let next_render_at = match self.render_mode {
            RenderMode::Interval(interval) => {
                Some(self.last_render.map_or(now, |last| last + interval))
            }
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self
                .dirty
                .then(|| self.last_render.map_or(now, |last| last + interval)),
        };
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}

fn is_due(last: Option<Instant>, interval: Duration, now: Instant) -> bool {
    last.is_none_or(|last| now.saturating_duration_since(last) >= interval)
}
