use std::time::Duration;

use blockfall_engine::{GameSession, Snapshot};
use crossterm::event::Event;
use ratatui::Frame;
use ratatui_runtime::{App, RenderMode, Runtime};

use crate::command::play::screen::PlayScreen;

const FPS: f64 = 60.0;

#[derive(Debug)]
pub struct PlayApp {
    screen: PlayScreen,
}

impl PlayApp {
    pub fn new(session: GameSession) -> Self {
        Self {
            screen: PlayScreen::new(session),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.screen.session().snapshot()
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(FPS));
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
    }

    fn should_exit(&self) -> bool {
        self.screen.is_exiting()
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        self.screen.handle_event(&event);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }

    fn update(&mut self, _runtime: &mut Runtime, now: Duration) {
        self.screen.update(now);
    }
}
