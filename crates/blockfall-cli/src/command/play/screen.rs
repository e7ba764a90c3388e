use std::time::Duration;

use blockfall_engine::{Command, DropOutcome, FrameClock, GameSession, SessionState};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::ui::widgets::SessionDisplay;

/// Longest stretch of time a single frame may feed to the session.
const MAX_FRAME_STEP: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub struct PlayScreen {
    session: GameSession,
    clock: FrameClock,
    is_exiting: bool,
}

impl PlayScreen {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            clock: FrameClock::new().with_max_step(MAX_FRAME_STEP),
            is_exiting: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let session_display = SessionDisplay::new(&self.session, true);
        let help_text = match self.session.session_state() {
            SessionState::Playing => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ X (Rotate) | P (Pause) | R (Restart) | Q (Quit)"
            }
            SessionState::Paused => "Controls: P (Resume) | R (Restart) | Q (Quit)",
            SessionState::GameOver => "Controls: R (Restart) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Some(event) = event.as_key_event() else {
            return;
        };
        if event.kind == KeyEventKind::Release {
            return;
        }
        if event.code == KeyCode::Char('q') {
            self.is_exiting = true;
            return;
        }
        if let Some(command) = command_for_key(event.code) {
            self.session.queue(command);
        }
    }

    /// Feeds the time since the previous frame to the session.
    pub fn update(&mut self, now: Duration) {
        let elapsed = self.clock.advance(now);
        if let Some(DropOutcome::Locked(report)) = self.session.tick(elapsed) {
            tracing::debug!(
                cleared_rows = report.cleared_rows,
                points = report.points,
                score = self.session.score(),
                "piece locked by gravity"
            );
        }
    }
}

/// Key bindings of the play screen. `q` is handled by the screen itself.
fn command_for_key(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Left => Command::MoveLeft,
        KeyCode::Right => Command::MoveRight,
        KeyCode::Down => Command::SoftDrop,
        KeyCode::Up | KeyCode::Char('x') => Command::Rotate,
        KeyCode::Char('p') => Command::TogglePause,
        KeyCode::Char('r') => Command::Restart,
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameConfig, RandomPieceSource};
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn screen() -> PlayScreen {
        let session =
            GameSession::with_source(GameConfig::default(), RandomPieceSource::from_seed(7))
                .unwrap();
        PlayScreen::new(session)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for_key(KeyCode::Left), Some(Command::MoveLeft));
        assert_eq!(command_for_key(KeyCode::Right), Some(Command::MoveRight));
        assert_eq!(command_for_key(KeyCode::Down), Some(Command::SoftDrop));
        assert_eq!(command_for_key(KeyCode::Up), Some(Command::Rotate));
        assert_eq!(command_for_key(KeyCode::Char('x')), Some(Command::Rotate));
        assert_eq!(command_for_key(KeyCode::Char('p')), Some(Command::TogglePause));
        assert_eq!(command_for_key(KeyCode::Char('r')), Some(Command::Restart));
        assert_eq!(command_for_key(KeyCode::Char('z')), None);
    }

    #[test]
    fn test_quit_key() {
        let mut screen = screen();
        screen.handle_event(&key(KeyCode::Char('q')));
        assert!(screen.is_exiting());
    }

    #[test]
    fn test_queued_keys_apply_on_update() {
        let mut screen = screen();
        let x = screen.session().falling_piece().position().x();

        screen.handle_event(&key(KeyCode::Left));
        assert_eq!(screen.session().falling_piece().position().x(), x);

        screen.update(Duration::from_secs(1));
        assert_eq!(screen.session().falling_piece().position().x(), x - 1);
    }

    #[test]
    fn test_frame_step_is_capped() {
        let mut screen = screen();
        screen.update(Duration::ZERO);
        screen.update(Duration::from_secs(60));
        assert_eq!(screen.session().stats().play_time(), MAX_FRAME_STEP);
    }
}
