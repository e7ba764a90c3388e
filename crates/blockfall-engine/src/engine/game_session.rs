use std::{collections::VecDeque, time::Duration};

use serde::Serialize;

use crate::{
    CommandError,
    config::{ConfigError, GameConfig},
    core::{Grid, Piece, PieceKind, PieceShape},
};

use super::{
    game_stats::GameStats,
    piece_generator::{PieceSource, RandomPieceSource},
    snapshot::Snapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Input commands accepted by a [`GameSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    TogglePause,
    Restart,
}

/// What a downward step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved one row down.
    Moved,
    /// The piece could not move and was locked into the grid.
    Locked(LockReport),
}

/// Result of locking a piece: the sweep that followed and the next spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    pub cleared_rows: usize,
    pub points: usize,
    /// The piece spawned after the sweep collided and ended the session.
    pub topped_out: bool,
}

/// A game in progress: grid, active and next piece, score, and gravity timer.
///
/// The session is owned by whatever drives it. Each frame the driver calls
/// [`tick`](Self::tick) with the elapsed time; input arrives either as direct
/// calls (`try_move_left`, `try_rotate`, ...) or as queued [`Command`]s that
/// the next tick applies before gravity runs.
///
/// A piece moves through `spawn → fall → lock → sweep → spawn`. The session
/// ends (state [`SessionState::GameOver`]) when a freshly spawned piece
/// collides with locked cells; only [`restart`](Self::restart) is accepted
/// after that.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GameConfig, GameSession, PieceKind, SequencePieceSource};
///
/// let source = SequencePieceSource::new([PieceKind::O]);
/// let mut session = GameSession::with_source(GameConfig::default(), source).unwrap();
///
/// session.try_move_left().unwrap();
/// assert_eq!(session.falling_piece().position().x(), 3);
///
/// // Gravity fires once the accumulated time exceeds the drop interval.
/// assert!(session.tick(Duration::from_millis(1000)).is_none());
/// assert!(session.tick(Duration::from_millis(1)).is_some());
/// assert_eq!(session.falling_piece().position().y(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession<S = RandomPieceSource> {
    config: GameConfig,
    grid: Grid,
    falling_piece: Piece,
    next_kind: PieceKind,
    source: S,
    stats: GameStats,
    session_state: SessionState,
    drop_accumulator: Duration,
    pending: VecDeque<Command>,
}

impl GameSession {
    /// Starts a session with uniformly random pieces.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_source(config, RandomPieceSource::from_os_rng())
    }
}

impl<S> GameSession<S>
where
    S: PieceSource,
{
    /// Starts a session on an empty grid with pieces from `source`.
    pub fn with_source(config: GameConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height);
        Self::with_grid(config, grid, source)
    }

    /// Starts a session on a prepared grid.
    ///
    /// The first piece spawns immediately, so a grid whose top rows are
    /// already occupied yields a session that is over from the start.
    pub fn with_grid(config: GameConfig, grid: Grid, mut source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        if (grid.width(), grid.height()) != (config.width, config.height) {
            return Err(ConfigError::GridSizeMismatch {
                width: config.width,
                height: config.height,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        let first = source.next_kind();
        let mut this = Self {
            config,
            falling_piece: Piece::spawn(first, grid.width()),
            grid,
            next_kind: first,
            source,
            stats: GameStats::new(),
            session_state: SessionState::Playing,
            drop_accumulator: Duration::ZERO,
            pending: VecDeque::new(),
        };
        this.spawn();
        Ok(this)
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    #[must_use]
    pub fn next_kind(&self) -> PieceKind {
        self.next_kind
    }

    /// The on-deck piece in spawn orientation.
    #[must_use]
    pub fn next_shape(&self) -> PieceShape {
        self.next_kind.shape()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Time accumulated toward the next gravity step.
    #[must_use]
    pub fn drop_accumulator(&self) -> Duration {
        self.drop_accumulator
    }

    /// Where the active piece would lock if dropped straight down.
    #[must_use]
    pub fn simulate_drop_position(&self) -> Piece {
        self.falling_piece.simulate_drop_position(&self.grid)
    }

    /// An owned copy of everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self)
    }

    /// Queues a command for the next [`tick`](Self::tick).
    pub fn queue(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Applies a command immediately.
    pub fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::MoveLeft => self.try_move_left(),
            Command::MoveRight => self.try_move_right(),
            Command::SoftDrop => self.try_soft_drop().map(|_| ()),
            Command::Rotate => self.try_rotate(),
            Command::TogglePause => {
                self.toggle_pause();
                Ok(())
            }
            Command::Restart => {
                self.restart();
                Ok(())
            }
        }
    }

    /// Advances the session by `elapsed`.
    ///
    /// Queued commands are applied first, so gravity in the same frame sees
    /// their result. Then the elapsed time is added to the gravity
    /// accumulator; once it exceeds the drop interval the active piece steps
    /// down one row (locking it if blocked) and the accumulator restarts from
    /// zero. At most one gravity step happens per tick.
    ///
    /// Returns the gravity step's outcome, if one ran.
    pub fn tick(&mut self, elapsed: Duration) -> Option<DropOutcome> {
        while let Some(command) = self.pending.pop_front() {
            if let Err(error) = self.apply(command) {
                tracing::trace!(?command, %error, "queued command rejected");
            }
        }

        if !self.session_state.is_playing() {
            return None;
        }
        self.stats.add_play_time(elapsed);
        self.drop_accumulator = self.drop_accumulator.saturating_add(elapsed);
        if self.drop_accumulator <= self.config.drop_interval() {
            return None;
        }
        self.drop_accumulator = Duration::ZERO;
        Some(self.step_down())
    }

    pub fn try_move_left(&mut self) -> Result<(), CommandError> {
        self.ensure_playing()?;
        let piece = self.falling_piece.left();
        self.set_falling_piece(piece)
    }

    pub fn try_move_right(&mut self) -> Result<(), CommandError> {
        self.ensure_playing()?;
        let piece = self.falling_piece.right();
        self.set_falling_piece(piece)
    }

    /// Rotates the active piece, kicking it sideways if needed.
    ///
    /// On failure the piece keeps its previous matrix and position.
    pub fn try_rotate(&mut self) -> Result<(), CommandError> {
        self.ensure_playing()?;
        let piece = self
            .falling_piece
            .kick_rotated(&self.grid)
            .ok_or(CommandError::Collision)?;
        self.falling_piece = piece;
        Ok(())
    }

    /// Moves the active piece down one row now, locking it if it is blocked,
    /// and restarts the gravity timer.
    pub fn try_soft_drop(&mut self) -> Result<DropOutcome, CommandError> {
        self.ensure_playing()?;
        self.drop_accumulator = Duration::ZERO;
        Ok(self.step_down())
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Clears the grid and score and starts over with fresh pieces.
    ///
    /// Commands still queued behind a restart apply to the new game.
    pub fn restart(&mut self) {
        tracing::info!(score = self.stats.score(), "restarting session");
        self.grid.clear();
        self.stats = GameStats::new();
        self.drop_accumulator = Duration::ZERO;
        self.session_state = SessionState::Playing;
        self.next_kind = self.source.next_kind();
        self.spawn();
    }

    fn ensure_playing(&self) -> Result<(), CommandError> {
        match self.session_state {
            SessionState::Playing => Ok(()),
            SessionState::Paused => Err(CommandError::Paused),
            SessionState::GameOver => Err(CommandError::GameOver),
        }
    }

    fn set_falling_piece(&mut self, piece: Piece) -> Result<(), CommandError> {
        if self.grid.is_colliding(&piece) {
            return Err(CommandError::Collision);
        }
        self.falling_piece = piece;
        Ok(())
    }

    fn step_down(&mut self) -> DropOutcome {
        if self.set_falling_piece(self.falling_piece.down()).is_ok() {
            return DropOutcome::Moved;
        }
        DropOutcome::Locked(self.lock_and_sweep())
    }

    fn lock_and_sweep(&mut self) -> LockReport {
        self.grid.fill_piece(&self.falling_piece);
        let cleared_rows = self.grid.sweep_full_rows();
        let points = self.stats.complete_piece_drop(cleared_rows);
        tracing::debug!(
            kind = ?self.falling_piece.kind(),
            x = self.falling_piece.position().x(),
            y = self.falling_piece.position().y(),
            cleared_rows,
            points,
            "piece locked"
        );
        self.spawn();
        LockReport {
            cleared_rows,
            points,
            topped_out: self.session_state.is_game_over(),
        }
    }

    /// Promotes the on-deck piece to active and draws a new on-deck piece.
    fn spawn(&mut self) {
        self.falling_piece = Piece::spawn(self.next_kind, self.grid.width());
        self.next_kind = self.source.next_kind();
        if self.grid.is_colliding(&self.falling_piece) {
            tracing::info!(
                score = self.stats.score(),
                pieces = self.stats.completed_pieces(),
                "game over"
            );
            self.session_state = SessionState::GameOver;
            self.pending.clear();
            return;
        }
        tracing::debug!(kind = ?self.falling_piece.kind(), next = ?self.next_kind, "piece spawned");
    }
}
