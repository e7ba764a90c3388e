//! Game engine logic and state management.
//!
//! This module drives the core data structures through actual play:
//!
//! - [`GameSession`] - grid, active and next piece, gravity timer, state
//! - [`GameStats`] - score, cleared rows, locked pieces, play time
//! - [`PieceSource`] - where new piece kinds come from
//! - [`FrameClock`] - frame timestamps to per-tick elapsed time
//! - [`Snapshot`] - owned read-only view for renderers
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`]; the first piece spawns immediately
//! 2. The driver calls [`GameSession::tick`] every frame
//! 3. Input moves, rotates or drops the active piece
//! 4. A blocked downward step locks the piece, sweeps full rows and spawns
//!    the next piece
//! 5. Repeat until a spawn collides (game over), then optionally restart

pub use self::{clock::*, game_session::*, game_stats::*, piece_generator::*, snapshot::*};

mod clock;
mod game_session;
mod game_stats;
mod piece_generator;
mod snapshot;
