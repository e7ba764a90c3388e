use serde::Serialize;

use crate::core::{Piece, PieceKind, PieceShape};

use super::{
    game_session::{GameSession, SessionState},
    game_stats::GameStats,
};

/// An owned, read-only copy of a session for renderers and recordings.
///
/// Matrices hold cell values: `0` for empty, `1..=7` for a piece color id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub grid: Vec<Vec<u8>>,
    pub active: PieceSnapshot,
    pub next: PieceSnapshot,
    pub score: usize,
    pub state: SessionState,
    pub stats: GameStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub matrix: Vec<Vec<u8>>,
    /// Board-relative origin; `None` for the on-deck piece.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<(i32, i32)>,
}

impl PieceSnapshot {
    fn placed(piece: &Piece) -> Self {
        let position = piece.position();
        Self {
            kind: piece.kind(),
            matrix: piece.shape().to_matrix(),
            origin: Some((position.x(), position.y())),
        }
    }

    fn on_deck(shape: &PieceShape) -> Self {
        Self {
            kind: shape.kind(),
            matrix: shape.to_matrix(),
            origin: None,
        }
    }
}

impl Snapshot {
    pub(crate) fn new<S>(session: &GameSession<S>) -> Self
    where
        S: super::PieceSource,
    {
        Self {
            grid: session.grid().to_matrix(),
            active: PieceSnapshot::placed(session.falling_piece()),
            next: PieceSnapshot::on_deck(&session.next_shape()),
            score: session.score(),
            state: session.session_state(),
            stats: session.stats().clone(),
        }
    }

    /// The grid with the active piece painted over it.
    #[must_use]
    pub fn composed_grid(&self) -> Vec<Vec<u8>> {
        let mut grid = self.grid.clone();
        let Some((ox, oy)) = self.active.origin else {
            return grid;
        };
        for (dy, row) in self.active.matrix.iter().enumerate() {
            for (dx, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let x = usize::try_from(ox + i32::try_from(dx).unwrap_or(i32::MAX));
                let y = usize::try_from(oy + i32::try_from(dy).unwrap_or(i32::MAX));
                if let (Ok(x), Ok(y)) = (x, y)
                    && let Some(cell) = grid.get_mut(y).and_then(|r| r.get_mut(x))
                {
                    *cell = value;
                }
            }
        }
        grid
    }
}
