use super::{
    grid::Grid,
    piece::{PieceShape, Position},
};

/// Tests `shape` placed at `origin` against `grid`.
///
/// A filled cell collides when it lies left of column 0, right of the last
/// column, at or below the floor, or on a filled grid cell. Cells above the
/// top row never collide, so pieces can rotate and spawn against the ceiling.
///
/// Every placement check in the engine goes through this predicate: moves,
/// gravity, rotation kicks and spawning.
///
/// ```
/// use blockfall_engine::{Grid, PieceKind, Position, collides};
///
/// let grid = Grid::new(10, 20);
/// let shape = PieceKind::O.shape();
/// assert!(!collides(&grid, &shape, Position::new(8, 18)));
/// assert!(collides(&grid, &shape, Position::new(9, 18)));
/// assert!(collides(&grid, &shape, Position::new(8, 19)));
/// assert!(!collides(&grid, &shape, Position::new(0, -1)));
/// ```
#[must_use]
pub fn collides(grid: &Grid, shape: &PieceShape, origin: Position) -> bool {
    shape.occupied_offsets().any(|(dx, dy)| {
        let x = origin.x() + dx;
        let y = origin.y() + dy;
        if y < 0 {
            // Above the ceiling only the side walls apply.
            return x < 0 || usize::try_from(x).is_ok_and(|x| x >= grid.width());
        }
        grid.cell_at(x, y).is_none_or(|cell| !cell.is_empty())
    })
}
