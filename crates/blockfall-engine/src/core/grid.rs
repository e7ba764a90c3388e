use super::{collision, piece::Piece, piece::PieceKind};

/// Default number of columns.
pub const DEFAULT_WIDTH: usize = 10;
/// Default number of rows.
pub const DEFAULT_HEIGHT: usize = 20;

/// A single grid cell.
///
/// The numeric value of a cell is `0` when empty and the locked piece's
/// color id (1-7) otherwise, so every cell value stays within `[0, 7]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(kind) => kind.color_id(),
        }
    }

    /// Parses a cell value; `None` for anything outside `[0, 7]`.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        if value == 0 {
            return Some(Cell::Empty);
        }
        match PieceKind::from_color_id(value) {
            Some(kind) => Some(Cell::Filled(kind)),
            None => None,
        }
    }
}

/// The playfield: a `width × height` store of locked cells.
///
/// Rows are indexed top to bottom, columns left to right. Dimensions are
/// fixed at construction; [`Grid::clear`] resets the cells for a new game
/// without reallocating.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Cell, Grid, PieceKind};
///
/// let mut grid = Grid::new(10, 20);
/// for x in 0..10 {
///     grid.set_cell(x, 19, Cell::Filled(PieceKind::I));
/// }
///
/// assert_eq!(grid.sweep_full_rows(), 1);
/// assert!(grid.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    rows: Vec<GridRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GridRow {
    cells: Box<[Cell]>,
}

impl GridRow {
    fn empty(width: usize) -> Self {
        Self {
            cells: vec![Cell::Empty; width].into_boxed_slice(),
        }
    }

    fn is_filled(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Grid {
    /// Creates an all-empty grid.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid must not be empty");
        Self {
            width,
            rows: (0..height).map(|_| GridRow::empty(width)).collect(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Returns the cell at `(x, y)`, or `None` when the coordinate lies
    /// outside the grid on any side.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.cells.get(x).copied()
    }

    /// Overwrites a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y].cells[x] = cell;
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| &*row.cells)
    }

    /// The grid as a row-major matrix of cell values.
    #[must_use]
    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|c| c.value()).collect())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows().flatten().all(|c| c.is_empty())
    }

    /// Returns whether `piece` at its own origin overlaps a wall, the floor,
    /// or a filled cell.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        collision::collides(self, piece.shape(), piece.position())
    }

    /// Writes every filled cell of `piece` into the grid.
    ///
    /// The caller must check [`Grid::is_colliding`] first. Cells above the
    /// top row are dropped.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let cell = Cell::Filled(piece.kind());
        for (x, y) in piece.occupied_positions() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            debug_assert!(self.rows[y].cells[x].is_empty(), "merge over filled cell");
            self.rows[y].cells[x] = cell;
        }
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Remaining rows keep their relative order and settle at the bottom;
    /// the same number of empty rows appear at the top.
    pub fn sweep_full_rows(&mut self) -> usize {
        let height = self.rows.len();
        let mut count = 0;
        for y in (0..height).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows.swap(y, y + count);
            }
        }
        for row in &mut self.rows[..count] {
            row.clear();
        }
        count
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::Position;

    fn fill_row(grid: &mut Grid, y: usize, kind: PieceKind) {
        for x in 0..grid.width() {
            grid.set_cell(x, y, Cell::Filled(kind));
        }
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(10, 20);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 20);
        assert!(grid.is_empty());
        assert!(grid.rows().all(|row| row.len() == 10));
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let grid = Grid::new(10, 20);
        assert_eq!(grid.cell_at(0, 0), Some(Cell::Empty));
        assert_eq!(grid.cell_at(9, 19), Some(Cell::Empty));
        assert_eq!(grid.cell_at(-1, 0), None);
        assert_eq!(grid.cell_at(10, 0), None);
        assert_eq!(grid.cell_at(0, -1), None);
        assert_eq!(grid.cell_at(0, 20), None);
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(Cell::Empty.value(), 0);
        assert_eq!(Cell::Filled(PieceKind::I).value(), 1);
        assert_eq!(Cell::Filled(PieceKind::Z).value(), 7);
        assert_eq!(Cell::from_value(4), Some(Cell::Filled(PieceKind::O)));
        assert_eq!(Cell::from_value(0), Some(Cell::Empty));
        assert_eq!(Cell::from_value(8), None);
    }

    #[test]
    fn test_fill_piece_writes_color_ids() {
        let mut grid = Grid::new(10, 20);
        let piece = Piece::new(PieceKind::T.shape(), Position::new(0, 18));
        grid.fill_piece(&piece);

        let matrix = grid.to_matrix();
        assert_eq!(&matrix[18][..3], &[0, 6, 0]);
        assert_eq!(&matrix[19][..3], &[6, 6, 6]);
        assert!(matrix.iter().flatten().all(|v| *v <= 7));
    }

    #[test]
    fn test_fill_piece_skips_cells_above_top() {
        let mut grid = Grid::new(10, 20);
        let piece = Piece::new(PieceKind::T.shape(), Position::new(0, -1));
        grid.fill_piece(&piece);
        assert_eq!(&grid.to_matrix()[0][..3], &[6, 6, 6]);
    }

    #[test]
    fn test_sweep_without_full_rows_changes_nothing() {
        let mut grid = Grid::new(10, 20);
        for x in 0..9 {
            grid.set_cell(x, 19, Cell::Filled(PieceKind::L));
        }
        grid.set_cell(3, 10, Cell::Filled(PieceKind::S));
        let before = grid.clone();

        assert_eq!(grid.sweep_full_rows(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_sweep_bottom_row() {
        let mut grid = Grid::new(10, 20);
        fill_row(&mut grid, 19, PieceKind::I);
        grid.set_cell(2, 18, Cell::Filled(PieceKind::T));

        assert_eq!(grid.sweep_full_rows(), 1);
        assert!(grid.rows().next().unwrap().iter().all(|c| c.is_empty()));
        assert_eq!(grid.cell_at(2, 19), Some(Cell::Filled(PieceKind::T)));
        assert_eq!(grid.cell_at(2, 18), Some(Cell::Empty));
    }

    #[test]
    fn test_sweep_preserves_order_of_kept_rows() {
        let mut grid = Grid::new(4, 6);
        grid.set_cell(0, 1, Cell::Filled(PieceKind::J));
        fill_row(&mut grid, 2, PieceKind::I);
        grid.set_cell(1, 3, Cell::Filled(PieceKind::L));
        fill_row(&mut grid, 4, PieceKind::I);
        grid.set_cell(2, 5, Cell::Filled(PieceKind::S));

        assert_eq!(grid.sweep_full_rows(), 2);
        assert_eq!(
            grid.to_matrix(),
            vec![
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![2, 0, 0, 0],
                vec![0, 3, 0, 0],
                vec![0, 0, 5, 0],
            ]
        );
    }

    #[test]
    fn test_sweep_includes_top_row() {
        let mut grid = Grid::new(4, 4);
        fill_row(&mut grid, 0, PieceKind::O);
        assert_eq!(grid.sweep_full_rows(), 1);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_sweep_all_rows() {
        let mut grid = Grid::new(5, 8);
        for y in 0..8 {
            fill_row(&mut grid, y, PieceKind::Z);
        }
        assert_eq!(grid.sweep_full_rows(), 8);
        assert!(grid.is_empty());
        assert_eq!(grid.height(), 8);
    }

    #[test]
    fn test_clear() {
        let mut grid = Grid::new(10, 20);
        fill_row(&mut grid, 5, PieceKind::T);
        grid.clear();
        assert!(grid.is_empty());
    }
}
