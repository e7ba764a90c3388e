use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{collision, grid::Grid};

/// Largest side of any piece matrix, in cells.
pub const MAX_SHAPE_SIZE: usize = 4;

/// Kick offsets tried by [`Piece::kick_rotated`] never exceed the widest shape.
const MAX_KICK_CANDIDATES: usize = 2 * MAX_SHAPE_SIZE + 1;

/// A falling piece: a shape matrix anchored at a board-relative origin.
///
/// Pieces are values. Movement and rotation return new `Piece` instances and
/// never touch the grid; the session decides whether to commit them.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Grid, Piece, PieceKind};
///
/// let grid = Grid::new(10, 20);
/// let piece = Piece::spawn(PieceKind::T, grid.width());
/// assert_eq!((piece.position().x(), piece.position().y()), (4, 0));
///
/// let moved = piece.left();
/// assert!(!grid.is_colliding(&moved));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: Position,
    shape: PieceShape,
}

impl Piece {
    #[must_use]
    pub const fn new(shape: PieceShape, position: Position) -> Self {
        Self { position, shape }
    }

    /// Creates a piece in its template orientation at the spawn position.
    ///
    /// The piece is centered horizontally with floor division on both the
    /// grid width and the shape width, and placed on the top row.
    #[must_use]
    pub fn spawn(kind: PieceKind, grid_width: usize) -> Self {
        let shape = kind.shape();
        let half_grid = i32::try_from(grid_width / 2).unwrap_or(i32::MAX);
        let half_shape = i32::from(shape.width()) / 2;
        Self::new(shape, Position::new(half_grid - half_shape, 0))
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn shape(&self) -> &PieceShape {
        &self.shape
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.shape.kind
    }

    /// Absolute grid coordinates of every filled cell of the piece.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_offsets()
            .map(move |(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    #[must_use]
    pub const fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.shape, self.position.offset(dx, dy))
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    /// Same origin, shape turned a quarter.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        Self::new(self.shape.rotated(), self.position)
    }

    /// Rotates the piece, searching for a horizontal kick if the plain
    /// rotation collides.
    ///
    /// Offsets are tried in the order `0, +1, -1, +2, -2, ...` up to the
    /// rotated shape's width. The first collision-free placement wins.
    /// Returns `None` when every candidate collides, leaving the caller's
    /// piece untouched.
    #[must_use]
    pub fn kick_rotated(&self, grid: &Grid) -> Option<Self> {
        let rotated = self.rotated();
        kick_offsets(rotated.shape.width())
            .into_iter()
            .map(|dx| rotated.shifted(dx, 0))
            .find(|candidate| !grid.is_colliding(candidate))
    }

    /// Returns where this piece would lock if it fell straight down.
    #[must_use]
    pub fn simulate_drop_position(&self, grid: &Grid) -> Self {
        let mut dropped = *self;
        loop {
            let next = dropped.down();
            if collision::collides(grid, &next.shape, next.position) {
                return dropped;
            }
            dropped = next;
        }
    }
}

/// Kick offsets in search order, bounded by `width` on both sides.
fn kick_offsets(width: u8) -> ArrayVec<i32, MAX_KICK_CANDIDATES> {
    let mut offsets = ArrayVec::new();
    offsets.push(0);
    for step in 1..=i32::from(width) {
        offsets.push(step);
        offsets.push(-step);
    }
    offsets
}

/// Board-relative origin of a piece matrix.
///
/// `x` grows rightward and `y` grows downward; `(0, 0)` is the top-left
/// cell of the grid. Coordinates may be negative while a candidate placement
/// is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The seven shape classes.
///
/// Discriminants are the color ids stored in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 1,
    J = 2,
    L = 3,
    O = 4,
    S = 5,
    T = 6,
    Z = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::J,
        Self::L,
        Self::O,
        Self::S,
        Self::T,
        Self::Z,
    ];

    /// Color id written into the grid when a piece of this kind locks (1-7).
    #[must_use]
    pub const fn color_id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_color_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::I),
            2 => Some(Self::J),
            3 => Some(Self::L),
            4 => Some(Self::O),
            5 => Some(Self::S),
            6 => Some(Self::T),
            7 => Some(Self::Z),
            _ => None,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::from_char('Z'), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::J => 'J',
            Self::L => 'L',
            Self::O => 'O',
            Self::S => 'S',
            Self::T => 'T',
            Self::Z => 'Z',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::I),
            'J' => Some(Self::J),
            'L' => Some(Self::L),
            'O' => Some(Self::O),
            'S' => Some(Self::S),
            'T' => Some(Self::T),
            'Z' => Some(Self::Z),
            _ => None,
        }
    }

    /// The template matrix of this kind, in spawn orientation.
    #[must_use]
    pub const fn shape(self) -> PieceShape {
        SHAPE_TEMPLATES[self as usize - 1]
    }
}

/// A piece matrix of up to 4×4 cells, all filled cells sharing one kind.
///
/// Only the top-left `width × height` corner of `cells` is meaningful; the
/// rest stays empty so equality compares content only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    kind: PieceKind,
    width: u8,
    height: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl PieceShape {
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u8 {
        self.height
    }

    #[must_use]
    pub const fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width as usize && y < self.height as usize && self.cells[y][x]
    }

    /// Cell value at `(x, y)`: the kind's color id, or `0` when empty.
    #[must_use]
    pub const fn value_at(&self, x: usize, y: usize) -> u8 {
        if self.is_occupied(x, y) {
            self.kind.color_id()
        } else {
            0
        }
    }

    /// Offsets of filled cells relative to the shape origin.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height).flat_map(move |dy| {
            (0..self.width).filter_map(move |dx| {
                self.cells[usize::from(dy)][usize::from(dx)]
                    .then_some((i32::from(dx), i32::from(dy)))
            })
        })
    }

    /// The shape as a row-major matrix of cell values.
    #[must_use]
    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        (0..usize::from(self.height))
            .map(|y| {
                (0..usize::from(self.width))
                    .map(|x| self.value_at(x, y))
                    .collect()
            })
            .collect()
    }

    /// Turns the matrix a quarter by transposing it and reversing the row
    /// order. Four turns give back the original matrix.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < w {
            let mut x = 0;
            while x < h {
                cells[y][x] = self.cells[x][w - 1 - y];
                x += 1;
            }
            y += 1;
        }
        Self {
            kind: self.kind,
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

#[expect(clippy::cast_possible_truncation)]
const fn template<const W: usize, const H: usize>(kind: PieceKind, rows: [[u8; W]; H]) -> PieceShape {
    assert!(W <= MAX_SHAPE_SIZE && H <= MAX_SHAPE_SIZE);
    let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
    let mut y = 0;
    while y < H {
        let mut x = 0;
        while x < W {
            cells[y][x] = rows[y][x] != 0;
            x += 1;
        }
        y += 1;
    }
    PieceShape {
        kind,
        width: W as u8,
        height: H as u8,
        cells,
    }
}

// Indexed by color id - 1.
const SHAPE_TEMPLATES: [PieceShape; PieceKind::LEN] = [
    template(PieceKind::I, [[1, 1, 1, 1]]),
    template(PieceKind::J, [[2, 0, 0], [2, 2, 2]]),
    template(PieceKind::L, [[0, 0, 3], [3, 3, 3]]),
    template(PieceKind::O, [[4, 4], [4, 4]]),
    template(PieceKind::S, [[0, 5, 5], [5, 5, 0]]),
    template(PieceKind::T, [[0, 6, 0], [6, 6, 6]]),
    template(PieceKind::Z, [[7, 7, 0], [0, 7, 7]]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Cell;

    #[test]
    fn test_templates_match_color_ids() {
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            assert_eq!(shape.kind(), kind);
            for row in shape.to_matrix() {
                for value in row {
                    assert!(value == 0 || value == kind.color_id());
                }
            }
            assert_eq!(shape.occupied_offsets().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_template_matrices() {
        assert_eq!(PieceKind::I.shape().to_matrix(), vec![vec![1, 1, 1, 1]]);
        assert_eq!(
            PieceKind::T.shape().to_matrix(),
            vec![vec![0, 6, 0], vec![6, 6, 6]]
        );
        assert_eq!(
            PieceKind::Z.shape().to_matrix(),
            vec![vec![7, 7, 0], vec![0, 7, 7]]
        );
    }

    #[test]
    fn test_rotation_transposes_and_reverses_rows() {
        // [0 6 0]      [0 6]
        // [6 6 6]  ->  [6 6]
        //              [0 6]
        let rotated = PieceKind::T.shape().rotated();
        assert_eq!(rotated.to_matrix(), vec![vec![0, 6], vec![6, 6], vec![0, 6]]);

        let rotated = PieceKind::I.shape().rotated();
        assert_eq!(rotated.width(), 1);
        assert_eq!(rotated.height(), 4);
    }

    #[test]
    fn test_four_rotations_restore_every_shape() {
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            let back = shape.rotated().rotated().rotated().rotated();
            assert_eq!(back, shape, "{kind:?}");
            assert_eq!(back.to_matrix(), shape.to_matrix());
        }
    }

    #[test]
    fn test_spawn_is_centered() {
        assert_eq!(Piece::spawn(PieceKind::O, 10).position(), Position::new(4, 0));
        assert_eq!(Piece::spawn(PieceKind::I, 10).position(), Position::new(3, 0));
        assert_eq!(Piece::spawn(PieceKind::T, 10).position(), Position::new(4, 0));
        assert_eq!(Piece::spawn(PieceKind::T, 7).position(), Position::new(2, 0));
    }

    #[test]
    fn test_kick_offsets_order() {
        assert_eq!(kick_offsets(1).as_slice(), &[0, 1, -1]);
        assert_eq!(kick_offsets(3).as_slice(), &[0, 1, -1, 2, -2, 3, -3]);
        assert_eq!(kick_offsets(4).len(), MAX_KICK_CANDIDATES);
    }

    #[test]
    fn test_kick_rotated_without_obstacles_keeps_origin() {
        let grid = Grid::new(10, 20);
        let piece = Piece::new(PieceKind::T.shape(), Position::new(4, 5));
        let rotated = piece.kick_rotated(&grid).unwrap();
        assert_eq!(rotated.position(), piece.position());
        assert_eq!(rotated.shape(), &piece.shape().rotated());
    }

    #[test]
    fn test_kick_rotated_off_the_right_wall() {
        let grid = Grid::new(10, 20);
        // Vertical I in the rightmost column; rotating makes it 4 wide.
        let piece = Piece::new(PieceKind::I.shape().rotated(), Position::new(9, 5));
        let rotated = piece.kick_rotated(&grid).unwrap();
        assert_eq!(rotated.shape().width(), 4);
        assert_eq!(rotated.position(), Position::new(6, 5));
        assert!(!grid.is_colliding(&rotated));
    }

    #[test]
    fn test_kick_rotated_prefers_positive_offset() {
        let mut grid = Grid::new(10, 20);
        // Only the un-kicked rotation reaches (5, 7).
        grid.set_cell(5, 7, Cell::Filled(PieceKind::O));
        let piece = Piece::new(PieceKind::T.shape(), Position::new(4, 5));
        assert!(!grid.is_colliding(&piece));
        assert!(grid.is_colliding(&piece.rotated()));

        let rotated = piece.kick_rotated(&grid).unwrap();
        assert_eq!(rotated.position(), Position::new(5, 5));
    }

    #[test]
    fn test_kick_rotated_gives_up_when_every_offset_collides() {
        let mut grid = Grid::new(10, 20);
        for x in 0..10 {
            grid.set_cell(x, 11, Cell::Filled(PieceKind::J));
        }
        let piece = Piece::new(PieceKind::I.shape(), Position::new(3, 10));
        assert!(!grid.is_colliding(&piece));
        assert!(piece.kick_rotated(&grid).is_none());
    }

    #[test]
    fn test_simulate_drop_position_on_empty_grid() {
        let grid = Grid::new(10, 20);
        let piece = Piece::spawn(PieceKind::O, grid.width());
        let dropped = piece.simulate_drop_position(&grid);
        assert_eq!(dropped.position(), Position::new(4, 18));
    }

    #[test]
    fn test_piece_kind_color_ids_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_color_id(kind.color_id()), Some(kind));
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_color_id(0), None);
        assert_eq!(PieceKind::from_color_id(8), None);
    }

    #[test]
    fn test_piece_kind_distribution_covers_all_kinds() {
        use rand::SeedableRng as _;

        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(7);
        let mut counts = [0_usize; PieceKind::LEN];
        for _ in 0..7000 {
            let kind: PieceKind = rng.random();
            counts[kind as usize - 1] += 1;
        }
        for count in counts {
            assert!((700..1300).contains(&count), "{counts:?}");
        }
    }
}
