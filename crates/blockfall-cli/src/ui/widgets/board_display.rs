use std::iter;

use blockfall_engine::{Grid, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{Tile, TileDisplay};

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn falling_piece(self, piece: Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        super::cells_to_u16(self.grid.width()) * TileDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells_to_u16(self.grid.height()) * TileDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Locked cells with the ghost and then the falling piece drawn over
    /// them. Cells above the top row are not shown.
    fn tiles(&self) -> Vec<Vec<Tile>> {
        let mut tiles: Vec<Vec<Tile>> = self
            .grid
            .rows()
            .map(|row| row.iter().copied().map(Tile::from).collect())
            .collect();
        let overlays = [
            self.ghost.map(|piece| (piece, Tile::Ghost)),
            self.falling_piece
                .map(|piece| (piece, Tile::Piece(piece.kind()))),
        ];
        for (piece, tile) in overlays.into_iter().flatten() {
            for (x, y) in piece.occupied_positions() {
                let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                    continue;
                };
                if let Some(slot) = tiles.get_mut(y).and_then(|row| row.get_mut(x)) {
                    *slot = tile;
                }
            }
        }
        tiles
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.grid.width()).map(|_| Constraint::Length(TileDisplay::width()));
        let row_constraints =
            (0..self.grid.height()).map(|_| Constraint::Length(TileDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.tiles()) {
            for (grid_cell, tile) in iter::zip(grid_row, row) {
                TileDisplay::from_tile(tile, true).render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Cell, PieceKind, Position};

    use super::*;

    #[test]
    fn test_tiles_overlay_order() {
        let mut grid = Grid::new(10, 20);
        grid.set_cell(0, 19, Cell::Filled(PieceKind::L));
        let piece = Piece::new(PieceKind::O.shape(), Position::new(4, 0));
        let ghost = Piece::new(PieceKind::O.shape(), Position::new(4, 18));

        let tiles = BoardDisplay::new(&grid)
            .falling_piece(piece)
            .ghost(ghost)
            .tiles();

        assert_eq!(tiles[19][0], Tile::Piece(PieceKind::L));
        assert_eq!(tiles[0][4], Tile::Piece(PieceKind::O));
        assert_eq!(tiles[1][5], Tile::Piece(PieceKind::O));
        assert_eq!(tiles[18][4], Tile::Ghost);
        assert_eq!(tiles[19][5], Tile::Ghost);
        assert_eq!(tiles[10][4], Tile::Empty);
    }

    #[test]
    fn test_tiles_hide_cells_above_top() {
        let grid = Grid::new(10, 20);
        let piece = Piece::new(PieceKind::I.shape().rotated(), Position::new(2, -2));

        let tiles = BoardDisplay::new(&grid).falling_piece(piece).tiles();

        let shown = tiles.iter().flatten().filter(|t| **t != Tile::Empty).count();
        assert_eq!(shown, 2);
    }

    #[test]
    fn test_size_follows_grid() {
        let grid = Grid::new(8, 16);
        let board = BoardDisplay::new(&grid).block(BlockWidget::bordered());
        assert_eq!(board.width(), 8 * 2 + 2);
        assert_eq!(board.height(), 16 + 2);
    }
}
