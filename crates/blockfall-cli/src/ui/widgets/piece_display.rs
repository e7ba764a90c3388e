use blockfall_engine::PieceShape;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{Tile, TileDisplay};

/// Draws a lone piece matrix centered in its area, used for the preview.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    shape: Option<PieceShape>,
    block: Option<BlockWidget<'a>>,
}

impl Default for PieceDisplay<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            shape: None,
            block: None,
        }
    }

    pub fn shape(self, shape: PieceShape) -> Self {
        Self {
            shape: Some(shape),
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
        4 * TileDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * TileDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(shape) = self.shape else {
            return;
        };
        let (width, height) = (u16::from(shape.width()), u16::from(shape.height()));
        let piece_area = area.centered(
            Constraint::Length(width * TileDisplay::width()),
            Constraint::Length(height * TileDisplay::height()),
        );

        let col_constraints = (0..width).map(|_| Constraint::Length(TileDisplay::width()));
        let row_constraints = (0..height).map(|_| Constraint::Length(TileDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let empty = TileDisplay::from_tile(Tile::Empty, false);
        let occupied = TileDisplay::from_tile(Tile::Piece(shape.kind()), false);
        for (y, row) in piece_area.layout_vec(&vertical).into_iter().enumerate() {
            for (x, cell) in row.layout_vec(&horizontal).into_iter().enumerate() {
                let tile = if shape.is_occupied(x, y) {
                    &occupied
                } else {
                    &empty
                };
                Widget::render(tile, cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::PieceKind;

    use super::*;

    #[test]
    fn test_default_is_empty_panel() {
        let panel = PieceDisplay::default();
        assert!(panel.shape.is_none());
        assert_eq!(panel.width(), 8);
        assert_eq!(panel.height(), 2);

        let panel = panel.shape(PieceKind::T.shape()).block(BlockWidget::bordered());
        assert_eq!(panel.shape, Some(PieceKind::T.shape()));
        assert_eq!((panel.width(), panel.height()), (10, 4));
    }
}
