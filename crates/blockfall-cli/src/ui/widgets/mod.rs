use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, piece_display::*, session_display::*, session_stats_display::*,
    tile_display::*,
};

mod board_display;
mod piece_display;
mod session_display;
mod session_stats_display;
mod tile_display;

mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use blockfall_engine::PieceKind;
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::WHITE, color::BLACK);

    /// Fill style for the cells of `kind`, keyed by its color id.
    pub const fn piece(kind: PieceKind) -> Style {
        match kind {
            PieceKind::I => bg_only(color::CYAN),
            PieceKind::J => bg_only(color::BLUE),
            PieceKind::L => bg_only(color::ORANGE),
            PieceKind::O => bg_only(color::YELLOW),
            PieceKind::S => bg_only(color::GREEN),
            PieceKind::T => bg_only(color::MAGENTA),
            PieceKind::Z => bg_only(color::RED),
        }
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}

/// Clamps a cell count to a terminal dimension.
fn cells_to_u16(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX)
}
