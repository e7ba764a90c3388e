use std::iter;

use blockfall_engine::GameStats;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

#[derive(Debug)]
pub struct SessionStatsDisplay<'a> {
    stats: &'a GameStats,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(stats: &'a GameStats) -> Self {
        Self { stats, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells_to_u16(ROWS.len()) + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(fn(&GameStats) -> String),
    LabelValue(&'static str, fn(&GameStats) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(|stats| stats.score().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(|stats| format_play_time(stats.play_time().as_millis())),
    Row::Empty,
    Row::LabelValue("PIECES:", |stats| stats.completed_pieces().to_string()),
    Row::LabelValue("LINES:", |stats| stats.total_cleared_lines().to_string()),
    Row::Empty,
    Row::LabelValue("SINGLES:", |stats| {
        stats.line_cleared_counter()[1].to_string()
    }),
    Row::LabelValue("DOUBLES:", |stats| {
        stats.line_cleared_counter()[2].to_string()
    }),
    Row::LabelValue("TRIPLES:", |stats| {
        stats.line_cleared_counter()[3].to_string()
    }),
    Row::LabelValue("QUADS:", |stats| {
        stats.line_cleared_counter()[4].to_string()
    }),
];

/// `m:ss.cc`
fn format_play_time(millis: u128) -> String {
    let secs = millis / 1000;
    format!("{}:{:0>2}.{:0>2}", secs / 60, secs % 60, (millis % 1000) / 10)
}

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.stats), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.stats), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_size() {
        let stats = GameStats::new();
        let display = SessionStatsDisplay::new(&stats).block(BlockWidget::bordered());
        assert!(format!("{display:?}").starts_with("SessionStatsDisplay"));
        assert_eq!(display.width(), 22);
        assert_eq!(display.height(), 14);
    }

    #[test]
    fn test_format_play_time() {
        assert_eq!(format_play_time(0), "0:00.00");
        assert_eq!(format_play_time(61_230), "1:01.23");
        assert_eq!(format_play_time(600_000), "10:00.00");
    }
}
