use std::time::Duration;

use serde::Serialize;

/// Points for the first row removed by a sweep; each further row in the
/// same sweep is worth double the previous one.
pub const ROW_CLEAR_BASE_POINTS: usize = 10;

/// Points awarded for a single sweep removing `rows` rows.
///
/// The multiplier starts at 1 for every sweep and doubles after each row, so
/// one to four rows are worth 10, 30, 70 and 150 points. The total
/// saturates at `usize::MAX` on very tall grids.
///
/// ```
/// use blockfall_engine::sweep_points;
///
/// assert_eq!(sweep_points(0), 0);
/// assert_eq!(sweep_points(1), 10);
/// assert_eq!(sweep_points(4), 10 + 20 + 40 + 80);
/// ```
#[must_use]
pub const fn sweep_points(rows: usize) -> usize {
    let mut points: usize = 0;
    let mut multiplier = 1;
    let mut i = 0;
    while i < rows {
        points = points.saturating_add(ROW_CLEAR_BASE_POINTS.saturating_mul(multiplier));
        multiplier = multiplier.saturating_mul(2);
        i += 1;
    }
    points
}

/// Game statistics tracking score, rows cleared, and piece count.
///
/// - **Score**: points earned from sweeps (see [`sweep_points`])
/// - **Completed pieces**: total number of pieces locked
/// - **Row clear distribution**: count of sweeps by number of rows removed
/// - **Play time**: elapsed time fed to the session while playing
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
/// stats.complete_piece_drop(1);
///
/// assert_eq!(stats.score(), 160);
/// assert_eq!(stats.total_cleared_lines(), 5);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
    #[serde(serialize_with = "serialize_millis")]
    play_time: Duration,
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u128(duration.as_millis())
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
            play_time: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of sweeps by rows removed.
    ///
    /// Index `n` counts locks that removed `n` rows; index 4 also absorbs the
    /// (unreachable with standard shapes) larger sweeps.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    #[must_use]
    pub const fn play_time(&self) -> Duration {
        self.play_time
    }

    /// Records a lock that removed `cleared_lines` rows and returns the
    /// points awarded for it.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) -> usize {
        let points = sweep_points(cleared_lines);
        self.completed_pieces += 1;
        self.total_cleared_lines = self.total_cleared_lines.saturating_add(cleared_lines);
        let bucket = if cleared_lines < self.line_cleared_counter.len() {
            cleared_lines
        } else {
            self.line_cleared_counter.len() - 1
        };
        self.line_cleared_counter[bucket] += 1;
        self.score = self.score.saturating_add(points);
        points
    }

    pub fn add_play_time(&mut self, elapsed: Duration) {
        self.play_time = self.play_time.saturating_add(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_points_doubles_per_row() {
        assert_eq!(sweep_points(2), 30);
        assert_eq!(sweep_points(3), 70);
        assert_eq!(sweep_points(4), 150);
    }

    #[test]
    fn test_sweep_points_saturate_on_huge_sweeps() {
        let rows = usize::BITS as usize;
        assert_eq!(sweep_points(rows), usize::MAX);
        assert_eq!(sweep_points(rows * 4), usize::MAX);
        for rows in 1..=rows * 2 {
            assert!(sweep_points(rows) >= sweep_points(rows - 1));
        }
    }

    #[test]
    fn test_score_never_decreases_after_saturation() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(usize::BITS as usize);
        assert_eq!(stats.score(), usize::MAX);
        assert_eq!(stats.complete_piece_drop(1), 10);
        assert_eq!(stats.score(), usize::MAX);
    }

    #[test]
    fn test_multiplier_resets_between_sweeps() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(4), 150);
        assert_eq!(stats.complete_piece_drop(1), 10);
        assert_eq!(stats.score(), 160);
        assert_eq!(stats.completed_pieces(), 2);
        assert_eq!(stats.line_cleared_counter(), &[0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_drop_without_clear_scores_nothing() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(0), 0);
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.line_cleared_counter()[0], 1);
    }

    #[test]
    fn test_play_time_accumulates() {
        let mut stats = GameStats::new();
        stats.add_play_time(Duration::from_millis(250));
        stats.add_play_time(Duration::from_millis(750));
        assert_eq!(stats.play_time(), Duration::from_secs(1));
    }
}
