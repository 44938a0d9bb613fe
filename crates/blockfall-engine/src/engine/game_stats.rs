use serde::Serialize;

use super::game_config::GameConfig;

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
const SCORE_TABLE: [u64; 5] = [0, 40, 100, 300, 1200];

/// Bonus added to a line clear made by a hard-dropped piece.
const HARD_DROP_BONUS: u64 = 1;

/// Points for clearing `lines` rows with a single piece.
///
/// # Panics
///
/// A piece can clear at most four rows; any larger count means the engine
/// state is corrupt and panics.
#[must_use]
pub fn line_clear_points(lines: usize) -> u64 {
    match SCORE_TABLE.get(lines) {
        Some(&points) => points,
        None => panic!("unusual amount of lines cleared by one piece: {lines}"),
    }
}

/// Score, level and line statistics of a game.
///
/// # Scoring
///
/// Only line clears score, following the classic NES table (see
/// [`line_clear_points`]). A hard-dropped piece that clears lines earns one
/// extra point. There are no combo, back-to-back or T-spin bonuses.
///
/// # Leveling
///
/// Cleared lines accumulate in a per-level counter. Once the counter exceeds
/// the configured goal it resets to zero (surplus lines are dropped) and the
/// level advances, up to the configured maximum.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameConfig, GameStats};
///
/// let config = GameConfig::default();
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4, true, &config);
///
/// assert_eq!(stats.score(), 1201);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    level: u32,
    level_line_count: u32,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 0,
            level_line_count: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Lines cleared toward the next level.
    #[must_use]
    pub const fn level_line_count(&self) -> u32 {
        self.level_line_count
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of line clears by count.
    ///
    /// Index `n` counts the locks that cleared exactly `n` lines.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records a locked piece and returns `true` if the level advanced.
    ///
    /// # Panics
    ///
    /// Panics if `cleared_lines` is greater than 4.
    pub fn complete_piece_drop(
        &mut self,
        cleared_lines: usize,
        hard_drop: bool,
        config: &GameConfig,
    ) -> bool {
        let points = line_clear_points(cleared_lines);
        self.completed_pieces += 1;
        self.line_cleared_counter[cleared_lines] += 1;
        if cleared_lines == 0 {
            return false;
        }

        self.score += points;
        if hard_drop {
            self.score += HARD_DROP_BONUS;
        }
        self.total_cleared_lines += cleared_lines;

        // at most 4 by the check above
        #[expect(clippy::cast_possible_truncation)]
        let lines = cleared_lines as u32;
        self.level_line_count += lines;
        if self.level_line_count <= config.level_line_goal {
            return false;
        }
        self.level_line_count = 0;
        if self.level < config.max_level {
            self.level += 1;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_points_table() {
        assert_eq!(line_clear_points(0), 0);
        assert_eq!(line_clear_points(1), 40);
        assert_eq!(line_clear_points(2), 100);
        assert_eq!(line_clear_points(3), 300);
        assert_eq!(line_clear_points(4), 1200);
    }

    #[test]
    #[should_panic(expected = "unusual amount of lines cleared")]
    fn test_line_clear_points_rejects_five() {
        let _ = line_clear_points(5);
    }

    #[test]
    fn test_scoring_with_and_without_hard_drop() {
        let config = GameConfig::default();
        for (lines, points) in [(1, 40), (2, 100), (3, 300), (4, 1200)] {
            let mut stats = GameStats::new();
            stats.complete_piece_drop(lines, false, &config);
            assert_eq!(stats.score(), points);

            let mut stats = GameStats::new();
            stats.complete_piece_drop(lines, true, &config);
            assert_eq!(stats.score(), points + 1);
        }
    }

    #[test]
    fn test_hard_drop_without_clear_scores_nothing() {
        let config = GameConfig::default();
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0, true, &config);
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.completed_pieces(), 1);
        assert_eq!(stats.line_cleared_counter(), &[1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_level_advances_after_exceeding_goal() {
        let config = GameConfig::default();
        let mut stats = GameStats::new();

        // 10 lines reach the goal but do not exceed it
        for _ in 0..10 {
            assert!(!stats.complete_piece_drop(1, false, &config));
        }
        assert_eq!(stats.level(), 0);
        assert_eq!(stats.level_line_count(), 10);

        assert!(stats.complete_piece_drop(1, false, &config));
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.level_line_count(), 0);
        assert_eq!(stats.total_cleared_lines(), 11);
    }

    #[test]
    fn test_surplus_lines_are_dropped_on_level_up() {
        let config = GameConfig::default();
        let mut stats = GameStats::new();
        stats.complete_piece_drop(4, false, &config);
        stats.complete_piece_drop(4, false, &config);
        assert!(stats.complete_piece_drop(4, false, &config));
        assert_eq!(stats.level_line_count(), 0);
    }

    #[test]
    fn test_level_is_capped() {
        let config = GameConfig {
            max_level: 2,
            level_line_goal: 1,
            ..GameConfig::default()
        };
        let mut stats = GameStats::new();
        for _ in 0..10 {
            stats.complete_piece_drop(2, false, &config);
        }
        assert_eq!(stats.level(), 2);
        assert_eq!(stats.level_line_count(), 0);
    }
}
