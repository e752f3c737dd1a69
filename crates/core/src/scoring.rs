//! Scoring module - score accumulation and fall-speed progression
//!
//! Each lock scores a flat amount per cleared row. Whenever a clearing lock
//! leaves the score on a positive multiple of the speed-up step, the fall
//! interval shrinks by a fixed amount, never going below its floor.

use crate::types::{
    FALL_INTERVAL_STEP_SECS, MIN_FALL_INTERVAL_SECS, POINTS_PER_ROW, SPEEDUP_SCORE_STEP,
};

/// Constants that drive scoring and difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    pub points_per_row: u32,
    pub speedup_score_step: u32,
    pub fall_interval_step: f64,
    pub min_fall_interval: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            points_per_row: POINTS_PER_ROW,
            speedup_score_step: SPEEDUP_SCORE_STEP,
            fall_interval_step: FALL_INTERVAL_STEP_SECS,
            min_fall_interval: MIN_FALL_INTERVAL_SECS,
        }
    }
}

/// Result of scoring one clearing phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    /// Points awarded by this clear
    pub points: u32,
    /// Score after the clear
    pub score: u32,
    /// Fall interval after the clear
    pub fall_interval: f64,
    /// Whether the fall interval was reduced
    pub sped_up: bool,
}

/// Points for clearing `rows` rows
pub fn calculate_score(rows: usize, points_per_row: u32) -> u32 {
    (rows as u32).saturating_mul(points_per_row)
}

/// Whether a clear that left the game at `score` earns a speed-up
pub fn speedup_due(score: u32, rows: usize, speedup_score_step: u32) -> bool {
    rows > 0 && score > 0 && speedup_score_step > 0 && score % speedup_score_step == 0
}

/// Fall interval after one speed-up, floored at `min`
pub fn next_fall_interval(current: f64, step: f64, min: f64) -> f64 {
    (current - step).max(min)
}

/// Apply one clearing phase to the running score and fall interval
pub fn apply_clear(rules: &ScoringRules, score: u32, fall_interval: f64, rows: usize) -> ScoreResult {
    let points = calculate_score(rows, rules.points_per_row);
    let score = score.saturating_add(points);

    let sped_up = speedup_due(score, rows, rules.speedup_score_step);
    let fall_interval = if sped_up {
        next_fall_interval(fall_interval, rules.fall_interval_step, rules.min_fall_interval)
    } else {
        fall_interval
    };

    ScoreResult {
        points,
        score,
        fall_interval,
        sped_up,
    }
}

/// Fall interval in whole milliseconds, as compared against the fall timer
pub fn fall_interval_ms(fall_interval: f64) -> u32 {
    (fall_interval * 1000.0).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_points_per_row() {
        assert_eq!(calculate_score(0, 10), 0);
        assert_eq!(calculate_score(1, 10), 10);
        assert_eq!(calculate_score(4, 10), 40);
    }

    #[test]
    fn test_speedup_requires_clear_and_milestone() {
        assert!(speedup_due(50, 1, 50));
        assert!(speedup_due(100, 2, 50));
        assert!(!speedup_due(50, 0, 50));
        assert!(!speedup_due(0, 0, 50));
        assert!(!speedup_due(40, 1, 50));
    }

    #[test]
    fn test_apply_clear_speeds_up_on_milestone() {
        let rules = ScoringRules::default();
        let result = apply_clear(&rules, 40, 0.30, 1);
        assert_eq!(result.points, 10);
        assert_eq!(result.score, 50);
        assert!(result.sped_up);
        assert!((result.fall_interval - 0.29).abs() < EPS);
    }

    #[test]
    fn test_apply_clear_without_rows_changes_nothing() {
        let rules = ScoringRules::default();
        let result = apply_clear(&rules, 50, 0.30, 0);
        assert_eq!(result.points, 0);
        assert_eq!(result.score, 50);
        assert!(!result.sped_up);
        assert_eq!(result.fall_interval, 0.30);
    }

    #[test]
    fn test_fall_interval_floor() {
        let rules = ScoringRules::default();
        let result = apply_clear(&rules, 90, 0.155, 1);
        assert!(result.sped_up);
        assert_eq!(result.fall_interval, 0.15);

        let result = apply_clear(&rules, 140, 0.15, 1);
        assert_eq!(result.fall_interval, 0.15);
    }

    #[test]
    fn test_fall_interval_ms_rounds() {
        assert_eq!(fall_interval_ms(0.30), 300);
        assert_eq!(fall_interval_ms(0.30 - 0.01), 290);
        assert_eq!(fall_interval_ms(0.15), 150);
    }
}
