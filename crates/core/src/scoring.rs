//! Scoring module - points, levels and the gravity ramp
//!
//! A cleared row is worth one point, whether it is cleared alone or in a batch.
//! Every `lines_per_level` cleared rows raise the level, and each level shortens the
//! gravity interval by `drop_step_ms`, never going below `min_drop_ms`.

use crate::config::TimingConfig;

/// Points for clearing `lines` rows in one lock
pub fn calculate_line_score(lines: usize) -> u32 {
    lines as u32
}

/// Level reached after clearing `total_lines` rows
pub fn calculate_level(total_lines: u32, lines_per_level: u32) -> u32 {
    total_lines / lines_per_level.max(1)
}

/// Gravity interval at `level`, clamped to the configured floor
pub fn get_drop_interval_ms(level: u32, timing: &TimingConfig) -> u32 {
    timing
        .initial_drop_ms
        .saturating_sub(level.saturating_mul(timing.drop_step_ms))
        .max(timing.min_drop_ms)
}
