//! Fire-and-forget notifications for audio and feedback collaborators.

use log::info;

/// Receives session notifications. Every method defaults to doing nothing.
pub trait EventSink {
    /// A piece merged into the grid
    fn on_lock(&mut self) {}

    /// `count` rows were cleared by the last lock (only called when `count > 0`)
    fn on_lines_cleared(&mut self, _count: u32) {}

    /// The session ended with `score`
    fn on_game_over(&mut self, _score: u32) {}
}

/// Ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {}

/// Forwards notifications to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_lock(&mut self) {
        info!("piece locked");
    }

    fn on_lines_cleared(&mut self, count: u32) {
        info!("cleared {} line(s)", count);
    }

    fn on_game_over(&mut self, score: u32) {
        info!("game over, final score {}", score);
    }
}
