//! Game session module - manages the complete state of one play session
//!
//! This module ties together all core components: grid, piece factory, collision,
//! rotation, line clearing and scoring. It handles gravity timing, command
//! dispatch, locking and the session lifecycle:
//!
//! NotStarted → Playing → {Paused ⇄ Playing, GameOver}. Only `reset` (or `start`
//! after a game over) leaves GameOver.

use log::{debug, error, info, trace};

use crate::collision::{collides, drop_distance};
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::events::{EventSink, NullSink};
use crate::factory::PieceFactory;
use crate::grid::Grid;
use crate::piece::{try_rotate, Piece};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::{calculate_level, calculate_line_score, get_drop_interval_ms};
use crate::snapshot::GameSnapshot;
use crate::types::{Command, SessionState};

/// Complete session state
pub struct GameSession<R: RandomSource = SimpleRng> {
    config: EngineConfig,
    factory: PieceFactory,
    rng: R,
    sink: Box<dyn EventSink>,
    grid: Grid,
    active: Option<Piece>,
    state: SessionState,
    score: u32,
    level: u32,
    lines: u32,
    drop_interval_ms: u32,
    /// Timestamp of the last gravity drop; `None` until the next tick anchors it
    last_drop_ms: Option<u64>,
    /// Monotonic count of spawned pieces (reset with the session)
    pieces_spawned: u32,
}

impl GameSession<SimpleRng> {
    /// Default configuration with a seeded LCG
    pub fn with_seed(seed: u32) -> Self {
        let config = EngineConfig::default();
        let grid = Grid::new(config.board.columns, config.board.rows);
        Self::build(config, SimpleRng::new(seed), grid)
    }
}

impl<R: RandomSource> GameSession<R> {
    /// Create a session in `NotStarted` with an empty grid
    pub fn new(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.board.columns, config.board.rows);
        Ok(Self::build(config, rng, grid))
    }

    /// Create a session that starts from a prepared grid.
    ///
    /// The grid's dimensions replace the configured board size. `reset` still
    /// returns to an empty grid.
    pub fn with_grid(mut config: EngineConfig, rng: R, grid: Grid) -> Result<Self, ConfigError> {
        config.board.columns = grid.columns();
        config.board.rows = grid.rows();
        config.validate()?;
        Ok(Self::build(config, rng, grid))
    }

    fn build(config: EngineConfig, rng: R, grid: Grid) -> Self {
        let factory = PieceFactory::new(
            config.pieces.shapes.clone(),
            config.palette_len(),
            config.board.columns,
        );
        let drop_interval_ms = get_drop_interval_ms(0, &config.timing);

        Self {
            config,
            factory,
            rng,
            sink: Box::new(NullSink),
            grid,
            active: None,
            state: SessionState::NotStarted,
            score: 0,
            level: 0,
            lines: 0,
            drop_interval_ms,
            last_drop_ms: None,
            pieces_spawned: 0,
        }
    }

    /// Attach a notification sink
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    /// Palette name of a cell value (`None` for empty or unknown values)
    pub fn color_name(&self, value: u8) -> Option<&str> {
        let index = (value as usize).checked_sub(1)?;
        self.config.palette.colors.get(index).map(String::as_str)
    }

    /// Start the session and spawn the first piece.
    ///
    /// From `GameOver` this behaves like [`reset`](Self::reset). Returns whether
    /// anything changed.
    pub fn start(&mut self) -> bool {
        match self.state {
            SessionState::NotStarted => {
                self.set_state(SessionState::Playing);
                self.last_drop_ms = None;
                self.spawn_piece();
                true
            }
            SessionState::GameOver => {
                self.reset();
                true
            }
            SessionState::Playing | SessionState::Paused => false,
        }
    }

    /// Reinitialize grid, score, level and gravity, then play with a fresh piece
    pub fn reset(&mut self) {
        self.grid = Grid::new(self.config.board.columns, self.config.board.rows);
        self.active = None;
        self.score = 0;
        self.level = 0;
        self.lines = 0;
        self.drop_interval_ms = get_drop_interval_ms(0, &self.config.timing);
        self.last_drop_ms = None;
        self.pieces_spawned = 0;
        self.set_state(SessionState::Playing);
        self.spawn_piece();
    }

    /// Toggle between `Playing` and `Paused`; no-op in any other state
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            SessionState::Playing => {
                self.set_state(SessionState::Paused);
                true
            }
            SessionState::Paused => {
                // Re-anchor gravity so the pause does not count as elapsed time.
                self.last_drop_ms = None;
                self.set_state(SessionState::Playing);
                true
            }
            SessionState::NotStarted | SessionState::GameOver => false,
        }
    }

    fn set_state(&mut self, next: SessionState) {
        if self.state != next {
            info!("session {} -> {}", self.state.as_str(), next.as_str());
            self.state = next;
        }
    }

    /// Draw the next piece and end the session if it collides where it spawns
    fn spawn_piece(&mut self) {
        let piece = self.factory.spawn(&mut self.rng);
        let blocked = collides(&self.grid, &piece, 0, 0);
        self.active = Some(piece);
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);

        if blocked {
            debug!("spawn position blocked");
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        info!(
            "stack topped out after {} pieces, {} lines",
            self.pieces_spawned, self.lines
        );
        self.set_state(SessionState::GameOver);
        self.sink.on_game_over(self.score);
    }

    /// Shift the active piece horizontally by `dx`; rejected moves are no-ops
    pub(crate) fn try_move(&mut self, dx: i32) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        if collides(&self.grid, active, dx, 0) {
            return false;
        }
        active.x += dx;
        true
    }

    /// Move down one row, or lock if the piece cannot descend.
    ///
    /// Returns `true` if the piece moved, `false` if it locked (or nothing happened).
    pub(crate) fn soft_drop(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        if collides(&self.grid, active, 0, 1) {
            self.lock_piece();
            return false;
        }
        active.y += 1;
        true
    }

    /// Drop the active piece to its landing row and lock it. Returns rows dropped.
    pub(crate) fn hard_drop(&mut self) -> u32 {
        if !self.state.is_playing() {
            return 0;
        }
        let Some(active) = self.active.as_mut() else {
            return 0;
        };

        let distance = drop_distance(&self.grid, active);
        active.y += distance;
        self.lock_piece();
        distance as u32
    }

    /// Rotate clockwise with the right-wall push back; rejected rotations are no-ops
    pub(crate) fn try_rotate(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let Some(active) = self.active.as_ref() else {
            return false;
        };

        match try_rotate(&self.grid, active) {
            Some(rotated) => {
                self.active = Some(rotated);
                true
            }
            None => false,
        }
    }

    /// Merge the active piece into the grid, clear full rows, score them and
    /// spawn the next piece
    fn lock_piece(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        // A piece still poking out above the board means the stack has topped out.
        if piece.cells().any(|(_, y, _)| y < 0) {
            self.active = Some(piece);
            self.game_over();
            return;
        }

        if let Err(err) = self.grid.lock_piece(&piece) {
            error!("refusing to lock piece: {}", err);
            self.active = Some(piece);
            self.game_over();
            return;
        }
        debug!("locked piece at ({}, {})", piece.x, piece.y);
        self.sink.on_lock();

        let cleared = self.grid.clear_full_rows().len();
        if cleared > 0 {
            self.score += calculate_line_score(cleared);
            self.lines += cleared as u32;
            info!("cleared {} row(s), score {}", cleared, self.score);

            let level = calculate_level(self.lines, self.config.timing.lines_per_level);
            if level != self.level {
                self.level = level;
                self.drop_interval_ms = get_drop_interval_ms(level, &self.config.timing);
                info!(
                    "level {} reached, drop interval {}ms",
                    level, self.drop_interval_ms
                );
            }

            self.sink.on_lines_cleared(cleared as u32);
        }

        self.spawn_piece();
    }

    /// Landing row of the active piece (where a hard drop would put its origin)
    pub fn ghost_y(&self) -> Option<i32> {
        let active = self.active.as_ref()?;
        Some(active.y + drop_distance(&self.grid, active))
    }

    /// Gravity step, driven by a monotonic clock in milliseconds.
    ///
    /// The first tick after start, reset or un-pause only anchors the clock. After
    /// that, a tick performs one soft drop once strictly more than the current drop
    /// interval has elapsed since the previous drop. Returns whether gravity fired.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.state.is_playing() {
            return false;
        }

        let Some(last_drop_ms) = self.last_drop_ms else {
            self.last_drop_ms = Some(now_ms);
            return false;
        };

        if now_ms.saturating_sub(last_drop_ms) <= self.drop_interval_ms as u64 {
            return false;
        }

        trace!("gravity at {}ms", now_ms);
        self.last_drop_ms = Some(now_ms);
        self.soft_drop();
        true
    }

    /// Apply a command. Piece commands only act while playing.
    ///
    /// Returns whether the command changed anything.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.try_move(-1),
            Command::MoveRight => self.try_move(1),
            Command::SoftDrop => {
                if !self.state.is_playing() {
                    return false;
                }
                // A drop that locks still changes the session.
                self.soft_drop();
                true
            }
            Command::HardDrop => {
                if !self.state.is_playing() {
                    return false;
                }
                self.hard_drop();
                true
            }
            Command::Rotate => self.try_rotate(),
            Command::Pause => self.toggle_pause(),
            Command::Reset => {
                self.reset();
                true
            }
            Command::Start => self.start(),
        }
    }

    /// Fill `out` with the current state, reusing its buffers
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.columns = self.grid.columns();
        out.rows = self.grid.rows();
        out.grid.clear();
        out.grid.extend_from_slice(self.grid.cells());
        out.set_active(self.active.as_ref());
        out.ghost_y = self.ghost_y();
        out.score = self.score;
        out.lines = self.lines;
        out.level = self.level;
        out.drop_interval_ms = self.drop_interval_ms;
        out.state = self.state;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Shape;
    use crate::rng::SequenceSource;
    use crate::types::ShapeKind;

    /// Session whose factory always spawns shape `kind` in color 1
    fn session_with(kind: ShapeKind) -> GameSession<SequenceSource> {
        let index = ShapeKind::ALL.iter().position(|&k| k == kind).unwrap();
        GameSession::new(EngineConfig::default(), SequenceSource::new(vec![index, 0])).unwrap()
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::with_seed(12345);

        assert_eq!(session.state, SessionState::NotStarted);
        assert_eq!(session.score, 0);
        assert_eq!(session.level, 0);
        assert_eq!(session.lines, 0);
        assert_eq!(session.drop_interval_ms, 1000);
        assert!(session.active.is_none());
        assert!(session.grid.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_start_spawns_piece() {
        let mut session = session_with(ShapeKind::O);
        assert!(session.start());

        assert_eq!(session.state, SessionState::Playing);
        let active = session.active.as_ref().unwrap();
        assert_eq!((active.x, active.y), (4, 0));
        assert_eq!(session.pieces_spawned, 1);

        // Starting twice is a no-op.
        assert!(!session.start());
        assert_eq!(session.pieces_spawned, 1);
    }

    #[test]
    fn test_try_move() {
        let mut session = session_with(ShapeKind::O);
        session.start();

        assert!(session.try_move(1));
        assert_eq!(session.active.as_ref().unwrap().x, 5);
        assert!(session.try_move(-1));
        assert_eq!(session.active.as_ref().unwrap().x, 4);
    }

    #[test]
    fn test_try_move_stops_at_walls() {
        let mut session = session_with(ShapeKind::O);
        session.start();

        let mut moved = 0;
        for _ in 0..10 {
            if session.try_move(-1) {
                moved += 1;
            }
        }
        assert_eq!(moved, 4);
        assert_eq!(session.active.as_ref().unwrap().x, 0);

        for _ in 0..20 {
            session.try_move(1);
        }
        assert_eq!(session.active.as_ref().unwrap().x, 8);
    }

    #[test]
    fn test_soft_drop_locks_on_floor() {
        let mut session = session_with(ShapeKind::O);
        session.start();

        for _ in 0..18 {
            assert!(session.soft_drop());
        }
        assert_eq!(session.active.as_ref().unwrap().y, 18);

        assert!(!session.soft_drop());
        assert_eq!(session.grid.get(4, 19), Ok(1));
        assert_eq!(session.pieces_spawned, 2);
        assert_eq!(session.active.as_ref().unwrap().y, 0);
    }

    #[test]
    fn test_lock_above_board_is_game_over() {
        let mut session = session_with(ShapeKind::I);
        session.start();
        session.active = Some(Piece::new(Shape::from_kind(ShapeKind::I, 1), 0, -2));
        // Occupy the row under the bar so it cannot descend.
        session.grid.set(0, 2, 2).unwrap();

        assert!(!session.soft_drop());

        assert_eq!(session.state, SessionState::GameOver);
        // Nothing was written for the topped-out piece.
        assert_eq!(session.grid.get(0, 0), Ok(0));
        assert_eq!(session.grid.get(0, 1), Ok(0));
    }

    #[test]
    fn test_level_up_shortens_drop_interval() {
        let mut config = EngineConfig::default();
        config.timing.lines_per_level = 1;
        // Always the vertical bar.
        let mut session = GameSession::new(config, SequenceSource::new(vec![1, 0])).unwrap();
        session.start();

        // Fill the bottom row except column 4 (the bar's spawn column).
        for x in (0..10).filter(|&x| x != 4) {
            session.grid.set(x, 19, 2).unwrap();
        }
        session.hard_drop();

        assert_eq!(session.lines, 1);
        assert_eq!(session.score, 1);
        assert_eq!(session.level, 1);
        assert_eq!(session.drop_interval_ms, 900);
    }

    #[test]
    fn test_tick_anchors_then_drops_after_interval() {
        let mut session = session_with(ShapeKind::O);
        session.start();

        assert!(!session.tick(5_000));
        assert!(!session.tick(6_000)); // exactly the interval: not yet
        assert_eq!(session.active.as_ref().unwrap().y, 0);

        assert!(session.tick(6_001));
        assert_eq!(session.active.as_ref().unwrap().y, 1);

        // Interval restarts at the drop.
        assert!(!session.tick(7_000));
        assert!(session.tick(7_002));
        assert_eq!(session.active.as_ref().unwrap().y, 2);
    }

    #[test]
    fn test_pause_stops_gravity_and_reanchors() {
        let mut session = session_with(ShapeKind::O);
        session.start();
        session.tick(0);

        assert!(session.toggle_pause());
        assert!(!session.tick(5_000));
        assert_eq!(session.active.as_ref().unwrap().y, 0);

        assert!(session.toggle_pause());
        // First tick after resuming only anchors.
        assert!(!session.tick(10_000));
        assert!(session.tick(11_001));
        assert_eq!(session.active.as_ref().unwrap().y, 1);
    }

    #[test]
    fn test_paused_session_ignores_piece_commands() {
        let mut session = session_with(ShapeKind::I);
        session.start();
        session.toggle_pause();

        assert!(!session.apply(Command::MoveLeft));
        assert!(!session.apply(Command::Rotate));
        assert!(!session.apply(Command::SoftDrop));
        assert!(!session.apply(Command::HardDrop));
        assert_eq!(session.active.as_ref().unwrap().x, 4);
        assert!(session.grid.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_reset_reinitializes() {
        let mut session = session_with(ShapeKind::O);
        session.start();
        session.hard_drop();
        session.score = 7;
        session.level = 3;
        session.drop_interval_ms = 50;

        session.reset();

        assert_eq!(session.state, SessionState::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.level, 0);
        assert_eq!(session.drop_interval_ms, 1000);
        assert!(session.grid.cells().iter().all(|&c| c == 0));
        assert_eq!(session.pieces_spawned, 1);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = session_with(ShapeKind::O);
        session.start();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.columns, 10);
        assert_eq!(snapshot.rows, 20);
        assert_eq!(snapshot.state, SessionState::Playing);
        assert_eq!(snapshot.ghost_y, Some(18));
        let active = snapshot.active.as_ref().unwrap();
        assert_eq!((active.x, active.y, active.width, active.height), (4, 0, 2, 2));

        let composite = snapshot.composite();
        assert_eq!(composite[4], 1);
        assert_eq!(composite[15], 1);
        assert_eq!(composite.iter().filter(|&&c| c != 0).count(), 4);
    }

    #[test]
    fn test_color_name() {
        let session = GameSession::with_seed(1);
        assert_eq!(session.color_name(1), Some("blue"));
        assert_eq!(session.color_name(4), Some("yellow"));
        assert_eq!(session.color_name(0), None);
        assert_eq!(session.color_name(5), None);
    }
}
