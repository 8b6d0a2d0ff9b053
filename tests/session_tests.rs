//! Session scenarios driven through the public command API

use std::cell::RefCell;
use std::rc::Rc;

use blockfall::core::{
    collides, EngineConfig, EventSink, GameSession, Grid, SequenceSource,
};
use blockfall::types::{Command, SessionState, ShapeKind};

fn shape_index(kind: ShapeKind) -> usize {
    ShapeKind::ALL.iter().position(|&k| k == kind).unwrap()
}

/// Session that always spawns `kind` with color value 1
fn scripted(kind: ShapeKind) -> GameSession<SequenceSource> {
    GameSession::new(
        EngineConfig::default(),
        SequenceSource::new(vec![shape_index(kind), 0]),
    )
    .unwrap()
}

#[derive(Debug, Default)]
struct Recorded {
    locks: u32,
    cleared: Vec<u32>,
    game_over: Option<u32>,
}

#[derive(Clone, Default)]
struct RecordingSink(Rc<RefCell<Recorded>>);

impl EventSink for RecordingSink {
    fn on_lock(&mut self) {
        self.0.borrow_mut().locks += 1;
    }

    fn on_lines_cleared(&mut self, count: u32) {
        self.0.borrow_mut().cleared.push(count);
    }

    fn on_game_over(&mut self, score: u32) {
        self.0.borrow_mut().game_over = Some(score);
    }
}

#[test]
fn test_game_lifecycle() {
    let mut session = GameSession::with_seed(12345);
    assert_eq!(session.state(), SessionState::NotStarted);
    assert!(session.active().is_none());

    // Piece commands do nothing before start.
    assert!(!session.apply(Command::MoveLeft));
    assert!(!session.apply(Command::HardDrop));
    assert!(!session.apply(Command::Pause));

    assert!(session.apply(Command::Start));
    assert_eq!(session.state(), SessionState::Playing);
    assert!(session.active().is_some());

    assert!(session.apply(Command::Pause));
    assert_eq!(session.state(), SessionState::Paused);
    assert!(session.apply(Command::Pause));
    assert_eq!(session.state(), SessionState::Playing);
}

#[test]
fn test_hard_drop_square_on_empty_grid() {
    let mut session = scripted(ShapeKind::O);
    session.apply(Command::Start);
    let active = session.active().unwrap();
    assert_eq!((active.x, active.y), (4, 0));

    assert!(session.apply(Command::HardDrop));

    let grid = session.grid();
    for y in 0..20 {
        for x in 0..10 {
            let expected = if (x == 4 || x == 5) && (y == 18 || y == 19) {
                1
            } else {
                0
            };
            assert_eq!(grid.get(x, y), Ok(expected), "cell ({x}, {y})");
        }
    }
    assert_eq!(session.score(), 0);
}

#[test]
fn test_filling_gap_clears_exactly_one_row() {
    let mut grid = Grid::new(10, 20);
    for x in (0..10).filter(|&x| x != 4) {
        grid.set(x, 19, 2).unwrap();
    }
    // Partial row above stays put (shifted down by one).
    grid.set(0, 18, 3).unwrap();

    let sink = RecordingSink::default();
    let mut session = GameSession::with_grid(
        EngineConfig::default(),
        SequenceSource::new(vec![shape_index(ShapeKind::I), 0]),
        grid,
    )
    .unwrap()
    .with_sink(sink.clone());

    session.apply(Command::Start);
    session.apply(Command::HardDrop);

    assert_eq!(session.score(), 1);
    assert_eq!(session.lines(), 1);
    assert!(session.grid().row(0).iter().all(|&c| c == 0));

    // The rest of the bar and the partial row moved down one row.
    let grid = session.grid();
    assert_eq!(grid.get(0, 19), Ok(3));
    assert_eq!(grid.get(4, 19), Ok(1));
    assert_eq!(grid.get(4, 17), Ok(1));
    assert_eq!(grid.get(4, 16), Ok(0));
    assert_eq!(grid.get(1, 19), Ok(0));

    let recorded = sink.0.borrow();
    assert_eq!(recorded.locks, 1);
    assert_eq!(recorded.cleared, vec![1]);
    assert_eq!(recorded.game_over, None);
}

#[test]
fn test_bar_rotation_clamps_at_right_wall() {
    let mut session = scripted(ShapeKind::I);
    session.apply(Command::Start);

    for _ in 0..5 {
        assert!(session.apply(Command::MoveRight));
    }
    assert_eq!(session.active().unwrap().x, 9);
    assert!(!session.apply(Command::MoveRight));

    assert!(session.apply(Command::Rotate));

    let active = session.active().unwrap();
    assert_eq!(active.shape.width(), 4);
    assert_eq!(active.shape.height(), 1);
    assert_eq!(active.x, 6);
    assert_eq!(active.y, 0);
    assert!(!collides(session.grid(), active, 0, 0));
}

#[test]
fn test_left_wall_rejects_move() {
    let mut session = scripted(ShapeKind::T);
    session.apply(Command::Start);

    while session.apply(Command::MoveLeft) {}

    assert_eq!(session.active().unwrap().x, 0);
    assert!(!session.apply(Command::MoveLeft));
    assert_eq!(session.active().unwrap().x, 0);
}

#[test]
fn test_game_over_blocks_commands_until_reset() {
    let mut grid = Grid::new(10, 20);
    grid.set(4, 2, 2).unwrap();
    grid.set(5, 2, 2).unwrap();

    let sink = RecordingSink::default();
    let mut session = GameSession::with_grid(
        EngineConfig::default(),
        SequenceSource::new(vec![shape_index(ShapeKind::O), 0]),
        grid,
    )
    .unwrap()
    .with_sink(sink.clone());

    session.apply(Command::Start);
    // The square lands on the ledge at rows 0-1; the next square has nowhere to go.
    session.apply(Command::HardDrop);
    assert_eq!(session.state(), SessionState::GameOver);
    assert_eq!(sink.0.borrow().game_over, Some(0));

    let before = session.grid().clone();
    let piece_before = session.active().cloned();
    assert!(!session.apply(Command::MoveLeft));
    assert!(!session.apply(Command::Rotate));
    assert!(!session.apply(Command::SoftDrop));
    assert!(!session.apply(Command::HardDrop));
    assert!(!session.apply(Command::Pause));
    assert!(!session.tick(1_000_000));
    assert_eq!(session.grid(), &before);
    assert_eq!(session.active().cloned(), piece_before);
    assert_eq!(session.state(), SessionState::GameOver);

    assert!(session.apply(Command::Reset));
    assert_eq!(session.state(), SessionState::Playing);
    assert!(session.grid().cells().iter().all(|&c| c == 0));
}

#[test]
fn test_start_after_game_over_restarts() {
    let mut grid = Grid::new(10, 20);
    grid.set(4, 2, 2).unwrap();

    let mut session = GameSession::with_grid(
        EngineConfig::default(),
        SequenceSource::new(vec![shape_index(ShapeKind::O), 0]),
        grid,
    )
    .unwrap();
    session.apply(Command::Start);
    session.apply(Command::HardDrop);
    assert_eq!(session.state(), SessionState::GameOver);

    assert!(session.apply(Command::Start));
    assert_eq!(session.state(), SessionState::Playing);
    assert_eq!(session.score(), 0);
}

#[test]
fn test_gravity_lands_piece() {
    let mut session = scripted(ShapeKind::O);
    session.apply(Command::Start);

    let mut now = 0u64;
    session.tick(now);
    // 18 drops to the floor, one more to lock.
    for _ in 0..19 {
        now += 1_001;
        assert!(session.tick(now));
    }

    assert_eq!(session.grid().get(4, 19), Ok(1));
    assert_eq!(session.active().unwrap().y, 0);
}

#[test]
fn test_with_grid_uses_grid_dimensions() {
    let grid = Grid::new(6, 8);
    let session =
        GameSession::with_grid(EngineConfig::default(), SequenceSource::new(vec![0]), grid)
            .unwrap();
    assert_eq!(session.config().board.columns, 6);
    assert_eq!(session.config().board.rows, 8);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = EngineConfig::default();
    config.palette.colors.clear();
    assert!(GameSession::new(config, SequenceSource::new(vec![0])).is_err());
}

#[test]
fn test_same_seed_same_game() {
    let script = [
        Command::MoveLeft,
        Command::Rotate,
        Command::HardDrop,
        Command::MoveRight,
        Command::MoveRight,
        Command::HardDrop,
        Command::SoftDrop,
        Command::HardDrop,
    ];

    let play = |seed| {
        let mut session = GameSession::with_seed(seed);
        session.apply(Command::Start);
        for command in script {
            session.apply(command);
        }
        session.snapshot()
    };

    assert_eq!(play(7), play(7));
}
