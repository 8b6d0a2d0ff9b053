//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! They are plain data with no engine logic, so they can be shared by the
//! core rules, the input repeat handler and any rendering collaborator.
//!
//! # Board Dimensions
//!
//! The default playfield is 10 columns by 20 rows. Both are configurable per
//! session; these constants only provide the defaults.
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn column**: `columns / 2 - 1` (4 on the default board)
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame step used by the headless runner (~60 FPS) |
//! | `BASE_DROP_MS` | 1000 | Gravity interval at level 0 |
//! | `DROP_STEP_MS` | 100 | Interval decrease per level |
//! | `DROP_INTERVAL_MIN_MS` | 50 | Floor for the gravity interval |
//! | `LINES_PER_LEVEL` | 10 | Cleared rows per level |
//! | `SOFT_DROP_REPEAT_MS` | 50 | Re-issue period of a held soft drop |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, SessionState, DEFAULT_COLUMNS, DEFAULT_ROWS};
//!
//! let command = Command::from_str("hardDrop").unwrap();
//! assert_eq!(command, Command::HardDrop);
//! assert_eq!(command.as_str(), "hardDrop");
//!
//! assert!(SessionState::Playing.is_playing());
//! assert_eq!(DEFAULT_COLUMNS, 10);
//! assert_eq!(DEFAULT_ROWS, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells
pub const DEFAULT_COLUMNS: u16 = 10;

/// Default board height in cells
pub const DEFAULT_ROWS: u16 = 20;

/// Frame step of the headless runner (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 0 (1000ms = 1 row per second)
pub const BASE_DROP_MS: u32 = 1000;

/// Gravity interval decrease applied per level
pub const DROP_STEP_MS: u32 = 100;

/// Gravity never gets faster than this
pub const DROP_INTERVAL_MIN_MS: u32 = 50;

/// Cleared rows needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Re-issue period of a held soft drop (no initial delay)
pub const SOFT_DROP_REPEAT_MS: u32 = 50;

/// DAS (Delayed Auto Shift) delay for held horizontal moves
pub const DEFAULT_DAS_MS: u32 = 150;

/// ARR (Auto Repeat Rate) for held horizontal moves
pub const DEFAULT_ARR_MS: u32 = 50;

/// Largest palette a cell value can index
pub const MAX_PALETTE_LEN: usize = u8::MAX as usize;

/// Default palette, indexed from 1 by cell values
pub const DEFAULT_PALETTE: [&str; 4] = ["blue", "red", "green", "yellow"];

/// A cell on the game board or in a shape matrix
///
/// - `0`: empty
/// - `1..=N`: occupied, value is an index into the palette starting at 1
pub type Cell = u8;

/// The empty cell value
pub const EMPTY: Cell = 0;

/// Shapes available to the piece factory
///
/// - **O**: 2x2 square
/// - **I**: vertical bar, 4 rows by 1 column
/// - **L** / **J**: 3 rows by 2 columns
/// - **S** / **Z** / **T**: 2 rows by 3 columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    O,
    I,
    L,
    J,
    S,
    Z,
    T,
}

impl ShapeKind {
    /// Every shape kind, in catalog order
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::O,
        ShapeKind::I,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::T,
    ];

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("T"), Some(ShapeKind::T));
    /// assert_eq!(ShapeKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "o" => Some(ShapeKind::O),
            "i" => Some(ShapeKind::I),
            "l" => Some(ShapeKind::L),
            "j" => Some(ShapeKind::J),
            "s" => Some(ShapeKind::S),
            "z" => Some(ShapeKind::Z),
            "t" => Some(ShapeKind::T),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::O => "o",
            ShapeKind::I => "i",
            ShapeKind::L => "l",
            ShapeKind::J => "j",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::T => "t",
        }
    }

    /// Occupancy mask of the shape in spawn orientation, one slice per row
    pub fn mask(&self) -> &'static [&'static [bool]] {
        const X: bool = true;
        const O: bool = false;
        match self {
            ShapeKind::O => &[&[X, X], &[X, X]],
            ShapeKind::I => &[&[X], &[X], &[X], &[X]],
            ShapeKind::L => &[&[X, O], &[X, O], &[X, X]],
            ShapeKind::J => &[&[O, X], &[O, X], &[X, X]],
            ShapeKind::S => &[&[O, X, X], &[X, X, O]],
            ShapeKind::Z => &[&[X, X, O], &[O, X, X]],
            ShapeKind::T => &[&[X, X, X], &[O, X, O]],
        }
    }
}

/// Discrete commands accepted by a game session
///
/// Every command is a zero-argument trigger applied synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one row, locking it if it cannot descend
    SoftDrop,
    /// Drop piece as far as it goes and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Toggle between playing and paused
    Pause,
    /// Reinitialize the session and start playing
    Reset,
    /// Start a session that has not started (or has ended)
    Start,
}

impl Command {
    /// Parse command from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("ROTATE"), Some(Command::Rotate));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "harddrop" => Some(Command::HardDrop),
            "rotate" => Some(Command::Rotate),
            "pause" => Some(Command::Pause),
            "reset" => Some(Command::Reset),
            "start" => Some(Command::Start),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::Rotate => "rotate",
            Command::Pause => "pause",
            Command::Reset => "reset",
            Command::Start => "start",
        }
    }

    /// Whether the command moves the active piece (only honoured while playing)
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            Command::MoveLeft
                | Command::MoveRight
                | Command::SoftDrop
                | Command::HardDrop
                | Command::Rotate
        )
    }
}

/// Lifecycle of a game session
///
/// NotStarted → Playing → {Paused ⇄ Playing, GameOver}; only reset leaves GameOver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    #[default]
    NotStarted,
    Playing,
    Paused,
    GameOver,
}

impl SessionState {
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionState::Playing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::NotStarted => "notStarted",
            SessionState::Playing => "playing",
            SessionState::Paused => "paused",
            SessionState::GameOver => "gameOver",
        }
    }
}
