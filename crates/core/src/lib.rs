//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has **no dependency** on rendering, audio or input devices, making it:
//!
//! - **Deterministic**: The random source is injected, so a seeded source replays a game exactly
//! - **Testable**: Scripted random sequences pin down which piece spawns next
//! - **Portable**: Runs anywhere a rendering collaborator can pull a snapshot
//!
//! # Module Structure
//!
//! - [`grid`]: fixed-size cell store with bounds-checked access and line clearing
//! - [`piece`]: shape matrices, the falling piece, and the clockwise rotation transform
//! - [`collision`]: the collision resolver used by every motion rule
//! - [`factory`]: random piece generation from a shape catalog and palette
//! - [`rng`]: random sources (seeded LCG, `fastrand`, scripted sequence)
//! - [`scoring`]: level and gravity interval progression
//! - [`session`]: the game session state machine tying everything together
//! - [`snapshot`]: read-only state handed to renderers
//! - [`events`]: fire-and-forget notifications for audio/feedback collaborators
//! - [`config`]: TOML configuration
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameSession;
//! use blockfall_types::{Command, SessionState};
//!
//! let mut session = GameSession::with_seed(12345);
//! session.apply(Command::Start);
//!
//! session.apply(Command::MoveRight);
//! session.apply(Command::Rotate);
//! session.apply(Command::HardDrop);
//!
//! assert_eq!(session.state(), SessionState::Playing);
//! assert!(session.grid().cells().iter().any(|&c| c != 0));
//! ```
//!
//! # Timing
//!
//! Gravity is time-gated. Call [`GameSession::tick`](session::GameSession::tick) once per
//! frame with a monotonic timestamp; a drop happens when more than the current drop
//! interval has elapsed since the previous one. The engine never sleeps or blocks.

pub mod collision;
pub mod config;
pub mod error;
pub mod events;
pub mod factory;
pub mod grid;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use collision::{collides, drop_distance};
pub use config::EngineConfig;
pub use error::{ConfigError, GridError};
pub use events::{EventSink, LogSink, NullSink};
pub use factory::PieceFactory;
pub use grid::Grid;
pub use piece::{try_rotate, Piece, Shape};
pub use rng::{FastRng, RandomSource, SequenceSource, SimpleRng};
pub use session::GameSession;
pub use snapshot::{ActiveSnapshot, GameSnapshot};
