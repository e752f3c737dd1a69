//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the falling-block puzzle: the shape
//! catalog, the board, placement validation, row clearing, scoring, and the
//! state machine that ties them together. It has no dependencies on
//! rendering, input devices, or I/O beyond reading a config file.
//!
//! # Module Structure
//!
//! - [`catalog`]: the seven shapes and their 5x5 rotation masks
//! - [`board`]: 10x20 grid of locked cells, row clearing
//! - [`piece`]: the falling piece and its move/rotate/drop transforms
//! - [`validator`]: placement rules, including the above-the-top exemption
//! - [`scoring`]: score per row and fall-speed progression
//! - [`game_state`]: spawn → fall → lock → clear → loss state machine
//! - [`snapshot`]: read-only view for renderers
//! - [`session`]: last/best score across successive games
//! - [`config`], [`error`], [`rng`]: supporting pieces
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::{Command, Phase};
//!
//! let mut game = GameState::new(12345);
//! game.tick(0);
//! assert_eq!(game.phase(), Phase::Falling);
//!
//! // One frame: commands in order, then the tick that resolves the drop.
//! game.step(16, &[Command::MoveLeft, Command::Rotate, Command::HardDrop]);
//! assert_eq!(game.board().locked_count(), 4);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) once per frame with
//! the elapsed milliseconds. The piece descends one row each time the
//! accumulated time reaches the fall interval (0.30 s at the start, shrinking
//! toward 0.15 s as the score grows).

pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod game_state;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod validator;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LockReport};
pub use catalog::{ShapeCatalog, ShapeDefinition};
pub use config::EngineConfig;
pub use error::{CatalogError, ConfigError, EngineError};
pub use game_state::{new_game, GameState, TickEvents};
pub use piece::Piece;
pub use rng::SimpleRng;
pub use session::Session;
pub use snapshot::{GameSnapshot, PieceSnapshot};
pub use validator::{is_valid, SpawnColumns};
