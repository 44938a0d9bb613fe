//! Game engine logic and state management.
//!
//! This module drives the core data structures through a game:
//!
//! - [`Game`] - Falling piece state machine (drop timer, grace period, lock, hold)
//! - [`GameConfig`] - Field size, timing and leveling rules
//! - [`GameStats`] - Score, level and line statistics
//! - [`PieceQueue`] - 7-bag piece generation and hold slot
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`InputEvent`] - Discrete player actions
//!
//! # Game Flow
//!
//! A host advances the game with two entry points:
//!
//! 1. [`Game::update`] with the time elapsed since the previous call, which
//!    runs every gravity tick that time implies
//! 2. [`Game::handle_input`] for each player action
//!
//! A piece falls one row per tick. When it cannot fall it enters a short grace
//! period; an accepted move or rotation ends the grace period, otherwise the
//! next tick locks the piece, clears full rows, scores and spawns the next
//! piece. Locking a piece with a cell above the field ends the game.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Game, GameConfig, InputEvent, PieceSeed};
//!
//! let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
//! let mut game = Game::new(GameConfig::default(), seed).unwrap();
//!
//! game.handle_input(InputEvent::RotateCw);
//! game.handle_input(InputEvent::HardDrop);
//!
//! // the dropped piece touches down, waits out its grace period and locks
//! for _ in 0..10 {
//!     if let Some(over) = game.update(Duration::from_millis(100)) {
//!         println!("Game over with {} points", over.score);
//!     }
//! }
//! assert_eq!(game.stats().completed_pieces(), 1);
//! ```

pub use self::{game::*, game_config::*, game_stats::*, input::*, piece_queue::*};

mod game;
mod game_config;
mod game_stats;
mod input;
mod piece_queue;
