//! Core game logic module - pure, deterministic, and testable
//!
//! Rules of a connect-the-pair tile game: two tiles with the same symbol
//! can be cleared when a path with at most two right-angle turns joins them
//! through empty cells (or through the ring of space around the board).
//!
//! Nothing here renders, reads input or sleeps. The session is advanced by
//! the caller's clock, so the same seed and the same sequence of calls always
//! produce the same game.
//!
//! # Module Structure
//!
//! - [`grid`]: the board and its cells, the only registry of tile locations
//! - [`connect`]: path finding between two tiles, hints and dead-board detection
//! - [`compaction`]: sliding tiles into holes after a clear, per [`types::ShiftMode`]
//! - [`generator`]: symbol multiset, board population and reshuffles
//! - [`rng`]: seeded random source
//! - [`levels`]: level progression and JSON level files
//! - [`game_state`]: match sequencing, tap selection, timers and events
//! - [`snapshot`]: serializable view of a session
//!
//! # Example
//!
//! ```
//! use onet_core::{GameState, SimpleRng};
//! use onet_core::types::{LevelConfig, ShiftMode};
//!
//! let config = LevelConfig::new(6, 4, 6, ShiftMode::Up);
//! let mut game = GameState::new(config, SimpleRng::new(12345)).unwrap();
//!
//! // There is always a pair to clear on a fresh board
//! let hint = game.hint().unwrap();
//! assert!(game.request_match(hint.a, hint.b).accepted);
//!
//! // Let the connector, compaction and settle delays play out
//! game.tick(1_000);
//! assert!(game.can_select());
//! assert_eq!(game.grid().tile_count(), 22);
//! ```
//!
//! # Timing
//!
//! - **Disappear**: 300ms connector display before the pair is removed
//! - **Shift**: 200ms between the two passes of a staged compaction
//! - **Settle**: 2 x shift before the board is checked for a remaining match
//! - **Shuffle**: 300ms reshuffle animation
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with elapsed time.

pub mod compaction;
pub mod connect;
pub mod game_state;
pub mod generator;
pub mod grid;
pub mod levels;
pub mod rng;
pub mod snapshot;

pub use onet_types as types;

// Re-export commonly used types for convenience
pub use compaction::{CompactionEngine, Stage, TileMove};
pub use connect::{all_matches, find_any_match, has_any_match, try_connect, Hint};
pub use game_state::{GameEvent, GameState, MatchResult, Phase, TapOutcome};
pub use generator::{BoardGenerator, GenerateError, ShuffleOutcome};
pub use grid::Grid;
pub use levels::{LevelDatabase, LevelsError};
pub use rng::{RandomSource, SimpleRng};
pub use snapshot::{GameSnapshot, PhaseKind};
