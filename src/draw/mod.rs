//! Draw engine
//!
//! Owns the shuffled number pool, the draw history and the player count.
//! This module must stay pure:
//! - Randomness only through the RNG passed in
//! - Time only through the timestamp passed in
//! - No storage or platform dependencies

pub mod engine;
pub mod shuffle;
pub mod state;

pub use engine::{DrawTicket, parse_player_count};
pub use shuffle::{fisher_yates, shuffled_pool};
pub use state::{DrawPhase, DrawRecord, DrawSession, RecordId};
