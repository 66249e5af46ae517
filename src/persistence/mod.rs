//! Save/load of the draw session
//!
//! Features:
//! - Single JSON snapshot under a versioned key
//! - Overwritten after every mutation, never batched
//! - Corrupt snapshots are discarded, not repaired

pub mod snapshot;
pub mod store;

pub use snapshot::{SessionStore, decode, encode};
pub use store::{KeyValueStore, MemoryStore};
