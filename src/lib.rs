//! Cricket Draw - a unique random number for every player
//!
//! Core modules:
//! - `draw`: Draw engine (shuffled pool, draw history, renames)
//! - `persistence`: Save/load of the session to a key-value store
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Reveal timing preferences

pub mod draw;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod settings;

pub use draw::{DrawRecord, DrawSession, RecordId};
pub use error::{DrawError, Result};
pub use persistence::{KeyValueStore, MemoryStore, SessionStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Storage key for the draw session. Bump the version when the stored
    /// shape changes; old payloads are then never read.
    pub const STORAGE_KEY: &str = "cricket_draw_state_v2";
    /// Storage key for settings
    pub const SETTINGS_KEY: &str = "cricket_draw_settings";

    /// Smallest number of players a draw can start with
    pub const MIN_PLAYERS: u32 = 2;
    /// Largest number of players a draw can start with
    pub const MAX_PLAYERS: u32 = 10_000;

    /// Name used when a rename is blank
    pub const DEFAULT_PLAYER_NAME: &str = "Player";
    /// Default record names are this prefix plus the 1-based draw index
    pub const DEFAULT_NAME_PREFIX: &str = "P";
}
