//! Error type shared by the draw engine and persistence layer

use thiserror::Error;

use crate::draw::RecordId;

pub type Result<T> = std::result::Result<T, DrawError>;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("Invalid player count: {0} (need 2 to 10000 players)")]
    InvalidPlayerCount(String),

    #[error("No numbers remaining")]
    NoNumbersRemaining,

    #[error("A draw is already in progress")]
    DrawInProgress,

    #[error("No active session")]
    NoActiveSession,

    #[error("No draw in progress")]
    NoPendingDraw,

    #[error("Draw record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("Corrupt session state: {0}")]
    CorruptState(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}
