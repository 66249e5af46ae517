//! Session snapshot format and the session store
//!
//! Wire format (camelCase JSON, one value under one key):
//! `{"active":true,"totalPlayers":11,"availableNumbers":[..],"historyStore":[..]}`
//!
//! There is no migration. Changing the shape means bumping the key, so old
//! payloads are simply never read again.

use serde::{Deserialize, Serialize};

use super::store::KeyValueStore;
use crate::consts::STORAGE_KEY;
use crate::draw::{DrawRecord, DrawSession};
use crate::error::{DrawError, Result};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    active: bool,
    total_players: u32,
    available_numbers: &'a [u32],
    history_store: &'a [DrawRecord],
}

// Any field may be missing; an inactive snapshot needs none of them
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    #[serde(default)]
    active: bool,
    #[serde(default)]
    total_players: i64,
    #[serde(default)]
    available_numbers: Option<Vec<u32>>,
    #[serde(default)]
    history_store: Option<Vec<DrawRecord>>,
}

/// Serialize a session. The in-flight draw flag is not stored.
pub fn encode(session: &DrawSession) -> Result<String> {
    let snapshot = SnapshotRef {
        active: session.is_active(),
        total_players: session.total_players(),
        available_numbers: session.available_numbers(),
        history_store: session.history(),
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Parse a stored payload.
///
/// `Ok(None)` for a well-formed but inactive snapshot, `Err` when the payload
/// cannot be parsed or breaks the pool/history invariant.
pub fn decode(json: &str) -> Result<Option<DrawSession>> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    if !snapshot.active || snapshot.total_players <= 0 {
        return Ok(None);
    }

    let total_players = u32::try_from(snapshot.total_players).map_err(|_| {
        DrawError::CorruptState(format!("total players {} too large", snapshot.total_players))
    })?;
    let available = snapshot.available_numbers.unwrap_or_default();
    let history = snapshot.history_store.unwrap_or_default();
    DrawSession::from_parts(total_players, available, history).map(Some)
}

/// Persists one draw session under a fixed key
#[derive(Debug)]
pub struct SessionStore<S> {
    store: S,
    key: &'static str,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: &'static str) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Overwrite the stored snapshot with `session`
    pub fn save(&mut self, session: &DrawSession) -> Result<()> {
        let json = encode(session)?;
        self.store.set(self.key, &json)?;
        log::info!(
            "Draw saved ({} of {} remaining)",
            session.available_numbers().len(),
            session.total_players()
        );
        Ok(())
    }

    /// Load the stored session, if there is an active one.
    ///
    /// A payload that fails to parse is deleted before returning `None`.
    pub fn load(&mut self) -> Option<DrawSession> {
        let json = match self.store.get(self.key) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("No saved draw found");
                return None;
            }
            Err(e) => {
                log::warn!("Failed to read saved draw: {}", e);
                return None;
            }
        };

        match decode(&json) {
            Ok(Some(session)) => {
                log::info!(
                    "Loaded saved draw ({} of {} drawn)",
                    session.history().len(),
                    session.total_players()
                );
                Some(session)
            }
            Ok(None) => {
                log::info!("Saved draw is not active");
                None
            }
            Err(e) => {
                log::warn!("Discarding corrupt saved draw: {}", e);
                if let Err(e) = self.store.remove(self.key) {
                    log::warn!("Failed to remove corrupt saved draw: {}", e);
                }
                None
            }
        }
    }

    /// Delete the stored snapshot
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(self.key)?;
        log::info!("Saved draw cleared");
        Ok(())
    }
}
