//! Draw engine operations
//!
//! Every operation is an instant state transition on a [`DrawSession`].
//! Reveal animation timing belongs to the caller: it begins a draw, plays
//! placeholders for as long as it likes, then completes the draw.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::shuffle::shuffled_pool;
use super::state::{DrawPhase, DrawRecord, DrawSession, RecordId};
use crate::consts::{DEFAULT_NAME_PREFIX, DEFAULT_PLAYER_NAME, MAX_PLAYERS, MIN_PLAYERS};
use crate::error::{DrawError, Result};

/// Proof that a draw was begun. Move-only, so one begun draw commits once.
#[derive(Debug)]
#[must_use = "a begun draw must be completed"]
pub struct DrawTicket {
    generation: u64,
}

/// Parse the raw player-count text typed by the user
pub fn parse_player_count(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    let count: i64 = trimmed
        .parse()
        .map_err(|_| DrawError::InvalidPlayerCount(trimmed.to_string()))?;
    validate_player_count(count)
}

fn validate_player_count(count: i64) -> Result<u32> {
    match u32::try_from(count) {
        Ok(n) if (MIN_PLAYERS..=MAX_PLAYERS).contains(&n) => Ok(n),
        _ => Err(DrawError::InvalidPlayerCount(count.to_string())),
    }
}

impl DrawSession {
    /// Start a new session with a freshly shuffled pool of 1..=total_players
    pub fn start<R: Rng + ?Sized>(total_players: u32, rng: &mut R) -> Result<Self> {
        let total_players = validate_player_count(i64::from(total_players))?;
        let session = Self {
            active: true,
            total_players,
            available_numbers: shuffled_pool(total_players, rng),
            history: Vec::new(),
            phase: DrawPhase::Idle,
            generation: 0,
        };
        log::info!("Draw started for {} players", total_players);
        Ok(session)
    }

    /// Start with a reproducible shuffle
    pub fn start_seeded(total_players: u32, seed: u64) -> Result<Self> {
        let mut rng = Pcg32::seed_from_u64(seed);
        Self::start(total_players, &mut rng)
    }

    /// Replace this session with a new one. On error nothing changes.
    pub fn restart<R: Rng + ?Sized>(&mut self, total_players: u32, rng: &mut R) -> Result<()> {
        let mut session = Self::start(total_players, rng)?;
        session.generation = self.generation.wrapping_add(1);
        *self = session;
        Ok(())
    }

    /// First half of a draw: reserve the single in-flight draw slot
    pub fn begin_draw(&mut self) -> Result<DrawTicket> {
        if !self.active {
            return Err(DrawError::NoActiveSession);
        }
        if self.available_numbers.is_empty() {
            return Err(DrawError::NoNumbersRemaining);
        }
        if self.phase == DrawPhase::Drawing {
            return Err(DrawError::DrawInProgress);
        }
        self.phase = DrawPhase::Drawing;
        Ok(DrawTicket {
            generation: self.generation,
        })
    }

    /// Second half of a draw: pop the top of the pool and record it.
    /// `timestamp_ms` seeds the record id.
    pub fn complete_draw(&mut self, ticket: DrawTicket, timestamp_ms: u64) -> Result<DrawRecord> {
        if self.phase != DrawPhase::Drawing || ticket.generation != self.generation {
            return Err(DrawError::NoPendingDraw);
        }
        let id = self.next_record_id(timestamp_ms);
        self.phase = DrawPhase::Idle;
        let number = self
            .available_numbers
            .pop()
            .ok_or(DrawError::NoNumbersRemaining)?;

        let index = self.total_players as usize - self.available_numbers.len();
        let record = DrawRecord::new(id, format!("{}{}", DEFAULT_NAME_PREFIX, index), number);
        self.history.push(record.clone());

        log::debug!("Draw {} of {}: {}", index, self.total_players, number);
        Ok(record)
    }

    /// A throwaway number for the slot-machine effect while a reveal runs.
    /// `None` unless a draw is pending; never affects the real result.
    pub fn placeholder<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u32> {
        if self.phase != DrawPhase::Drawing {
            return None;
        }
        Some(rng.random_range(1..=self.total_players))
    }

    /// Begin and complete a draw in one step
    pub fn draw_next(&mut self, timestamp_ms: u64) -> Result<DrawRecord> {
        let ticket = self.begin_draw()?;
        self.complete_draw(ticket, timestamp_ms)
    }

    /// Rename a drawn slot. A blank name falls back to "Player".
    pub fn rename(&mut self, id: RecordId, new_name: &str) -> Result<()> {
        if !self.active {
            return Err(DrawError::NoActiveSession);
        }
        let record = self
            .history
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(DrawError::RecordNotFound(id))?;

        let trimmed = new_name.trim();
        let name = if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            trimmed
        };
        record.set_name(name.to_string());
        log::info!("Renamed draw {} to {:?}", id, name);
        Ok(())
    }

    /// Back to the uninitialized state
    pub fn reset(&mut self) {
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::default()
        };
        log::info!("Draw session reset");
    }

    /// (remaining, total)
    pub fn remaining_count(&self) -> (u32, u32) {
        (self.available_numbers.len() as u32, self.total_players)
    }

    fn next_record_id(&self, timestamp_ms: u64) -> RecordId {
        let floor = self
            .history
            .iter()
            .map(|r| r.id().as_millis().saturating_add(1))
            .max()
            .unwrap_or(0);
        RecordId::from_millis(timestamp_ms.max(floor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_three_player_scenario() {
        let mut session = DrawSession::start_seeded(3, 12345).unwrap();
        let mut pool = session.available_numbers().to_vec();
        pool.sort_unstable();
        assert_eq!(pool, vec![1, 2, 3]);
        assert_eq!(session.remaining_count(), (3, 3));

        let top = *session.available_numbers().last().unwrap();
        let first = session.draw_next(1000).unwrap();
        assert_eq!(first.name(), "P1");
        assert_eq!(first.number(), top);
        assert_eq!(session.available_numbers().len(), 2);
        assert_eq!(session.history().len(), 1);

        let second = session.draw_next(1001).unwrap();
        let third = session.draw_next(1002).unwrap();
        assert_eq!(second.name(), "P2");
        assert_eq!(third.name(), "P3");
        assert!(session.is_exhausted());

        let before = session.clone();
        assert!(matches!(
            session.draw_next(1003),
            Err(DrawError::NoNumbersRemaining)
        ));
        assert_eq!(session, before);
    }

    #[test]
    fn test_too_few_players() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(matches!(
            DrawSession::start(1, &mut rng),
            Err(DrawError::InvalidPlayerCount(_))
        ));
        assert!(matches!(
            DrawSession::start(0, &mut rng),
            Err(DrawError::InvalidPlayerCount(_))
        ));

        assert!(matches!(
            DrawSession::start(MAX_PLAYERS + 1, &mut rng),
            Err(DrawError::InvalidPlayerCount(_))
        ));
        assert!(DrawSession::start(u32::MAX, &mut rng).is_err());
        let largest = DrawSession::start(MAX_PLAYERS, &mut rng).unwrap();
        assert_eq!(largest.remaining_count(), (MAX_PLAYERS, MAX_PLAYERS));

        let mut session = DrawSession::default();
        assert!(session.restart(1, &mut rng).is_err());
        assert_eq!(session, DrawSession::default());
    }

    #[test]
    fn test_restart_failure_keeps_existing_session() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut session = DrawSession::start(4, &mut rng).unwrap();
        session.draw_next(10).unwrap();
        let before = session.clone();
        assert!(session.restart(0, &mut rng).is_err());
        assert_eq!(session, before);

        session.restart(6, &mut rng).unwrap();
        assert_eq!(session.remaining_count(), (6, 6));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_parse_player_count() {
        assert_eq!(parse_player_count(" 11 ").unwrap(), 11);
        assert_eq!(parse_player_count("2").unwrap(), 2);
        assert_eq!(parse_player_count("10000").unwrap(), MAX_PLAYERS);
        for bad in ["", "   ", "1", "0", "-4", "abc", "2.5", "99999999999", "10001", "4000000000"] {
            assert!(
                matches!(parse_player_count(bad), Err(DrawError::InvalidPlayerCount(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_second_draw_blocked_while_drawing() {
        let mut session = DrawSession::start_seeded(5, 3).unwrap();
        let ticket = session.begin_draw().unwrap();
        assert!(session.is_drawing());
        assert!(matches!(session.begin_draw(), Err(DrawError::DrawInProgress)));
        assert!(matches!(session.draw_next(5), Err(DrawError::DrawInProgress)));
        assert_eq!(session.remaining_count(), (5, 5));

        let record = session.complete_draw(ticket, 5).unwrap();
        assert_eq!(record.name(), "P1");
        assert!(!session.is_drawing());
        assert!(session.draw_next(6).is_ok());
    }

    #[test]
    fn test_placeholder_in_range() {
        let mut session = DrawSession::start_seeded(4, 9).unwrap();
        let mut rng = Pcg32::seed_from_u64(4);
        assert_eq!(session.placeholder(&mut rng), None);
        let ticket = session.begin_draw().unwrap();
        for _ in 0..100 {
            let n = session.placeholder(&mut rng).unwrap();
            assert!((1..=4).contains(&n));
        }
        // Placeholders never touch the pool
        assert_eq!(session.remaining_count(), (4, 4));
        session.complete_draw(ticket, 0).unwrap();
    }

    #[test]
    fn test_reset_cancels_pending_draw() {
        let mut session = DrawSession::start_seeded(3, 8).unwrap();
        let ticket = session.begin_draw().unwrap();
        session.reset();
        assert!(matches!(
            session.complete_draw(ticket, 1),
            Err(DrawError::NoPendingDraw)
        ));
        assert_eq!(session, DrawSession::default());
    }

    #[test]
    fn test_ticket_from_earlier_session_rejected() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut session = DrawSession::start(3, &mut rng).unwrap();
        let stale = session.begin_draw().unwrap();
        session.reset();
        session.restart(3, &mut rng).unwrap();

        let fresh = session.begin_draw().unwrap();
        assert!(matches!(
            session.complete_draw(stale, 1),
            Err(DrawError::NoPendingDraw)
        ));
        assert_eq!(session.remaining_count(), (3, 3));
        assert!(session.is_drawing());

        let record = session.complete_draw(fresh, 2).unwrap();
        assert_eq!(record.name(), "P1");
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_ticket_rejected_after_restart_mid_draw() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut session = DrawSession::start(4, &mut rng).unwrap();
        let stale = session.begin_draw().unwrap();
        session.restart(4, &mut rng).unwrap();
        let _fresh = session.begin_draw().unwrap();
        assert!(session.complete_draw(stale, 1).is_err());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_draw_without_session() {
        let mut session = DrawSession::default();
        assert!(matches!(session.draw_next(1), Err(DrawError::NoActiveSession)));
    }

    #[test]
    fn test_rename() {
        let mut session = DrawSession::start_seeded(4, 77).unwrap();
        let record = session.draw_next(500).unwrap();

        session.rename(record.id(), "  Sachin ").unwrap();
        assert_eq!(session.record(record.id()).unwrap().name(), "Sachin");

        session.rename(record.id(), "   ").unwrap();
        assert_eq!(session.record(record.id()).unwrap().name(), "Player");
        assert_eq!(session.record(record.id()).unwrap().number(), record.number());
    }

    #[test]
    fn test_rename_allows_duplicates() {
        let mut session = DrawSession::start_seeded(4, 77).unwrap();
        let a = session.draw_next(1).unwrap();
        let b = session.draw_next(2).unwrap();
        session.rename(a.id(), "Virat").unwrap();
        session.rename(b.id(), "Virat").unwrap();
        assert!(session.history().iter().all(|r| r.name() == "Virat"));
    }

    #[test]
    fn test_rename_unknown_record() {
        let mut session = DrawSession::start_seeded(4, 77).unwrap();
        session.draw_next(1).unwrap();
        let missing = RecordId::from_millis(999);
        assert!(matches!(
            session.rename(missing, "X"),
            Err(DrawError::RecordNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let mut session = DrawSession::start_seeded(10, 5).unwrap();
        let ids: HashSet<RecordId> = (0..10)
            .map(|_| session.draw_next(1_700_000_000_000).unwrap().id())
            .collect();
        assert_eq!(ids.len(), 10);
    }

    proptest! {
        #[test]
        fn prop_start_is_permutation(n in 2u32..200, seed in any::<u64>()) {
            let session = DrawSession::start_seeded(n, seed).unwrap();
            let mut pool = session.available_numbers().to_vec();
            pool.sort_unstable();
            prop_assert_eq!(pool, (1..=n).collect::<Vec<_>>());
            prop_assert!(session.history().is_empty());
            prop_assert!(session.is_active());
        }

        #[test]
        fn prop_draws_partition_numbers(n in 2u32..100, k_frac in 0.0f64..=1.0, seed in any::<u64>()) {
            let k = ((n as f64) * k_frac).floor() as u32;
            let mut session = DrawSession::start_seeded(n, seed).unwrap();
            for i in 0..k {
                session.draw_next(u64::from(i)).unwrap();
            }

            prop_assert_eq!(session.history().len(), k as usize);
            prop_assert_eq!(session.available_numbers().len(), (n - k) as usize);
            prop_assert!(session.validate().is_ok());

            let mut all: Vec<u32> = session.history().iter().map(|r| r.number()).collect();
            all.extend_from_slice(session.available_numbers());
            all.sort_unstable();
            prop_assert_eq!(all, (1..=n).collect::<Vec<_>>());
        }
    }
}
