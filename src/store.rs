//! In-memory persistence with transactional write units.
//!
//! All state lives behind one process-wide `RwLock`; the [`Store`] handle is
//! cheap to clone and every clone shares the same tables, so request
//! handlers check the store out per operation instead of holding it across
//! unrelated work. Writes go through [`Store::transaction`], which stages
//! them on a working copy of the tables and publishes the copy only when the
//! whole unit succeeds. A failure at any step drops the working copy, so a
//! concurrent reader never observes a partially applied unit.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use crate::models::{MatchId, MatchRecord, NewMatchRecord, Player, PlayerId, PlayerStatus};

/// Errors from the persistence substrate, distinct from domain validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// The store lock was poisoned by a panicked writer.
    LockPoisoned,
    /// A write targeted a player row that does not exist.
    PlayerRowMissing(PlayerId),
    /// An injected write fault (see [`Store::with_write_fault`]).
    WriteFault,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::LockPoisoned => write!(f, "store lock poisoned"),
            StoreError::PlayerRowMissing(id) => write!(f, "no player row with id {}", id),
            StoreError::WriteFault => write!(f, "injected write fault"),
        }
    }
}

/// The tables: player rows by id and match rows by id. Match ids increase in
/// insertion order, so id order is chronological order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tables {
    pub users: BTreeMap<PlayerId, Player>,
    pub matches: BTreeMap<MatchId, MatchRecord>,
    next_player_id: PlayerId,
    next_match_id: MatchId,
}

impl Tables {
    /// Look up an active player. Deactivated rows are invisible here;
    /// queries that want them go through `player_row`.
    pub fn active_player(&self, id: PlayerId) -> Option<&Player> {
        self.users.get(&id).filter(|p| p.is_active())
    }

    /// Look up a player row regardless of lifecycle state (used when joining
    /// match history, which must still render deactivated players).
    pub fn player_row(&self, id: PlayerId) -> Option<&Player> {
        self.users.get(&id)
    }

    pub fn username_taken(&self, username: &str) -> bool {
        self.users
            .values()
            .any(|p| p.username.eq_ignore_ascii_case(username))
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.users
            .values()
            .any(|p| p.email.eq_ignore_ascii_case(email))
    }
}

/// Process-wide store handle with scoped checkout.
#[derive(Clone, Debug, Default)]
pub struct Store {
    tables: Arc<RwLock<Tables>>,
    /// When set, the nth write applied inside a transaction fails (1-based).
    write_fault: Option<u32>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose transactions fail on the `nth_write`-th write.
    ///
    /// Test support for exercising rollback: the failing write behaves like
    /// a storage fault mid-unit, and the whole unit must be undone.
    pub fn with_write_fault(nth_write: u32) -> Self {
        Self {
            tables: Arc::default(),
            write_fault: Some(nth_write),
        }
    }

    /// Shared read access to committed state.
    pub(crate) fn tables(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::LockPoisoned)
    }

    /// Run `f` as one atomic unit: every write lands, or none do.
    ///
    /// Writes are staged on a working copy of the tables and are visible to
    /// reads within the same unit. The copy replaces the committed tables
    /// only when `f` returns `Ok`; any error rolls the unit back.
    pub fn transaction<T, E>(&self, f: impl FnOnce(&mut Transaction<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut working = guard.clone();
        let mut tx = Transaction {
            tables: &mut working,
            writes: 0,
            write_fault: self.write_fault,
        };
        let out = f(&mut tx)?;
        *guard = working;
        Ok(out)
    }
}

/// An open write unit. Dropped without commit when any operation fails.
pub struct Transaction<'a> {
    tables: &'a mut Tables,
    writes: u32,
    write_fault: Option<u32>,
}

impl Transaction<'_> {
    /// Staged state of this unit (earlier writes included).
    pub(crate) fn tables(&self) -> &Tables {
        self.tables
    }

    fn write_applied(&mut self) -> Result<(), StoreError> {
        self.writes += 1;
        if self.write_fault == Some(self.writes) {
            return Err(StoreError::WriteFault);
        }
        Ok(())
    }

    /// Insert a new player row with a fresh id.
    pub fn insert_player(
        &mut self,
        username: String,
        email: String,
        avatar: Option<String>,
    ) -> Result<Player, StoreError> {
        self.write_applied()?;
        self.tables.next_player_id += 1;
        let player = Player::new(self.tables.next_player_id, username, email, avatar);
        self.tables.users.insert(player.id, player.clone());
        Ok(player)
    }

    /// Insert a match row; the store assigns the id and the timestamp.
    pub fn insert_match(&mut self, new: NewMatchRecord) -> Result<MatchId, StoreError> {
        self.write_applied()?;
        self.tables.next_match_id += 1;
        let id = self.tables.next_match_id;
        self.tables.matches.insert(
            id,
            MatchRecord {
                id,
                player1_id: new.player1_id,
                player2_id: new.player2_id,
                winner_id: new.winner_id,
                loser_id: new.loser_id,
                player1_rating_before: new.player1_rating_before,
                player2_rating_before: new.player2_rating_before,
                player1_rating_after: new.player1_rating_after,
                player2_rating_after: new.player2_rating_after,
                rating_change: new.rating_change,
                game_type: new.game_type,
                game_duration: new.game_duration,
                match_date: chrono::Utc::now(),
                notes: new.notes,
            },
        );
        Ok(id)
    }

    /// Write one match outcome to a player row: absolute new rating plus
    /// counter increments.
    pub fn apply_match_result(
        &mut self,
        player_id: PlayerId,
        new_rating: i32,
        won: bool,
    ) -> Result<(), StoreError> {
        self.write_applied()?;
        let player = self
            .tables
            .users
            .get_mut(&player_id)
            .ok_or(StoreError::PlayerRowMissing(player_id))?;
        player.apply_match(new_rating, won);
        Ok(())
    }

    /// Overwrite identity fields on a player row. Rating and counters are
    /// not reachable from here.
    pub fn update_identity(
        &mut self,
        player_id: PlayerId,
        username: Option<String>,
        email: Option<String>,
        avatar: Option<Option<String>>,
    ) -> Result<Player, StoreError> {
        self.write_applied()?;
        let player = self
            .tables
            .users
            .get_mut(&player_id)
            .ok_or(StoreError::PlayerRowMissing(player_id))?;
        if let Some(username) = username {
            player.username = username;
        }
        if let Some(email) = email {
            player.email = email;
        }
        if let Some(avatar) = avatar {
            player.avatar = avatar;
        }
        Ok(player.clone())
    }

    /// Mark a player row deactivated.
    pub fn deactivate_player(&mut self, player_id: PlayerId) -> Result<(), StoreError> {
        self.write_applied()?;
        let player = self
            .tables
            .users
            .get_mut(&player_id)
            .ok_or(StoreError::PlayerRowMissing(player_id))?;
        player.status = PlayerStatus::Deactivated;
        Ok(())
    }
}
