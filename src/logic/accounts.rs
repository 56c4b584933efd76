//! Player accounts: registration, lookup, profile edits, leaderboard.
//!
//! Identity fields only; rating and game counters belong to the ledger.

use serde::Deserialize;

use crate::error::LadderError;
use crate::models::{LeaderboardEntry, Player, PlayerId};
use crate::store::Store;

/// Registration payload. Credentials are handled by whatever sits in front
/// of this service, so none are taken here.
#[derive(Clone, Debug, Deserialize)]
pub struct RegisterPlayer {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Profile edit: only provided fields change. `avatar: Some(None)` clears
/// the avatar.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, with = "double_option")]
    pub avatar: Option<Option<String>>,
}

/// Distinguishes an absent `avatar` key (keep) from `"avatar": null` (clear).
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(de).map(Some)
    }
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.avatar.is_none()
    }
}

/// Register a new player with the default rating and zeroed counters.
/// Username and email must be unique (checked inside the write unit).
pub fn register_player(store: &Store, req: &RegisterPlayer) -> Result<Player, LadderError> {
    store.transaction(|tx| {
        if tx.tables().username_taken(&req.username) {
            return Err(LadderError::DuplicateUsername);
        }
        if tx.tables().email_taken(&req.email) {
            return Err(LadderError::DuplicateEmail);
        }
        let player = tx.insert_player(req.username.clone(), req.email.clone(), req.avatar.clone())?;
        log::info!("Registered player {} ({})", player.id, player.username);
        Ok(player)
    })
}

/// An active player by id. Deactivated players read as absent.
pub fn find_player(store: &Store, id: PlayerId) -> Result<Option<Player>, LadderError> {
    let tables = store.tables()?;
    Ok(tables.active_player(id).cloned())
}

/// Page of active players in id order. `page` is 1-based (0 treated as 1);
/// `page_size` is clamped by the API layer.
pub fn list_players(store: &Store, page: u32, page_size: u32) -> Result<Vec<Player>, LadderError> {
    let tables = store.tables()?;
    let offset = (page.max(1) - 1) as usize * page_size as usize;
    Ok(tables
        .users
        .values()
        .filter(|p| p.is_active())
        .skip(offset)
        .take(page_size as usize)
        .cloned()
        .collect())
}

/// Top active players by rating. Players who have not played are excluded.
pub fn leaderboard(store: &Store, limit: u32) -> Result<Vec<LeaderboardEntry>, LadderError> {
    let tables = store.tables()?;
    let mut entries: Vec<LeaderboardEntry> = tables
        .users
        .values()
        .filter(|p| p.is_active() && p.games_played > 0)
        .map(LeaderboardEntry::from)
        .collect();
    entries.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.id.cmp(&b.id)));
    entries.truncate(limit as usize);
    Ok(entries)
}

/// Update identity fields on an active player. At least one field must be
/// present; uniqueness is re-checked for changed username/email.
pub fn update_profile(store: &Store, id: PlayerId, update: &ProfileUpdate) -> Result<Player, LadderError> {
    if update.is_empty() {
        return Err(LadderError::EmptyProfileUpdate);
    }
    store.transaction(|tx| {
        let current = tx
            .tables()
            .active_player(id)
            .ok_or(LadderError::PlayerNotFound(id))?
            .clone();
        if let Some(username) = &update.username {
            if !username.eq_ignore_ascii_case(&current.username) && tx.tables().username_taken(username) {
                return Err(LadderError::DuplicateUsername);
            }
        }
        if let Some(email) = &update.email {
            if !email.eq_ignore_ascii_case(&current.email) && tx.tables().email_taken(email) {
                return Err(LadderError::DuplicateEmail);
            }
        }
        let player = tx.update_identity(
            id,
            update.username.clone(),
            update.email.clone(),
            update.avatar.clone(),
        )?;
        Ok(player)
    })
}

/// Soft-delete: the player row stays (match history still joins against it)
/// but every active-only query stops seeing it.
pub fn deactivate_player(store: &Store, id: PlayerId) -> Result<(), LadderError> {
    store.transaction(|tx| {
        if tx.tables().active_player(id).is_none() {
            return Err(LadderError::PlayerNotFound(id));
        }
        tx.deactivate_player(id)?;
        log::info!("Deactivated player {}", id);
        Ok(())
    })
}
