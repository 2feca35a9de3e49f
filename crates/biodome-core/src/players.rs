//! Connected-player roster — names, room assignment, readiness.

use serde::{Deserialize, Serialize};

use biodome_logic::rooms::RoomId;

use crate::error::JoinError;

/// Opaque player identifier, assigned at join.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// One connected player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Unique among active players, immutable once claimed.
    pub name: String,
    pub room: Option<RoomId>,
    pub ready: bool,
}

/// All connected players.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    next_id: u32,
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a seat under `name`. Fails on empty or duplicate names and
    /// once `cap` players are connected.
    pub fn join(&mut self, name: &str, cap: usize) -> Result<PlayerId, JoinError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(JoinError::EmptyName);
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(JoinError::NameTaken(name.to_string()));
        }
        if self.players.len() >= cap {
            return Err(JoinError::GameFull(cap));
        }
        let id = PlayerId(self.next_id);
        self.next_id += 1;
        self.players.push(Player {
            id,
            name: name.to_string(),
            room: None,
            ready: false,
        });
        Ok(id)
    }

    /// Remove a player, returning their record (room release is the
    /// board's job).
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(idx))
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn name_of(&self, id: PlayerId) -> Option<&str> {
        self.get(id).map(|p| p.name.as_str())
    }

    /// Players counting toward the start condition: ready with a room.
    pub fn ready_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.ready && p.room.is_some())
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn clear(&mut self) {
        self.players.clear();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_unique_names_and_cap() {
        let mut roster = Roster::new();
        let a = roster.join("ada", 4).unwrap();
        assert_eq!(roster.name_of(a), Some("ada"));
        assert_eq!(
            roster.join("ada", 4),
            Err(JoinError::NameTaken("ada".to_string()))
        );
        assert_eq!(roster.join("   ", 4), Err(JoinError::EmptyName));

        roster.join("brin", 4).unwrap();
        roster.join("cleo", 4).unwrap();
        roster.join("dmitri", 4).unwrap();
        assert_eq!(roster.join("edie", 4), Err(JoinError::GameFull(4)));
    }

    #[test]
    fn test_name_trimmed_on_join() {
        let mut roster = Roster::new();
        let id = roster.join("  ada  ", 4).unwrap();
        assert_eq!(roster.name_of(id), Some("ada"));
        assert!(roster.join("ada", 4).is_err());
    }

    #[test]
    fn test_ready_count_requires_room() {
        let mut roster = Roster::new();
        let a = roster.join("ada", 4).unwrap();
        let b = roster.join("brin", 4).unwrap();
        roster.get_mut(a).unwrap().ready = true;
        assert_eq!(roster.ready_count(), 0); // ready but no room
        roster.get_mut(a).unwrap().room = Some(RoomId::Energy);
        roster.get_mut(b).unwrap().room = Some(RoomId::Water);
        roster.get_mut(b).unwrap().ready = true;
        assert_eq!(roster.ready_count(), 2);
    }

    #[test]
    fn test_remove_frees_the_name() {
        let mut roster = Roster::new();
        let a = roster.join("ada", 4).unwrap();
        roster.remove(a).unwrap();
        assert!(roster.join("ada", 4).is_ok());
    }
}
