//! Room board — lock, completion, and occupancy state for the four rooms.
//!
//! Completion and unlocking are monotonic until a full reset rebuilds the
//! board. The unlock cascade here is the only mechanism that clears a lock.

use serde::{Deserialize, Serialize};

use biodome_logic::rooms::RoomId;

use crate::players::PlayerId;

/// State of one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomState {
    pub id: RoomId,
    pub locked: bool,
    pub completed: bool,
    pub occupant: Option<PlayerId>,
}

/// The four rooms in unlock order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomBoard {
    rooms: [RoomState; 4],
}

impl RoomBoard {
    /// Initial topology: first room unlocked, the rest locked.
    pub fn new() -> Self {
        let mut rooms = RoomId::ORDER.map(|id| RoomState {
            id,
            locked: true,
            completed: false,
            occupant: None,
        });
        rooms[0].locked = false;
        Self { rooms }
    }

    pub fn room(&self, id: RoomId) -> &RoomState {
        &self.rooms[Self::index(id)]
    }

    fn room_mut(&mut self, id: RoomId) -> &mut RoomState {
        &mut self.rooms[Self::index(id)]
    }

    fn index(id: RoomId) -> usize {
        match id {
            RoomId::Energy => 0,
            RoomId::Water => 1,
            RoomId::Air => 2,
            RoomId::Flora => 3,
        }
    }

    /// Claim `id` for `player`.
    ///
    /// Re-claiming one's own room is idempotent. Claiming a new room
    /// releases the player's previous one first (at most one room per
    /// player). Fails with the current occupant if someone else holds it.
    pub fn claim(&mut self, id: RoomId, player: PlayerId) -> Result<Option<RoomId>, PlayerId> {
        match self.room(id).occupant {
            Some(current) if current != player => return Err(current),
            Some(_) => return Ok(None),
            None => {}
        }
        let released = self.release_any(player);
        self.room_mut(id).occupant = Some(player);
        Ok(released)
    }

    /// Clear the occupant of `id` only if it matches `player`.
    pub fn release(&mut self, id: RoomId, player: PlayerId) {
        let room = self.room_mut(id);
        if room.occupant == Some(player) {
            room.occupant = None;
        }
    }

    /// Release whichever room `player` holds, if any.
    pub fn release_any(&mut self, player: PlayerId) -> Option<RoomId> {
        for room in &mut self.rooms {
            if room.occupant == Some(player) {
                room.occupant = None;
                return Some(room.id);
            }
        }
        None
    }

    /// Mark `id` completed and run the unlock cascade.
    ///
    /// Idempotent: an already-completed room stays completed and cascades
    /// nothing. Returns the room newly unlocked by a fresh completion.
    pub fn mark_completed(&mut self, id: RoomId) -> Option<RoomId> {
        if self.room(id).completed {
            return None;
        }
        self.room_mut(id).completed = true;
        let next = id.next()?;
        let next_room = self.room_mut(next);
        if next_room.locked {
            next_room.locked = false;
            return Some(next);
        }
        None
    }

    /// Whether `player` may act in `id` right now: they must occupy it,
    /// and once the game has started a locked room rejects all actions.
    pub fn is_actionable(&self, id: RoomId, player: PlayerId, game_started: bool) -> bool {
        let room = self.room(id);
        room.occupant == Some(player) && (!game_started || !room.locked)
    }

    pub fn all_completed(&self) -> bool {
        self.rooms.iter().all(|r| r.completed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomState> {
        self.rooms.iter()
    }
}

impl Default for RoomBoard {
    fn default() -> Self {
        Self::new()
    }
}
