//! Poll snapshot — one consistent read of the full game for polling clients.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use biodome_logic::metrics::MetricSet;
use biodome_logic::rooms::RoomId;
use biodome_logic::victory::GameResult;

use crate::board::RoomBoard;
use crate::players::Roster;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub room: Option<RoomId>,
    pub is_ready: bool,
    /// Ready, assigned, and the assigned room is unlocked.
    pub can_enter_room: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomView {
    pub id: RoomId,
    pub is_locked: bool,
    pub is_completed: bool,
    pub occupant: Option<String>,
}

/// A full consistent read of current state, taken under the state lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub players: Vec<PlayerView>,
    pub rooms: Vec<RoomView>,
    pub metrics: BTreeMap<String, f32>,
    pub has_started: bool,
    pub remaining_secs: u64,
    pub result: Option<GameResult>,
}

impl Snapshot {
    pub(crate) fn build(
        roster: &Roster,
        board: &RoomBoard,
        metrics: &MetricSet,
        has_started: bool,
        remaining_secs: u64,
        result: Option<GameResult>,
    ) -> Self {
        let players = roster
            .iter()
            .map(|p| {
                let can_enter_room = p.ready
                    && p.room
                        .map(|room| !board.room(room).locked)
                        .unwrap_or(false);
                PlayerView {
                    name: p.name.clone(),
                    room: p.room,
                    is_ready: p.ready,
                    can_enter_room,
                }
            })
            .collect();
        let rooms = board
            .iter()
            .map(|r| RoomView {
                id: r.id,
                is_locked: r.locked,
                is_completed: r.completed,
                occupant: r.occupant.and_then(|id| roster.name_of(id).map(String::from)),
            })
            .collect();
        let metrics = metrics
            .all()
            .iter()
            .map(|(m, v)| (m.as_str().to_string(), *v))
            .collect();
        Self {
            players,
            rooms,
            metrics,
            has_started,
            remaining_secs,
            result,
        }
    }

    pub fn room(&self, id: RoomId) -> Option<&RoomView> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn player(&self, name: &str) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.name == name)
    }
}
