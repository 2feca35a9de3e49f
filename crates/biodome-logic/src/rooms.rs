//! Room identity and the fixed unlock ordering.
//!
//! Rooms form a total order. Completing the room at index `i` is the only
//! mechanism that unlocks the room at index `i + 1`.

use serde::{Deserialize, Serialize};

/// One of the four fixed puzzle rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomId {
    Energy,
    Water,
    Air,
    Flora,
}

impl RoomId {
    /// Rooms in unlock order. The first room starts unlocked.
    pub const ORDER: [RoomId; 4] = [RoomId::Energy, RoomId::Water, RoomId::Air, RoomId::Flora];

    /// Stable wire/storage name for this room.
    pub fn as_str(self) -> &'static str {
        match self {
            RoomId::Energy => "energy",
            RoomId::Water => "water",
            RoomId::Air => "air",
            RoomId::Flora => "flora",
        }
    }

    pub fn by_name(name: &str) -> Option<RoomId> {
        RoomId::ORDER.iter().copied().find(|r| r.as_str() == name)
    }

    /// The room this one's completion unlocks, if any.
    pub fn next(self) -> Option<RoomId> {
        let idx = RoomId::ORDER.iter().position(|&r| r == self)?;
        RoomId::ORDER.get(idx + 1).copied()
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_ordering() {
        assert_eq!(RoomId::Energy.next(), Some(RoomId::Water));
        assert_eq!(RoomId::Water.next(), Some(RoomId::Air));
        assert_eq!(RoomId::Air.next(), Some(RoomId::Flora));
        assert_eq!(RoomId::Flora.next(), None);
    }

    #[test]
    fn test_name_mapping() {
        for room in RoomId::ORDER {
            assert_eq!(RoomId::by_name(room.as_str()), Some(room));
        }
        assert_eq!(RoomId::by_name("greenhouse"), None);
    }
}
