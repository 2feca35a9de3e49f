//! Error taxonomy at the engine boundary.
//!
//! Every rejection carries a human-readable message via `Display`; the
//! transport layer forwards it as feedback. None of these propagate as
//! panics.

use thiserror::Error;

/// Rejections when claiming a seat in the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("display name is empty")]
    EmptyName,
    #[error("the name {0:?} is already taken")]
    NameTaken(String),
    #[error("game is full ({0} players max)")]
    GameFull(usize),
}

/// Rejections for in-game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unknown player")]
    UnknownPlayer,
    #[error("unknown room {0:?}")]
    UnknownRoom(String),
    #[error("room is occupied by {occupant}")]
    RoomOccupied { occupant: String },
    #[error("you do not occupy this room")]
    NotOccupant,
    #[error("this room is locked")]
    RoomLocked,
    #[error("select a room before readying up")]
    NoRoomSelected,
    #[error("malformed action payload: {0}")]
    MalformedPayload(String),
    #[error("action {action:?} is not available in the {room} room")]
    WrongRoomAction {
        room: biodome_logic::rooms::RoomId,
        action: &'static str,
    },
}

/// Failures at the persistence seam.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("save record codec failed: {0}")]
    Codec(String),
    #[error("unsupported save version {0}")]
    Version(u32),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
