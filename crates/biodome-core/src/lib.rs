//! Stateful engine for the biodome cooperative escape game.
//!
//! All shared game state (players, rooms, metrics, session) lives behind a
//! single serialization boundary owned by [`engine::GameEngine`]. Pure
//! transitions come from `biodome-logic`; this crate adds occupancy and
//! lifecycle bookkeeping, the countdown task, outbound events, and the
//! persistence record.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`board`] | Room lock/completion/occupancy state and the unlock cascade |
//! | [`config`] | Engine configuration (round duration, start threshold, caps) |
//! | [`engine`] | The serialization boundary and every public game operation |
//! | [`error`] | Boundary error taxonomy; `Display` strings are player feedback |
//! | [`events`] | Outbound notifications and the `EventSink` seam |
//! | [`persistence`] | Versioned save record, bincode codec, `StateStore` seam |
//! | [`players`] | Connected-player roster: names, room assignment, readiness |
//! | [`session`] | Start flag, deadline, write-once result, generation counter |
//! | [`snapshot`] | Full consistent poll read for clients |

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod persistence;
pub mod players;
pub mod session;
pub mod snapshot;

pub use config::GameConfig;
pub use engine::{ActionResponse, CodeOutcome, GameEngine};
pub use error::{ActionError, JoinError, StoreError};
pub use events::{EventSink, GameEvent, NullSink, RecordingSink};
pub use persistence::{MemoryStore, PersistedGame, StateStore};
pub use players::PlayerId;
pub use snapshot::Snapshot;
