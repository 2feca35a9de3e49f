//! Pure game logic for the biodome cooperative escape game.
//!
//! This crate contains all game rules that are independent of any storage,
//! transport, or runtime. Functions take plain data and return results,
//! making them unit-testable and portable across the stateful engine, the
//! headless harness, and any future frontend.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Initial metric values, completion thresholds, session rules |
//! | [`metrics`] | The five shared environmental metrics, bounds-clamped mutation |
//! | [`rooms`] | Room identity and the fixed unlock ordering |
//! | [`puzzles`] | Per-room puzzle actions, payload parsing, pure handlers |
//! | [`victory`] | End-of-game evaluation and the secret-code shortcut |

pub mod constants;
pub mod metrics;
pub mod puzzles;
pub mod rooms;
pub mod victory;
