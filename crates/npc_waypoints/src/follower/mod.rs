//! Waypoint following: FSM состояние NPC
//!
//! Idle → Walking (start) → advance по reach threshold → Idle (complete/stop).
//! Debounce после advance: счётчик кадров внутри PathFollower.

pub mod state;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod state_tests;

pub use state::*;
