// src/engine/mod.rs

//! Orchestration of a whole run.
//!
//! The [`Sequencer`] takes the fully sorted entry list and drives one entry
//! at a time through spawn, relay, wait and decode, halting on the first
//! non-success [`Outcome`](crate::exec::Outcome).

pub mod sequencer;
pub mod state;

pub use sequencer::Sequencer;
pub use state::SequenceState;
