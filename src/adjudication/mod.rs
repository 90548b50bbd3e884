// Copyright 2025 Cowboy AI, LLC.

//! Adjudication: observers that react to the simulation
//!
//! The game master injects narrative events from state snapshots; the
//! regulator inspects newly appended events and emits consequences. Neither
//! ever mutates state; every output is an event appended by the engine.

pub mod game_master;
pub mod regulator;

pub use game_master::{AdjudicationHook, GameMaster};
pub use regulator::Regulator;
