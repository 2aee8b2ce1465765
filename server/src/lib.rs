//! Arena server library.
//!
//! This module exposes the server components for use in tests and binaries.

pub mod config;
pub mod error;
pub mod game_loop;
pub mod geometry;
pub mod player;
pub mod protocol;
pub mod registry;
pub mod simulation;
pub mod spawn;
pub mod ws;
