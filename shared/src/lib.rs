//! Wire protocol and world configuration shared by the arena server and its clients.

pub mod config;
pub mod protocol;
