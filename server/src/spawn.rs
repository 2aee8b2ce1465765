//! Collision-free spawn placement.
//!
//! Positions are sampled uniformly over the world until one is found whose box
//! overlaps no occupant. Sampling is bounded by an attempt budget so a
//! saturated world rejects the spawn instead of spinning forever.
//!
//! The check runs against the occupants passed in. Callers that can see
//! concurrent inserts must hold the registry exclusively; in this server the
//! game loop owns the registry so that is always the case.

use crate::error::SpawnError;
use crate::geometry::{overlaps, Position};
use arena_shared::config::WorldConfig;
use rand::Rng;

/// Default number of samples before giving up on a spawn.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Find a spawn position whose box overlaps none of `occupants`.
pub fn find_spawn(
    occupants: &[Position],
    world: &WorldConfig,
    rng: &mut impl Rng,
    max_attempts: u32,
) -> Result<Position, SpawnError> {
    let size = world.entity_size;
    for _ in 0..max_attempts {
        let candidate = Position {
            x: rng.gen_range(0.0..world.max_x()),
            y: rng.gen_range(0.0..world.max_y()),
        };
        if !occupants.iter().any(|&other| overlaps(candidate, other, size)) {
            return Ok(candidate);
        }
    }
    Err(SpawnError::Exhausted {
        attempts: max_attempts,
    })
}
