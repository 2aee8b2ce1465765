//! One fixed-tick simulation step.
//!
//! Players are processed one at a time in ascending connection id order. Each
//! player's displacement is either accepted whole or reverted whole: the
//! candidate position (integrated, then clamped to the world) is checked
//! against every other player's *current* position, which for lower ids is
//! already this tick's result. Any overlap reverts the position. Velocity is
//! never touched, so a blocked player retries every tick.
//!
//! The pass is order dependent: a follower with a lower id than its leader is
//! blocked for one tick where the reverse order would let both move. Fixing
//! the order by id makes the outcome reproducible.
//!
//! Cost is O(n²) in the number of players, fine for tens of players.

use crate::geometry::{clamp, in_bounds, overlaps, Position};
use crate::registry::PlayerRegistry;

/// Outcome counters for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Players whose position changed
    pub moved: usize,
    /// Players whose displacement was reverted due to an overlap
    pub blocked: usize,
}

/// Advance every player by one tick.
pub fn step(registry: &mut PlayerRegistry) -> TickReport {
    let world = *registry.world();
    let size = world.entity_size;
    let mut report = TickReport::default();

    let ids = registry.ids();
    let players = registry.players_mut();

    for id in ids {
        let Some(player) = players.get(&id) else {
            continue;
        };
        let original = player.position;
        let candidate = clamp(
            Position {
                x: original.x + player.velocity.vx,
                y: original.y + player.velocity.vy,
            },
            &world,
        );

        let blocked = players
            .iter()
            .any(|(&other_id, other)| other_id != id && overlaps(candidate, other.position, size));

        if blocked {
            report.blocked += 1;
        } else if candidate != original {
            if let Some(player) = players.get_mut(&id) {
                player.position = candidate;
            }
            report.moved += 1;
        }
    }

    debug_assert!(
        players.values().all(|p| in_bounds(p.position, &world)),
        "player left the world during a tick"
    );

    report
}
