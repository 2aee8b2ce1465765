//! Wire types come from `arena-shared`; this module adds the server-side
//! conversions.

pub use arena_shared::protocol::*;

use crate::player::Player;

impl From<&Player> for PlayerWire {
    fn from(player: &Player) -> Self {
        Self {
            x: player.position.x,
            y: player.position.y,
            vx: player.velocity.vx,
            vy: player.velocity.vy,
            color: color_hex(player.color),
            name: player.name.clone(),
        }
    }
}
