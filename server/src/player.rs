use crate::geometry::Position;
use arena_shared::protocol::{Direction, MAX_NAME_CHARS};
use rand::Rng;

/// Stable per-connection identifier. Also the registry key.
pub type ConnectionId = u32;

/// Per-tick displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

/// A registered player.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: ConnectionId,
    /// Set at registration, never changed
    pub name: String,
    pub position: Position,
    pub velocity: Velocity,
    /// 24-bit RGB
    pub color: u32,
}

impl Player {
    /// New player at rest at `position`.
    pub fn new(id: ConnectionId, name: String, position: Position, color: u32) -> Self {
        Self {
            id,
            name,
            position,
            velocity: Velocity::default(),
            color,
        }
    }

    /// Apply a movement intent. Each intent writes one velocity component,
    /// so the last intent received per axis wins.
    pub fn apply_intent(&mut self, direction: Direction, speed: f64) {
        match direction {
            Direction::Up => self.velocity.vy = -speed,
            Direction::Down => self.velocity.vy = speed,
            Direction::Left => self.velocity.vx = -speed,
            Direction::Right => self.velocity.vx = speed,
            Direction::StopUp | Direction::StopDown => self.velocity.vy = 0.0,
            Direction::StopLeft | Direction::StopRight => self.velocity.vx = 0.0,
        }
    }
}

/// Cut a requested name to its first `MAX_NAME_CHARS` characters, kept as
/// sent. Returns None for a name that is empty or only whitespace.
pub fn sanitize_name(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    Some(raw.chars().take(MAX_NAME_CHARS).collect())
}

/// Uniformly random 24-bit color.
pub fn random_color(rng: &mut impl Rng) -> u32 {
    rng.gen_range(0..=0xFF_FFFF)
}
