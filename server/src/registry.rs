use crate::error::RegistrationRejected;
use crate::geometry::Position;
use crate::player::{random_color, sanitize_name, ConnectionId, Player};
use crate::spawn::find_spawn;
use arena_shared::config::WorldConfig;
use arena_shared::protocol::{Direction, PlayerWire, UpdatePlayersMsg};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// All registered players, keyed by connection id.
///
/// Owned by the game loop task; every mutation and every tick go through it
/// sequentially, so a tick never sees a half-built player. Iteration is in
/// ascending connection id order.
pub struct PlayerRegistry {
    players: BTreeMap<ConnectionId, Player>,
    world: WorldConfig,
    spawn_attempts: u32,
    rng: ChaCha8Rng,
}

impl PlayerRegistry {
    pub fn new(world: WorldConfig, spawn_attempts: u32, rng: ChaCha8Rng) -> Self {
        Self {
            players: BTreeMap::new(),
            world,
            spawn_attempts,
            rng,
        }
    }

    pub fn world(&self) -> &WorldConfig {
        &self.world
    }

    /// Register a connection as a player at a collision-free spawn with a
    /// random color. The player is fully built before it is inserted.
    pub fn register(
        &mut self,
        id: ConnectionId,
        name: &str,
    ) -> Result<&Player, RegistrationRejected> {
        if self.players.contains_key(&id) {
            return Err(RegistrationRejected::AlreadyRegistered(id));
        }
        let name = sanitize_name(name).ok_or(RegistrationRejected::InvalidName)?;

        let occupants: Vec<Position> = self.players.values().map(|p| p.position).collect();
        let spawn = find_spawn(&occupants, &self.world, &mut self.rng, self.spawn_attempts)?;
        let color = random_color(&mut self.rng);

        let player = Player::new(id, name, spawn, color);
        Ok(&*self.players.entry(id).or_insert(player))
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    /// Apply a movement intent. Returns false if the connection has no player.
    pub fn set_velocity_component(&mut self, id: ConnectionId, direction: Direction) -> bool {
        let speed = self.world.speed;
        match self.players.get_mut(&id) {
            Some(player) => {
                player.apply_intent(direction, speed);
                true
            }
            None => false,
        }
    }

    /// Remove a player. Removing an absent id does nothing.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Player> {
        self.players.remove(&id)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub(crate) fn ids(&self) -> Vec<ConnectionId> {
        self.players.keys().copied().collect()
    }

    pub(crate) fn players_mut(&mut self) -> &mut BTreeMap<ConnectionId, Player> {
        &mut self.players
    }

    /// Wire snapshot of every player.
    pub fn snapshot(&self) -> UpdatePlayersMsg {
        UpdatePlayersMsg {
            players: self
                .players
                .iter()
                .map(|(&id, p)| (id, PlayerWire::from(p)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpawnError;
    use crate::geometry::overlaps;
    use crate::player::Velocity;
    use rand::SeedableRng;

    fn test_registry() -> PlayerRegistry {
        PlayerRegistry::new(WorldConfig::default(), 1000, ChaCha8Rng::seed_from_u64(12345))
    }

    #[test]
    fn register_creates_resting_player() {
        let mut registry = test_registry();
        let player = registry.register(1, "alice").unwrap();
        assert_eq!(player.id, 1);
        assert_eq!(player.name, "alice");
        assert_eq!(player.velocity, Velocity::default());
        assert!(player.color <= 0xFF_FFFF);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_truncates_long_name() {
        let mut registry = test_registry();
        let long = "a".repeat(30);
        let player = registry.register(1, &long).unwrap();
        assert_eq!(player.name.chars().count(), 15);
        assert_eq!(player.name, &long[..15]);
    }

    #[test]
    fn register_truncates_without_trimming() {
        let mut registry = test_registry();
        let padded = format!("  {}", "a".repeat(30));
        let player = registry.register(1, &padded).unwrap();
        assert_eq!(player.name, format!("  {}", "a".repeat(13)));
    }

    #[test]
    fn register_rejects_blank_name() {
        let mut registry = test_registry();
        assert_eq!(
            registry.register(1, "  ").unwrap_err(),
            RegistrationRejected::InvalidName
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn register_twice_keeps_first_registration() {
        let mut registry = test_registry();
        let first = registry.register(4, "alice").unwrap().clone();
        assert_eq!(
            registry.register(4, "mallory").unwrap_err(),
            RegistrationRejected::AlreadyRegistered(4)
        );
        assert_eq!(registry.get(4), Some(&first));
    }

    #[test]
    fn registered_players_do_not_overlap() {
        let mut registry = test_registry();
        for id in 0..100 {
            registry.register(id, "p").unwrap();
        }
        let players: Vec<&Player> = registry.iter().collect();
        let size = registry.world().entity_size;
        for (i, a) in players.iter().enumerate() {
            for b in &players[i + 1..] {
                assert!(!overlaps(a.position, b.position, size));
            }
        }
    }

    #[test]
    fn register_reports_spawn_exhaustion() {
        let world = WorldConfig {
            width: 30.0,
            height: 30.0,
            ..Default::default()
        };
        let mut registry = PlayerRegistry::new(world, 20, ChaCha8Rng::seed_from_u64(1));
        registry.insert(Player::new(1, "big".into(), Position::new(5.0, 5.0), 0));

        let err = registry.register(2, "late").unwrap_err();
        assert_eq!(
            err,
            RegistrationRejected::SpawnExhausted(SpawnError::Exhausted { attempts: 20 })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn move_for_unknown_connection_is_ignored() {
        let mut registry = test_registry();
        assert!(!registry.set_velocity_component(42, Direction::Up));
        assert!(registry.is_empty());
    }

    #[test]
    fn move_uses_world_speed() {
        let mut registry = test_registry();
        registry.register(1, "alice").unwrap();
        assert!(registry.set_velocity_component(1, Direction::Left));
        assert_eq!(registry.get(1).unwrap().velocity.vx, -5.0);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut registry = test_registry();
        registry.register(1, "alice").unwrap();
        registry.register(2, "bob").unwrap();

        assert!(registry.remove(1).is_some());
        let after_first: Vec<Player> = registry.iter().cloned().collect();
        assert!(registry.remove(1).is_none());
        let after_second: Vec<Player> = registry.iter().cloned().collect();
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn snapshot_contains_every_player() {
        let mut registry = test_registry();
        registry.register(3, "carol").unwrap();
        registry.register(1, "alice").unwrap();
        registry.set_velocity_component(3, Direction::Down);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.players.len(), 2);
        let carol = &snapshot.players[&3];
        assert_eq!(carol.name, "carol");
        assert_eq!(carol.vy, 5.0);
        assert!(carol.color.starts_with('#') && carol.color.len() == 7);
        assert_eq!(snapshot.players.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    }
}
