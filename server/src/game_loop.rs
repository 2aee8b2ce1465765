use crate::config::ServerConfig;
use crate::error::RegistrationRejected;
use crate::player::ConnectionId;
use crate::protocol::{Direction, PlayerWire, ServerMsg};
use crate::registry::PlayerRegistry;
use crate::simulation::step;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Commands from client connections to the game loop
#[derive(Debug)]
pub enum GameCommand {
    Register {
        id: ConnectionId,
        name: String,
        response: oneshot::Sender<Result<PlayerWire, RegistrationRejected>>,
    },
    Move {
        id: ConnectionId,
        direction: Direction,
    },
    Disconnect {
        id: ConnectionId,
    },
}

/// Broadcasts from game loop to all clients. Payloads are encoded once and
/// shared by every connection.
#[derive(Debug, Clone)]
pub enum GameBroadcast {
    /// JSON text of a `ServerMsg::UpdatePlayers`
    UpdatePlayers(Arc<str>),
}

/// Run the main game loop. Owns the player registry; registry mutations and
/// ticks are serialized through this one task.
pub async fn run_game_loop(
    mut cmd_rx: mpsc::Receiver<GameCommand>,
    broadcast_tx: broadcast::Sender<GameBroadcast>,
    config: ServerConfig,
) {
    let rng = match config.rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut registry = PlayerRegistry::new(config.world, config.spawn_attempts, rng);

    let mut tick_interval = tokio::time::interval(config.world.tick_period());
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut tick_count: u64 = 0;

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                let report = step(&mut registry);
                tick_count += 1;
                tracing::debug!(
                    "Tick {}: {} players, {} moved, {} blocked",
                    tick_count,
                    registry.len(),
                    report.moved,
                    report.blocked
                );
                broadcast_snapshot(&registry, &broadcast_tx);
            }

            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    break;
                };
                if apply_command(&mut registry, cmd) {
                    broadcast_snapshot(&registry, &broadcast_tx);
                }
            }
        }
    }

    tracing::info!("Game loop ended after {} ticks", tick_count);
}

/// Apply one inbound command to the registry. Returns true when the change
/// should be broadcast right away instead of waiting for the next tick.
pub fn apply_command(registry: &mut PlayerRegistry, cmd: GameCommand) -> bool {
    match cmd {
        GameCommand::Register { id, name, response } => {
            let result = registry.register(id, &name).map(PlayerWire::from);
            match &result {
                Ok(player) => {
                    tracing::info!("Connection {} registered as {:?}", id, player.name)
                }
                Err(e) => tracing::warn!("Registration rejected for connection {}: {}", id, e),
            }
            // The connection may already be gone; the next tick still carries the player.
            let _ = response.send(result);
            false
        }
        GameCommand::Move { id, direction } => {
            registry.set_velocity_component(id, direction);
            false
        }
        GameCommand::Disconnect { id } => {
            let removed = registry.remove(id).is_some();
            if removed {
                tracing::info!("Player {} left", id);
            }
            removed
        }
    }
}

fn broadcast_snapshot(
    registry: &PlayerRegistry,
    broadcast_tx: &broadcast::Sender<GameBroadcast>,
) {
    if broadcast_tx.receiver_count() == 0 {
        return;
    }
    match serde_json::to_string(&ServerMsg::UpdatePlayers(registry.snapshot())) {
        Ok(json) => {
            let _ = broadcast_tx.send(GameBroadcast::UpdatePlayers(json.into()));
        }
        Err(e) => tracing::error!("Failed to encode updatePlayers: {}", e),
    }
}
