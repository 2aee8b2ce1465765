use thiserror::Error;

/// Spawn placement gave up without finding a free box.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("no free spawn position after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Why a `register` was refused. The connection stays open but has no player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationRejected {
    #[error("player name is empty")]
    InvalidName,
    #[error("connection {0} is already registered")]
    AlreadyRegistered(u32),
    #[error(transparent)]
    SpawnExhausted(#[from] SpawnError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidVar { var: &'static str, value: String },
    #[error("invalid world configuration: {0}")]
    World(String),
    #[error("{0}")]
    Server(String),
}
