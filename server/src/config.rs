use crate::error::ConfigError;
use crate::spawn::DEFAULT_MAX_ATTEMPTS;
use arena_shared::config::WorldConfig;

pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub max_connections: usize,
    /// Seed for spawn and color randomness. None seeds from OS entropy.
    pub rng_seed: Option<u64>,
    pub spawn_attempts: u32,
    pub world: WorldConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            max_connections: 256,
            rng_seed: None,
            spawn_attempts: DEFAULT_MAX_ATTEMPTS,
            world: WorldConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `HOST`, `PORT`, `ARENA_MAX_CONNECTIONS` and
    /// `ARENA_RNG_SEED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => parse_var("PORT", raw)?,
            None => DEFAULT_PORT,
        };
        config.listen_addr = format!("{}:{}", host, port);

        if let Some(raw) = lookup("ARENA_MAX_CONNECTIONS") {
            config.max_connections = parse_var("ARENA_MAX_CONNECTIONS", raw)?;
        }
        if let Some(raw) = lookup("ARENA_RNG_SEED") {
            config.rng_seed = Some(parse_var("ARENA_RNG_SEED", raw)?);
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate().map_err(ConfigError::World)?;
        if self.max_connections == 0 {
            return Err(ConfigError::Server("max_connections must be > 0".to_string()));
        }
        if self.spawn_attempts == 0 {
            return Err(ConfigError::Server("spawn_attempts must be > 0".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidVar { var, value: raw })
}
