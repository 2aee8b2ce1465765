use std::time::Duration;

/// World configuration. Fixed at startup and sent to clients in `welcome`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    /// Side length of every player's square box
    pub entity_size: f64,
    /// Displacement per tick along an axis while moving
    pub speed: f64,
    pub tick_rate_hz: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            entity_size: 20.0,
            speed: 5.0,
            tick_rate_hz: 60,
        }
    }
}

impl WorldConfig {
    /// Largest x a box may have its top-left corner at.
    pub fn max_x(&self) -> f64 {
        self.width - self.entity_size
    }

    /// Largest y a box may have its top-left corner at.
    pub fn max_y(&self) -> f64 {
        self.height - self.entity_size
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz as f64)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err("width must be finite and > 0".to_string());
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err("height must be finite and > 0".to_string());
        }
        if !self.entity_size.is_finite() || self.entity_size <= 0.0 {
            return Err("entity_size must be finite and > 0".to_string());
        }
        if self.entity_size >= self.width || self.entity_size >= self.height {
            return Err("entity_size must be smaller than the world".to_string());
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err("speed must be finite and >= 0".to_string());
        }
        if self.tick_rate_hz == 0 {
            return Err("tick_rate_hz must be > 0".to_string());
        }
        Ok(())
    }
}
