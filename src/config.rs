//! Configuration loading and validation.

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::GameSettings;
use crate::error::ConfigError;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

/// Game lifecycle tuning, mirroring [`GameSettings`].
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_draw_seconds")]
    pub draw_seconds: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_display_step")]
    pub display_step: Decimal,
    #[serde(default = "default_execution_step")]
    pub execution_step: Decimal,
    #[serde(default = "default_order_notional")]
    pub order_notional: Decimal,
}

fn default_capacity() -> usize {
    20
}

fn default_draw_seconds() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_display_step() -> Decimal {
    dec!(2)
}

fn default_execution_step() -> Decimal {
    dec!(1)
}

fn default_order_notional() -> Decimal {
    dec!(10.3)
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            draw_seconds: default_draw_seconds(),
            poll_interval_ms: default_poll_interval_ms(),
            display_step: default_display_step(),
            execution_step: default_execution_step(),
            order_notional: default_order_notional(),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            capacity: self.capacity,
            draw_duration: Duration::from_secs(self.draw_seconds),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            display_step: self.display_step,
            execution_step: self.execution_step,
            order_notional: self.order_notional,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Parameters of the simulated collaborators used by the demo binary.
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_start_price")]
    pub start_price: Decimal,
    /// Maximum absolute price move per feed poll.
    #[serde(default = "default_volatility")]
    pub volatility: Decimal,
}

fn default_start_price() -> Decimal {
    dec!(50000)
}

fn default_volatility() -> Decimal {
    dec!(5)
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_price: default_start_price(),
            volatility: default_volatility(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.game.capacity == 0 || self.game.capacity > crate::domain::BALL_COUNT {
            return Err(ConfigError::InvalidValue {
                field: "game.capacity",
                reason: format!(
                    "must be between 1 and {}, got {}",
                    crate::domain::BALL_COUNT,
                    self.game.capacity
                ),
            });
        }
        if self.game.draw_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "game.draw_seconds",
                reason: "must be positive".into(),
            });
        }
        if self.game.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "game.poll_interval_ms",
                reason: "must be positive".into(),
            });
        }
        if self.game.display_step <= Decimal::ZERO || self.game.execution_step <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "game.display_step",
                reason: "price steps must be positive".into(),
            });
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            logging: LoggingConfig::default(),
            sim: SimConfig::default(),
        }
    }
}
