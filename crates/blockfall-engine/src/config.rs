use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_SHAPE_SIZE};

/// Default gravity interval in milliseconds.
pub const DEFAULT_DROP_INTERVAL_MS: u64 = 1000;

/// Session parameters.
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "drop_interval_ms": 500 }"#).unwrap();
/// assert_eq!(config.width, 10);
/// assert_eq!(config.drop_interval(), Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Grid columns.
    pub width: usize,
    /// Grid rows.
    pub height: usize,
    /// Elapsed time the gravity accumulator must exceed before the active
    /// piece falls one row.
    pub drop_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            drop_interval_ms: DEFAULT_DROP_INTERVAL_MS,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub const fn drop_interval(&self) -> Duration {
        Duration::from_millis(self.drop_interval_ms)
    }

    /// Checks that every piece fits the grid and that gravity can fire.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MAX_SHAPE_SIZE || self.height < MAX_SHAPE_SIZE {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.drop_interval_ms == 0 {
            return Err(ConfigError::ZeroDropInterval);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("grid {width}x{height} is smaller than the minimum {min}x{min}", min = MAX_SHAPE_SIZE)]
    GridTooSmall { width: usize, height: usize },
    #[display("drop interval must be positive")]
    ZeroDropInterval,
    #[display("grid is {actual_width}x{actual_height}, expected {width}x{height}")]
    GridSizeMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height), (10, 20));
        assert_eq!(config.drop_interval(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_tiny_grid() {
        let config = GameConfig {
            width: 3,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooSmall {
                width: 3,
                height: 20
            })
        );
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = GameConfig {
            drop_interval_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDropInterval));
    }

    #[test]
    fn test_config_json() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "width": 8, "height": 16 }"#).unwrap();
        assert_eq!(config.width, 8);
        assert_eq!(config.height, 16);
        assert_eq!(config.drop_interval_ms, DEFAULT_DROP_INTERVAL_MS);

        assert!(serde_json::from_str::<GameConfig>(r#"{ "depth": 3 }"#).is_err());
    }
}
