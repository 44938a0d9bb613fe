use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Tunable rules of a game.
///
/// Every field has a default, so a partial JSON document is a valid config:
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "max_level": 15 }"#).unwrap();
/// assert_eq!(config.max_level, 15);
/// assert_eq!(config.width, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Playfield width in cells.
    pub width: i32,
    /// Playfield height in cells.
    pub height: i32,
    /// Time between gravity ticks at level 0.
    pub max_drop_duration_ms: u32,
    /// Time between gravity ticks at `max_level`.
    pub min_drop_duration_ms: u32,
    /// Lock delay once a piece touches down.
    pub grace_duration_ms: u32,
    /// Lines needed (strictly exceeded) to advance one level.
    pub level_line_goal: u32,
    pub max_level: u32,
    /// How many upcoming pieces [`Game::next_pieces`](super::Game::next_pieces) exposes.
    pub next_preview: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            max_drop_duration_ms: 500,
            min_drop_duration_ms: 75,
            grace_duration_ms: 250,
            level_line_goal: 10,
            max_level: 10,
            next_preview: 1,
        }
    }
}

impl GameConfig {
    /// Largest accepted playfield width and height.
    pub const MAX_FIELD_SIZE: i32 = 1024;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 4 || self.height < 4 {
            return Err(ConfigError::FieldTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > Self::MAX_FIELD_SIZE || self.height > Self::MAX_FIELD_SIZE {
            return Err(ConfigError::FieldTooLarge {
                width: self.width,
                height: self.height,
                max: Self::MAX_FIELD_SIZE,
            });
        }
        if self.min_drop_duration_ms == 0 || self.grace_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.min_drop_duration_ms > self.max_drop_duration_ms {
            return Err(ConfigError::DropDurationRange {
                min: self.min_drop_duration_ms,
                max: self.max_drop_duration_ms,
            });
        }
        if self.max_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }
        Ok(())
    }

    /// Gravity interval for `level`, linearly interpolated from
    /// `max_drop_duration_ms` (level 0) down to `min_drop_duration_ms`
    /// (`max_level`), truncating toward zero.
    #[must_use]
    pub fn drop_duration_ms(&self, level: u32) -> i64 {
        let slow = i64::from(self.max_drop_duration_ms);
        let fast = i64::from(self.min_drop_duration_ms);
        let level = i64::from(level.min(self.max_level));
        let max_level = i64::from(self.max_level.max(1));
        slow + (fast - slow) * level / max_level
    }

    #[must_use]
    pub fn grace_duration_ms(&self) -> i64 {
        i64::from(self.grace_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_drop_duration_interpolation() {
        let config = GameConfig::default();
        assert_eq!(config.drop_duration_ms(0), 500);
        assert_eq!(config.drop_duration_ms(1), 458);
        assert_eq!(config.drop_duration_ms(3), 373);
        assert_eq!(config.drop_duration_ms(5), 288);
        assert_eq!(config.drop_duration_ms(10), 75);
        assert_eq!(config.drop_duration_ms(99), 75);
        let mut last = i64::MAX;
        for level in 0..=10 {
            let duration = config.drop_duration_ms(level);
            assert!(duration <= last);
            last = duration;
        }
    }

    #[test]
    fn test_validate_rejects() {
        let small = GameConfig {
            width: 3,
            ..GameConfig::default()
        };
        assert_eq!(
            small.validate(),
            Err(ConfigError::FieldTooSmall {
                width: 3,
                height: 20
            })
        );

        let huge = GameConfig {
            width: 100_000,
            height: 100_000,
            ..GameConfig::default()
        };
        assert_eq!(
            huge.validate(),
            Err(ConfigError::FieldTooLarge {
                width: 100_000,
                height: 100_000,
                max: 1024
            })
        );
        let largest = GameConfig {
            width: GameConfig::MAX_FIELD_SIZE,
            height: GameConfig::MAX_FIELD_SIZE,
            ..GameConfig::default()
        };
        assert_eq!(largest.validate(), Ok(()));

        let inverted = GameConfig {
            min_drop_duration_ms: 600,
            ..GameConfig::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::DropDurationRange { min: 600, max: 500 })
        );

        let zero_grace = GameConfig {
            grace_duration_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(zero_grace.validate(), Err(ConfigError::ZeroDuration));

        let zero_level = GameConfig {
            max_level: 0,
            ..GameConfig::default()
        };
        assert_eq!(zero_level.validate(), Err(ConfigError::ZeroMaxLevel));
    }

    #[test]
    fn test_json_roundtrip_and_defaults() {
        let config = GameConfig {
            width: 12,
            grace_duration_ms: 300,
            ..GameConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<GameConfig>(&json).unwrap(), config);

        let partial: GameConfig = serde_json::from_str(r#"{"height": 24}"#).unwrap();
        assert_eq!(partial.height, 24);
        assert_eq!(partial.max_drop_duration_ms, 500);

        assert!(serde_json::from_str::<GameConfig>(r#"{"speed": 3}"#).is_err());
    }
}
