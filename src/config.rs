use std::{str::FromStr, time::Duration};

use crate::{
    error::{config::ConfigError, AppError},
    playback::config::PlaybackConfig,
};

const DEFAULT_VOLUME: u8 = 80;

pub struct Config {
    pub database_url: String,

    pub discord_bot_token: String,

    pub lavalink_url: String,
    pub lavalink_password: String,

    /// Volume applied to newly registered players when a guild has no stored preference.
    pub default_volume: u8,

    pub playback: PlaybackConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = PlaybackConfig::default();

        let preload_fraction: f64 = optional_env("PRELOAD_FRACTION", defaults.preload_fraction)?;
        if !(preload_fraction > 0.0 && preload_fraction <= 1.0) {
            return Err(ConfigError::InvalidEnvVar {
                name: "PRELOAD_FRACTION".to_string(),
                value: preload_fraction.to_string(),
                reason: "must be greater than 0 and at most 1".to_string(),
            }
            .into());
        }

        let default_volume: u8 = optional_env("DEFAULT_VOLUME", DEFAULT_VOLUME)?;
        if default_volume > 100 {
            return Err(ConfigError::InvalidEnvVar {
                name: "DEFAULT_VOLUME".to_string(),
                value: default_volume.to_string(),
                reason: "must be between 0 and 100".to_string(),
            }
            .into());
        }

        let crossfade_ms: u64 = optional_env(
            "CROSSFADE_DURATION_MS",
            defaults.crossfade_duration.as_millis() as u64,
        )?;
        let transition_pause_ms: u64 = optional_env(
            "TRANSITION_PAUSE_MS",
            defaults.transition_pause.as_millis() as u64,
        )?;
        let crossfade_steps: u32 = optional_env("CROSSFADE_STEPS", defaults.crossfade_steps)?;

        Ok(Self {
            database_url: required_env("DATABASE_URL")?,
            discord_bot_token: required_env("DISCORD_BOT_TOKEN")?,
            lavalink_url: required_env("LAVALINK_URL")?,
            lavalink_password: required_env("LAVALINK_PASSWORD")?,
            default_volume,
            playback: PlaybackConfig {
                crossfade_duration: Duration::from_millis(crossfade_ms),
                crossfade_steps: crossfade_steps.max(1),
                transition_pause: Duration::from_millis(transition_pause_ms),
                preload_fraction,
                ..defaults
            },
        })
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => parse_env_value(name, &value),
        Err(_) => Ok(default),
    }
}

fn parse_env_value<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_values() {
        let value: u64 = parse_env_value("CROSSFADE_DURATION_MS", " 4500 ").unwrap();
        assert_eq!(value, 4500);
    }

    #[test]
    fn rejects_garbage_values() {
        let result: Result<f64, _> = parse_env_value("PRELOAD_FRACTION", "most");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref name, .. }) if name == "PRELOAD_FRACTION"
        ));
    }

    #[test]
    fn missing_variable_falls_back_to_default() {
        let value: u32 = optional_env("ENCORE_TEST_UNSET_VARIABLE", 10).unwrap();
        assert_eq!(value, 10);
    }
}
