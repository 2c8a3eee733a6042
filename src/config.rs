use crate::error::{AppError, Result};
use crate::game_group::ValidationPolicy;

pub const ENFORCE_PLAYER_RANGE_VAR: &str = "GAME_GROUP_ENFORCE_PLAYER_RANGE";

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub enforce_player_range: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so parsing can be exercised without the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let enforce_player_range = match lookup(ENFORCE_PLAYER_RANGE_VAR) {
            Some(raw) => parse_flag(ENFORCE_PLAYER_RANGE_VAR, &raw)?,
            None => false,
        };

        Ok(Self {
            enforce_player_range,
        })
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            enforce_player_range: self.enforce_player_range,
        }
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(!config.enforce_player_range);
        assert!(!config.validation_policy().enforce_player_range);
    }

    #[test]
    fn test_player_range_flag_parsing() {
        for raw in ["true", "TRUE", "1", "yes", " on "] {
            let config =
                Config::from_lookup(lookup_from(&[(ENFORCE_PLAYER_RANGE_VAR, raw)])).unwrap();
            assert!(config.enforce_player_range, "{raw:?} should enable");
        }
        for raw in ["false", "0", "no", "off", ""] {
            let config =
                Config::from_lookup(lookup_from(&[(ENFORCE_PLAYER_RANGE_VAR, raw)])).unwrap();
            assert!(!config.enforce_player_range, "{raw:?} should disable");
        }
    }

    #[test]
    fn test_invalid_flag_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[(ENFORCE_PLAYER_RANGE_VAR, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains(ENFORCE_PLAYER_RANGE_VAR));
    }
}
