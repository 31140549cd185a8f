use serde::Deserialize;

pub const CACHE_ENV: &str = "FELLOWSHIP_PERMISSION_CACHE";
pub const CACHE_CAPACITY_ENV: &str = "FELLOWSHIP_PERMISSION_CACHE_CAPACITY";

/// Permission layer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Memoize check results per (actor, revision). Off: every check re-evaluates.
    pub cache_enabled: bool,
    /// Entries kept before the cache is cleared.
    pub cache_capacity: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cache_enabled: false,
            cache_capacity: 1024,
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(CACHE_ENV) {
            match parse_flag(&raw) {
                Some(flag) => config.cache_enabled = flag,
                None => tracing::warn!(key = CACHE_ENV, value = %raw, "ignoring invalid flag"),
            }
        }

        if let Some(raw) = lookup(CACHE_CAPACITY_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.cache_capacity = n,
                _ => tracing::warn!(key = CACHE_CAPACITY_ENV, value = %raw, "ignoring invalid capacity"),
            }
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_cache() {
        let config = AuthConfig::from_lookup(|_| None);
        assert_eq!(config, AuthConfig::default());
        assert!(!config.cache_enabled);
    }

    #[test]
    fn reads_overrides() {
        let config = AuthConfig::from_lookup(|key| match key {
            CACHE_ENV => Some("on".to_string()),
            CACHE_CAPACITY_ENV => Some("16".to_string()),
            _ => None,
        });
        assert!(config.cache_enabled);
        assert_eq!(config.cache_capacity, 16);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AuthConfig::from_lookup(|key| match key {
            CACHE_ENV => Some("maybe".to_string()),
            CACHE_CAPACITY_ENV => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(config, AuthConfig::default());
    }

    #[test]
    fn deserializes_partial_json() {
        let config: AuthConfig = serde_json::from_str(r#"{ "cache_enabled": true }"#).unwrap();
        assert!(config.cache_enabled);
        assert_eq!(config.cache_capacity, 1024);
    }
}
