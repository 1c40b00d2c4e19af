use crate::error::{RestError, Result};
use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;

/// Key/value configuration backed by the process environment.
///
/// With a prefix, only variables starting with it are loaded and the prefix
/// is stripped: `TODO_PORT=8080` with prefix `TODO_` is read as `PORT`.
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::from_env("")
    }

    pub fn from_env(prefix: &str) -> Self {
        Self::from_vars(prefix, env::vars())
    }

    pub fn from_vars(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let service = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                service.set(stripped, &value);
            }
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parses the value of `key`; `Ok(None)` when it is unset.
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| {
                    RestError::Other(anyhow::anyhow!("invalid value for {}: {}", key, e))
                })
            })
            .transpose()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_prefix_is_stripped_and_filtered() {
        let config = ConfigService::from_vars(
            "TODO_",
            vars(&[("TODO_PORT", "8080"), ("PATH", "/usr/bin")]),
        );
        assert_eq!(config.get("PORT").as_deref(), Some("8080"));
        assert!(config.get("PATH").is_none());
        assert_eq!(config.get_or("HOST", "0.0.0.0"), "0.0.0.0");
    }

    #[test]
    fn test_parse_values() {
        let config = ConfigService::from_vars("", vars(&[("PORT", "3000"), ("DEBUG", "maybe")]));
        assert_eq!(config.parse::<u16>("PORT").unwrap(), Some(3000));
        assert_eq!(config.parse::<u16>("MISSING").unwrap(), None);
        assert!(config.parse::<bool>("DEBUG").is_err());

        config.set("DEBUG", "true");
        assert_eq!(config.parse::<bool>("DEBUG").unwrap(), Some(true));
    }
}
