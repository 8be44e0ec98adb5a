// src/config.rs
use anyhow::{Context, Result};
use std::env;

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";
const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 2048;

#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini credential. `None` puts analysis into fallback mode.
    pub api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Redis connection string. `None` keeps state in process memory.
    pub redis_url: Option<String>,
    pub bind_addr: String,
    pub admin_password: String,
    pub max_image_dimension: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_image_dimension = match non_empty("MAX_IMAGE_DIMENSION") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("MAX_IMAGE_DIMENSION must be a valid u32, got {:?}", raw))?,
            None => DEFAULT_MAX_IMAGE_DIMENSION,
        };

        Ok(Config {
            api_key: non_empty("API_KEY"),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: non_empty("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            redis_url: non_empty("REDIS_URL"),
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            admin_password: non_empty("ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            max_image_dimension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.gemini_model, "gemini-3-flash-preview");
        assert_eq!(config.redis_url, None);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.admin_password, "admin");
        assert_eq!(config.max_image_dimension, 2048);
    }

    #[test]
    fn empty_api_key_means_no_credential() {
        assert_eq!(config(&[("API_KEY", "")]).unwrap().api_key, None);
        assert_eq!(
            config(&[("API_KEY", "k-123")]).unwrap().api_key.as_deref(),
            Some("k-123")
        );
    }

    #[test]
    fn malformed_dimension_is_an_error() {
        assert!(config(&[("MAX_IMAGE_DIMENSION", "huge")]).is_err());
        assert_eq!(
            config(&[("MAX_IMAGE_DIMENSION", "512")])
                .unwrap()
                .max_image_dimension,
            512
        );
    }
}
