//! Client configuration.
//!
//! `ClientConfig` is plain data with a sensible default; `from_env` layers the
//! optional `MEDIUM_API_BASE_URL` and `MEDIUM_UNKNOWN_VARIANTS` variables on
//! top of it.

use tracing::debug;

use crate::codec::{DecodeOptions, UnknownVariantPolicy};
use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.medium.com";

pub const ENV_BASE_URL: &str = "MEDIUM_API_BASE_URL";
pub const ENV_UNKNOWN_VARIANTS: &str = "MEDIUM_UNKNOWN_VARIANTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root without a trailing slash.
    pub base_url: String,
    pub decode: DecodeOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            decode: DecodeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_decode_options(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup. Unset
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_BASE_URL) {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Empty { name: ENV_BASE_URL })
            }
            Some(url) => Self::new(url.trim()),
            None => Self::default(),
        };

        if let Some(raw) = lookup(ENV_UNKNOWN_VARIANTS) {
            config.decode.unknown_variants = parse_policy(&raw)?;
        }

        debug!(
            base_url = %config.base_url,
            unknown_variants = ?config.decode.unknown_variants,
            "loaded client config"
        );
        Ok(config)
    }
}

fn parse_policy(raw: &str) -> Result<UnknownVariantPolicy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "reject" => Ok(UnknownVariantPolicy::Reject),
        "preserve" => Ok(UnknownVariantPolicy::Preserve),
        _ => Err(ConfigError::InvalidValue {
            name: ENV_UNKNOWN_VARIANTS,
            value: raw.to_string(),
            expected: "reject, preserve",
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "https://api.medium.com");
        assert_eq!(config.decode.unknown_variants, UnknownVariantPolicy::Reject);
    }

    #[test]
    fn reads_both_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://localhost:3000/"),
            (ENV_UNKNOWN_VARIANTS, "Preserve"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.decode, DecodeOptions::preserving());
    }

    #[test]
    fn rejects_unknown_policy() {
        let err =
            ClientConfig::from_lookup(lookup(&[(ENV_UNKNOWN_VARIANTS, "ignore")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { value, .. } if value == "ignore"));
    }

    #[test]
    fn rejects_blank_base_url() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty { name: ENV_BASE_URL });
    }
}
