//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! default_curve: secp256k1      # ed25519 | secp256k1 | p256 | bls12_381
//! passphrase_env: TZKIT_PASSPHRASE
//! hash_messages: true
//! ```
//!
//! Missing fields take their defaults. Command-line flags override the
//! file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tzkit_crypto::KeyType;

/// Environment variable read for key passphrases unless configured.
pub const DEFAULT_PASSPHRASE_ENV: &str = "TZKIT_PASSPHRASE";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Curve used by `key gen` when `--curve` is absent.
    pub default_curve: KeyType,
    /// Environment variable holding the passphrase for encrypted keys.
    pub passphrase_env: String,
    /// Sign and verify blake2b-256 of the message instead of the message.
    pub hash_messages: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_curve: KeyType::Ed25519,
            passphrase_env: DEFAULT_PASSPHRASE_ENV.to_string(),
            hash_messages: true,
        }
    }
}

impl Config {
    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("invalid configuration")
    }

    /// Load from `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Passphrase from the configured environment variable, if set.
    pub fn passphrase(&self) -> Option<String> {
        std::env::var(&self.passphrase_env).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.default_curve, KeyType::Ed25519);
        assert_eq!(config.passphrase_env, "TZKIT_PASSPHRASE");
        assert!(config.hash_messages);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_yaml("default_curve: bls12_381\n").unwrap();
        assert_eq!(config.default_curve, KeyType::Bls12_381);
        assert!(config.hash_messages);
        assert_eq!(config.passphrase_env, DEFAULT_PASSPHRASE_ENV);
    }

    #[test]
    fn full_file() {
        let yaml = "default_curve: p256\npassphrase_env: MY_PASS\nhash_messages: false\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(
            config,
            Config {
                default_curve: KeyType::P256,
                passphrase_env: "MY_PASS".into(),
                hash_messages: false,
            }
        );
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(Config::from_yaml("curve: ed25519\n").is_err());
    }

    #[test]
    fn unknown_curve_rejected() {
        assert!(Config::from_yaml("default_curve: ed448\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tzkit.yaml");
        std::fs::write(&path, "hash_messages: false\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.hash_messages);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.yaml"))).is_err());
    }

    #[test]
    fn load_without_path_is_default() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }
}
