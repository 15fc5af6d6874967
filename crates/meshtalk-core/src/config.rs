//! Configuration system for meshtalk.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $MESHTALK_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/meshtalk/config.toml
//!   3. ~/.config/meshtalk/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshtalkConfig {
    pub packets: PacketConfig,
    pub store: StoreConfig,
}

/// Defaults applied to outgoing packets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketConfig {
    /// Relay hops granted to packets we originate.
    pub default_hop_limit: u32,
    /// Channel index for packets we originate.
    pub default_channel: u32,
    /// Largest payload the radio will carry, in bytes.
    pub max_payload_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Oldest messages are dropped past this count. 0 = unlimited.
    pub max_messages_per_contact: usize,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            default_hop_limit: 3,
            default_channel: 0,
            max_payload_len: 233,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_messages_per_contact: 1000,
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join("meshtalk")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl MeshtalkConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            Self::from_toml_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            MeshtalkConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse config text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("MESHTALK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&MeshtalkConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text).map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Apply MESHTALK_* env var overrides. Unparseable values are ignored.
    fn apply_env_overrides(&mut self) {
        override_from_env(
            "MESHTALK_PACKETS__DEFAULT_HOP_LIMIT",
            &mut self.packets.default_hop_limit,
        );
        override_from_env(
            "MESHTALK_PACKETS__DEFAULT_CHANNEL",
            &mut self.packets.default_channel,
        );
        override_from_env(
            "MESHTALK_PACKETS__MAX_PAYLOAD_LEN",
            &mut self.packets.max_payload_len,
        );
        override_from_env(
            "MESHTALK_STORE__MAX_MESSAGES_PER_CONTACT",
            &mut self.store.max_messages_per_contact,
        );
    }
}

fn override_from_env<T: std::str::FromStr>(key: &str, slot: &mut T) {
    if let Some(v) = std::env::var(key).ok().and_then(|v| v.parse().ok()) {
        *slot = v;
    }
}
