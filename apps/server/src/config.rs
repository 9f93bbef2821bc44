//! Server configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::{Path, PathBuf};

use alice_yamaha_core::{Config, InputMap, VolumeLimits};
use anyhow::{Context, Result};
use serde::Deserialize;

/// File name looked up in the home directory when no `--config` is given.
const DEFAULT_CONFIG_FILE: &str = ".alice-yamaha-skill.yml";

/// Server configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// E-mail addresses allowed to use the skill.
    pub users: Vec<String>,

    /// Platform mode name → receiver input, e.g. `Apple TV: HDMI1`.
    pub input_map: InputMap,

    /// Volume bounds advertised to the platform (dB).
    pub volume: VolumeLimits,

    /// Port to bind the HTTP server to.
    /// Override: `ALICE_YAMAHA_BIND_PORT`
    pub bind_port: u16,

    /// Path prefix of the platform endpoints.
    pub url_prefix: String,

    /// Identity provider profile endpoint.
    /// Override: `ALICE_YAMAHA_IDENTITY_URL`
    pub identity_url: String,

    /// SSDP receive window in milliseconds.
    pub discovery_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let core = Config::default();
        Self {
            users: core.users,
            input_map: core.input_map,
            volume: core.volume,
            bind_port: core.preferred_port,
            url_prefix: core.url_prefix,
            identity_url: core.identity_url,
            discovery_timeout_ms: core.discovery_timeout_ms,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    ///
    /// An explicit `path` must exist. Without one, the default file in the
    /// home directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    log::warn!("No configuration file found, using defaults (no users allowed)");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("ALICE_YAMAHA_BIND_PORT") {
            match val.parse() {
                Ok(port) => self.bind_port = port,
                Err(_) => log::warn!("Ignoring invalid ALICE_YAMAHA_BIND_PORT={}", val),
            }
        }

        if let Some(val) = var("ALICE_YAMAHA_IDENTITY_URL") {
            self.identity_url = val;
        }

        // Note: ALICE_YAMAHA_LOG_LEVEL is handled by clap via #[arg(env = ...)] in main.rs
    }

    /// Converts to alice-yamaha-core's Config type.
    pub fn to_core_config(&self) -> Config {
        Config {
            users: self.users.clone(),
            input_map: self.input_map.clone(),
            volume: self.volume,
            preferred_port: self.bind_port,
            url_prefix: self.url_prefix.clone(),
            identity_url: self.identity_url.clone(),
            discovery_timeout_ms: self.discovery_timeout_ms,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(DEFAULT_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_yaml_and_keeps_input_order() {
        let file = write_config(
            "users:\n  - owner@example.com\ninput_map:\n  TV: HDMI1\n  Radio: TUNER\n  Vinyl: AV1\nvolume:\n  min: -60\n  max: 0\n",
        );

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.users, vec!["owner@example.com"]);
        assert_eq!(
            config.input_map.modes().collect::<Vec<_>>(),
            vec!["TV", "Radio", "Vinyl"]
        );
        assert_eq!(config.volume, VolumeLimits { min: -60, max: 0 });
        assert_eq!(config.bind_port, 8000);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let file = write_config("users: []\n");
        let config = ServerConfig::from_file(file.path()).unwrap();
        assert!(config.input_map.is_empty());
        assert_eq!(config.url_prefix, "/alice/v1.0");
        assert_eq!(config.identity_url, "https://login.yandex.ru/info");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ServerConfig::load(Some(&dir.path().join("absent.yml"))).is_err());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let file = write_config("users: [unterminated\n");
        assert!(ServerConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn env_overrides_port_and_identity_url() {
        let mut config = ServerConfig::default();
        config.apply_env_overrides(|key| match key {
            "ALICE_YAMAHA_BIND_PORT" => Some("9000".to_string()),
            "ALICE_YAMAHA_IDENTITY_URL" => Some("http://127.0.0.1:1/info".to_string()),
            _ => None,
        });
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.identity_url, "http://127.0.0.1:1/info");
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let mut config = ServerConfig::default();
        config.apply_env_overrides(|key| (key == "ALICE_YAMAHA_BIND_PORT").then(|| "http".to_string()));
        assert_eq!(config.bind_port, 8000);
    }

    #[test]
    fn converts_to_valid_core_config() {
        let file = write_config("users: [owner@example.com]\ninput_map: {TV: HDMI1}\n");
        let core = ServerConfig::from_file(file.path()).unwrap().to_core_config();
        assert!(core.validate().is_ok());
        assert!(core.is_user_allowed("owner@example.com"));
        assert_eq!(core.input_map.input_for("TV"), Some("HDMI1"));
    }
}
