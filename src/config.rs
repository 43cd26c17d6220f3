use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct MnemosConfig {
    pub server: ServerConfig,
    pub memory: MemoryConfig,
    pub graph: GraphConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

/// Tuning knobs for [`crate::memory::store::MemoryStore`].
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct MemoryConfig {
    /// Result count used when a recall does not specify a limit.
    pub default_limit: usize,
    /// Entries whose similarity strictly exceeds this value are linked on store.
    pub link_threshold: f64,
    /// Time constant of the recency term in the composite score, in days.
    pub recency_half_life_days: f64,
    /// Maximum characters of content shown in consolidation previews.
    pub preview_chars: usize,
    /// Number of entries listed in a consolidation summary.
    pub summary_top: usize,
    /// Optional JSON snapshot imported at server startup.
    pub seed_path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GraphConfig {
    pub default_max_depth: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            host: "127.0.0.1".into(),
            port: 8420,
            log_level: "info".into(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            link_threshold: 0.5,
            recency_half_life_days: 7.0,
            preview_chars: 100,
            summary_top: 5,
            seed_path: None,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_max_depth: 5,
        }
    }
}

/// Returns `~/.mnemos/`
pub fn default_mnemos_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mnemos")
}

/// Returns the default config file path: `~/.mnemos/config.toml`
pub fn default_config_path() -> PathBuf {
    default_mnemos_dir().join("config.toml")
}

impl MnemosConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MnemosConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (MNEMOS_LOG_LEVEL, MNEMOS_TRANSPORT, MNEMOS_PORT, MNEMOS_SEED).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MNEMOS_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("MNEMOS_TRANSPORT") {
            self.server.transport = val;
        }
        if let Ok(val) = std::env::var("MNEMOS_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid MNEMOS_PORT"),
            }
        }
        if let Ok(val) = std::env::var("MNEMOS_SEED") {
            self.memory.seed_path = Some(val);
        }
    }

    /// Resolve the seed snapshot path, expanding `~` if needed.
    pub fn resolved_seed_path(&self) -> Option<PathBuf> {
        self.memory.seed_path.as_deref().map(expand_tilde)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        }
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MnemosConfig::default();
        assert_eq!(config.server.transport, "stdio");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.memory.default_limit, 10);
        assert_eq!(config.memory.link_threshold, 0.5);
        assert_eq!(config.memory.preview_chars, 100);
        assert_eq!(config.graph.default_max_depth, 5);
        assert!(config.memory.seed_path.is_none());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
transport = "http"

[memory]
default_limit = 25
seed_path = "/tmp/seed.json"

[graph]
default_max_depth = 3
"#;
        let config: MnemosConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.transport, "http");
        assert_eq!(config.memory.default_limit, 25);
        assert_eq!(config.memory.seed_path.as_deref(), Some("/tmp/seed.json"));
        assert_eq!(config.graph.default_max_depth, 3);
        // defaults still apply for unset fields
        assert_eq!(config.memory.summary_top, 5);
        assert_eq!(config.server.port, 8420);
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MnemosConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.memory.recency_half_life_days, 7.0);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[memory]\nlink_threshold = 0.75\n").unwrap();

        let config = MnemosConfig::load_from(&path).unwrap();
        assert_eq!(config.memory.link_threshold, 0.75);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = MnemosConfig::default();
        std::env::set_var("MNEMOS_LOG_LEVEL", "trace");
        std::env::set_var("MNEMOS_TRANSPORT", "http");
        std::env::set_var("MNEMOS_PORT", "9000");
        std::env::set_var("MNEMOS_SEED", "/tmp/override.json");

        config.apply_env_overrides();

        assert_eq!(config.server.log_level, "trace");
        assert_eq!(config.server.transport, "http");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.resolved_seed_path(),
            Some(PathBuf::from("/tmp/override.json"))
        );

        // Clean up
        std::env::remove_var("MNEMOS_LOG_LEVEL");
        std::env::remove_var("MNEMOS_TRANSPORT");
        std::env::remove_var("MNEMOS_PORT");
        std::env::remove_var("MNEMOS_SEED");
    }
}
