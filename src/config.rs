//! Server Configuration
//!
//! Read from `config.toml` next to the binary when present; every field
//! has a default so the server also runs with no file at all.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind: String,
    /// Directory holding the quest catalog
    pub data_dir: PathBuf,
    /// Lifetime of a signed session token, in seconds
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:2567".to_string(),
            data_dir: PathBuf::from("data"),
            session_ttl_secs: 3600,
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file, falling back to defaults when the file is
    /// missing. A malformed file is reported and also falls back.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                info!("No config file at {:?}, using defaults", path);
                return Self::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => {
                info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}; using defaults", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "0.0.0.0:2567");
        assert_eq!(config.session_ttl_secs, 3600);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "bind = \"127.0.0.1:9000\"\n").unwrap();

        let config = ServerConfig::load(&path);
        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.bind, ServerConfig::default().bind);
    }
}
