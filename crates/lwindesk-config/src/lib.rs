use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Error types for configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration format: {reason}")]
    InvalidFormat { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

pub const DEFAULT_SOCKET_NAME: &str = "lwindesk-ipc";
pub const DEFAULT_MAX_CLIENTS: usize = 16;

/// IPC gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IpcConfig {
    /// File name of the listener socket, created under `$XDG_RUNTIME_DIR`
    pub socket_name: String,
    pub max_clients: usize,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            socket_name: DEFAULT_SOCKET_NAME.to_string(),
            max_clients: DEFAULT_MAX_CLIENTS,
        }
    }
}

/// Fallback size used for placement and decoration when a surface
/// has not reported a geometry yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub default_width: i32,
    pub default_height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            default_width: 640,
            default_height: 480,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WmConfig {
    pub log_level: String,
    pub workspaces: Vec<String>,
    pub ipc: IpcConfig,
    pub window: WindowConfig,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            workspaces: vec!["Desktop 1".to_string()],
            ipc: IpcConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl WmConfig {
    /// `<config dir>/lwindesk/wm.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lwindesk")
            .join("wm.toml")
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file is not an error and yields the defaults. A file that
    /// exists but does not parse is.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from a path that must exist.
    pub fn load_required(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Self::load(Some(path))
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: WmConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.workspaces.is_empty() {
            return Err(ConfigError::InvalidFormat {
                reason: "at least one workspace is required".to_string(),
            });
        }
        if self.ipc.socket_name.is_empty() || self.ipc.socket_name.contains('/') {
            return Err(ConfigError::InvalidFormat {
                reason: format!("invalid ipc socket name {:?}", self.ipc.socket_name),
            });
        }
        if self.ipc.max_clients == 0 {
            return Err(ConfigError::InvalidFormat {
                reason: "ipc.max_clients must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = WmConfig::load(Some(&temp_dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, WmConfig::default());
        assert_eq!(config.workspaces, vec!["Desktop 1".to_string()]);
        assert_eq!(config.ipc.max_clients, 16);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("wm.toml");
        std::fs::write(
            &path,
            "log_level = \"debug\"\nworkspaces = [\"Main\", \"Web\"]\n\n[ipc]\nmax_clients = 4\n",
        )
        .unwrap();

        let config = WmConfig::load(Some(&path)).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.workspaces.len(), 2);
        assert_eq!(config.ipc.max_clients, 4);
        assert_eq!(config.ipc.socket_name, DEFAULT_SOCKET_NAME);
        assert_eq!(config.window.default_width, 640);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("wm.toml");
        std::fs::write(&path, "workspaces = 3").unwrap();
        assert!(matches!(WmConfig::load(Some(&path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            WmConfig::from_toml("workspaces = []"),
            Err(ConfigError::InvalidFormat { .. })
        ));
        assert!(matches!(
            WmConfig::from_toml("[ipc]\nsocket_name = \"a/b\""),
            Err(ConfigError::InvalidFormat { .. })
        ));
        assert!(matches!(
            WmConfig::from_toml("[ipc]\nmax_clients = 0"),
            Err(ConfigError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_load_required() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("wm.toml");
        assert!(matches!(
            WmConfig::load_required(&path),
            Err(ConfigError::FileNotFound { .. })
        ));

        std::fs::write(&path, WmConfig::default().to_toml().unwrap()).unwrap();
        assert_eq!(WmConfig::load_required(&path).unwrap(), WmConfig::default());
    }
}
