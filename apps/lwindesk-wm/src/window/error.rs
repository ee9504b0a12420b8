use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum WmError {
    #[error("invalid event on line {line}: {source}")]
    Replay {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IPC error: {0}")]
    Ipc(#[from] lwindesk_ipc::IpcError),

    #[error("configuration error: {0}")]
    Config(#[from] lwindesk_config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Log and ignore errors (for cleanup operations)
pub fn log_and_ignore<T, E: std::fmt::Display>(result: Result<T, E>, operation: &str) {
    if let Err(e) = result {
        debug!("Ignoring error in {}: {}", operation, e);
    }
}

/// Log warning for non-critical errors
pub fn log_warn<T, E: std::fmt::Display>(result: Result<T, E>, operation: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Warning in {}: {}", operation, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_warn_passes_values_through() {
        assert_eq!(log_warn::<_, WmError>(Ok(3), "value"), Some(3));
        let err = WmError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(log_warn::<u8, _>(Err(err), "value"), None);
        log_and_ignore::<(), _>(Err("ignored"), "cleanup");
    }

    #[test]
    fn test_startup_errors_convert() {
        fn load(path: &std::path::Path) -> Result<lwindesk_config::WmConfig, WmError> {
            Ok(lwindesk_config::WmConfig::load_required(path)?)
        }
        let err = load(std::path::Path::new("/nonexistent/lwindesk/wm.toml")).unwrap_err();
        assert!(matches!(err, WmError::Config(_)));
        assert!(err.to_string().contains("/nonexistent/lwindesk/wm.toml"));

        let err = WmError::from(lwindesk_ipc::IpcError::NoRuntimeDir);
        assert!(err.to_string().starts_with("IPC error"));
        let err = WmError::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(err, WmError::Io(_)));
    }

    #[test]
    fn test_replay_error_names_line() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = WmError::Replay { line: 7, source };
        assert!(err.to_string().starts_with("invalid event on line 7"));
    }
}
