use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_FILE_NAME: &str = "spotlite_config.json";

/// Quiet period before a burst of mutations is written out.
pub(crate) const DEFAULT_PERSIST_DEBOUNCE_MS: u64 = 250;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    // Keeps everything in memory; used by tests and throwaway sessions.
    pub(crate) disable_persistence: Option<bool>,
    pub(crate) persist_debounce_ms: Option<u64>,
}

pub(crate) fn load_app_config(data_dir: &str) -> AppConfig {
    let path = Path::new(data_dir).join(CONFIG_FILE_NAME);
    let Ok(bytes) = std::fs::read(&path) else {
        return AppConfig::default();
    };
    match serde_json::from_slice::<AppConfig>(&bytes) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(%e, path = %path.display(), "ignoring malformed config");
            AppConfig::default()
        }
    }
}

pub(crate) fn default_app_config_json() -> String {
    let config = AppConfig {
        disable_persistence: Some(false),
        persist_debounce_ms: Some(DEFAULT_PERSIST_DEBOUNCE_MS),
    };
    serde_json::to_string_pretty(&config).unwrap_or_else(|_| "{}".into())
}

impl AppConfig {
    pub(crate) fn persistence_enabled(&self) -> bool {
        if let Some(disable) = self.disable_persistence {
            return !disable;
        }
        std::env::var("SPOTLITE_DISABLE_PERSISTENCE").ok().as_deref() != Some("1")
    }

    pub(crate) fn persist_debounce(&self) -> Duration {
        Duration::from_millis(
            self.persist_debounce_ms
                .unwrap_or(DEFAULT_PERSIST_DEBOUNCE_MS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = load_app_config(dir.path().to_str().unwrap());
        assert_eq!(
            config.persist_debounce(),
            Duration::from_millis(DEFAULT_PERSIST_DEBOUNCE_MS)
        );
    }

    #[test]
    fn partial_config_is_accepted() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"persist_debounce_ms": 10}"#,
        )
        .unwrap();
        let config = load_app_config(dir.path().to_str().unwrap());
        assert_eq!(config.persist_debounce(), Duration::from_millis(10));
        assert_eq!(config.disable_persistence, None);
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{oops").unwrap();
        let config = load_app_config(dir.path().to_str().unwrap());
        assert_eq!(config.persist_debounce_ms, None);
    }

    #[test]
    fn explicit_flag_beats_env() {
        let config = AppConfig {
            disable_persistence: Some(true),
            ..Default::default()
        };
        assert!(!config.persistence_enabled());
    }

    #[test]
    fn default_json_parses_back() {
        let config: AppConfig = serde_json::from_str(&default_app_config_json()).unwrap();
        assert_eq!(config.disable_persistence, Some(false));
        assert_eq!(config.persist_debounce_ms, Some(DEFAULT_PERSIST_DEBOUNCE_MS));
    }
}
