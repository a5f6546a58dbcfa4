use std::path::Path;

use serde::{Deserialize, Serialize};

/// User configuration, loaded from `~/.config/stagehand/config.toml`.
/// Every field has a default, so a missing or partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShConfig {
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// [push] section — fallbacks used only when the working tree does not
/// supply a head branch or an upstream remote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    #[serde(default = "default_remote")]
    pub remote: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            branch: default_branch(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

/// [refresh] section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between background re-parses of the working tree.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
        }
    }
}

fn default_interval() -> u64 {
    5
}

/// [ui] section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Start with the three sections folded to their headers.
    #[serde(default)]
    pub start_collapsed: bool,
}

/// Load the config from the user config dir, falling back to defaults when
/// the file is absent.
pub fn load_config() -> ShConfig {
    let Some(dir) = dirs::config_dir() else {
        return ShConfig::default();
    };
    load_config_from(&dir.join("stagehand").join("config.toml"))
}

pub fn load_config_from(path: &Path) -> ShConfig {
    let Ok(content) = std::fs::read_to_string(path) else {
        return ShConfig::default();
    };
    match toml::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            // A broken file must not take the UI down, but the user should
            // be able to find out why their settings were ignored.
            tracing::warn!("ignoring malformed config {}: {err}", path.display());
            ShConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml"));
        assert_eq!(config.push.remote, "origin");
        assert_eq!(config.push.branch, "main");
        assert_eq!(config.refresh.interval_secs, 5);
        assert!(!config.ui.start_collapsed);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[push]\nremote = \"upstream\"\n").unwrap();
        let config = load_config_from(&path);
        assert_eq!(config.push.remote, "upstream");
        assert_eq!(config.push.branch, "main");
        assert_eq!(config.refresh.interval_secs, 5);
    }

    #[test]
    fn full_file_overrides_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[push]\nremote = \"fork\"\nbranch = \"trunk\"\n\
             [refresh]\ninterval_secs = 30\n\
             [ui]\nstart_collapsed = true\n",
        )
        .unwrap();
        let config = load_config_from(&path);
        assert_eq!(config.push.remote, "fork");
        assert_eq!(config.push.branch, "trunk");
        assert_eq!(config.refresh.interval_secs, 30);
        assert!(config.ui.start_collapsed);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[refresh]\ninterval_secs = \"often\"\n").unwrap();
        let config = load_config_from(&path);
        assert_eq!(config.refresh.interval_secs, 5);
    }
}
