mod theme;

pub use theme::{Palette, Theme, canonical_name};

use crate::error::AppError;
use crate::recent::DEFAULT_RECENT_CAPACITY;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKTRACK_CONFIG_PATH";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,
    /// Command alias -> command line, expanded on the first word of input.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    /// Username -> credential. Empty means the built-in seed account.
    #[serde(default)]
    pub users: HashMap<String, String>,
    #[serde(default)]
    pub recent_capacity: Option<usize>,
}

impl Config {
    pub fn recent_capacity(&self) -> usize {
        self.recent_capacity.unwrap_or(DEFAULT_RECENT_CAPACITY)
    }

    pub fn palette(&self) -> Palette {
        self.theme.palette()
    }

    /// Replaces the first word of `line` when it names an alias.
    ///
    /// Alias lookup ignores case; the rest of the line is appended unchanged.
    pub fn expand_alias(&self, line: &str) -> String {
        let trimmed = line.trim();
        let (head, rest) = trimmed
            .split_once(char::is_whitespace)
            .map(|(head, rest)| (head, rest.trim_start()))
            .unwrap_or((trimmed, ""));

        let expansion = self
            .aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(head))
            .map(|(_, expansion)| expansion.trim());

        match expansion {
            Some(expansion) if rest.is_empty() => expansion.to_string(),
            Some(expansion) => format!("{expansion} {rest}"),
            None => trimmed.to_string(),
        }
    }
}

/// A config plus the error that forced a fallback to defaults, if any.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<Theme>,
    pub aliases: HashMap<String, String>,
    pub recent_capacity: Option<usize>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasktrack")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasktrack")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

pub fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    if config.recent_capacity == Some(0) {
        return Err(AppError::invalid_data(format!(
            "recent_capacity must be at least 1 in {}",
            path.display()
        )));
    }

    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme {
        merged.theme = theme;
    }

    for (alias, value) in overrides.aliases.iter() {
        merged.aliases.insert(alias.clone(), value.clone());
    }

    if let Some(capacity) = overrides.recent_capacity.filter(|capacity| *capacity > 0) {
        merged.recent_capacity = Some(capacity);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::{
        Config, ConfigOverrides, Theme, load_config_from_path,
        load_config_with_fallback_from_path, merge_overrides,
    };
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tasktrack-{nanos}-{file_name}"))
    }

    #[test]
    fn load_config_missing_returns_defaults_without_error() {
        let path = temp_path("missing-config.json");
        let result = load_config_with_fallback_from_path(&path);

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_none());
        assert_eq!(result.config.recent_capacity(), 10);
    }

    #[test]
    fn load_config_invalid_returns_defaults_and_error() {
        let path = temp_path("invalid-config.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let result = load_config_with_fallback_from_path(&path);
        fs::remove_file(&path).ok();

        assert_eq!(result.config, Config::default());
        assert_eq!(result.error.unwrap().code(), "invalid_data");
    }

    #[test]
    fn load_config_reads_valid_file() {
        let path = temp_path("valid-config.json");
        let content = serde_json::json!({
            "theme": "Dark Mode",
            "aliases": { "done": "next" },
            "users": { "bob": "hunter2" },
            "recent_capacity": 3
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.theme, Theme::Noir);
        assert_eq!(loaded.aliases.get("done").map(String::as_str), Some("next"));
        assert_eq!(loaded.users.get("bob").map(String::as_str), Some("hunter2"));
        assert_eq!(loaded.recent_capacity(), 3);
    }

    #[test]
    fn load_config_rejects_unknown_theme() {
        let path = temp_path("bad-theme.json");
        fs::write(&path, r#"{ "theme": "oceanic" }"#).unwrap();

        let err = load_config_from_path(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn load_config_rejects_zero_capacity() {
        let path = temp_path("zero-capacity.json");
        fs::write(&path, r#"{ "recent_capacity": 0 }"#).unwrap();

        let err = load_config_from_path(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(err.message().contains("recent_capacity"));
    }

    #[test]
    fn merge_overrides_updates_without_touching_base() {
        let base = Config {
            theme: Theme::Plain,
            aliases: [("done".into(), "next".into())].into_iter().collect(),
            ..Config::default()
        };
        let overrides = ConfigOverrides {
            theme: Some(Theme::Solarized),
            aliases: [("ls".into(), "list".into())].into_iter().collect(),
            recent_capacity: Some(4),
        };

        let merged = merge_overrides(&base, &overrides);

        assert_eq!(base.theme, Theme::Plain);
        assert!(base.aliases.get("ls").is_none());
        assert_eq!(merged.theme, Theme::Solarized);
        assert_eq!(merged.aliases.get("ls").map(String::as_str), Some("list"));
        assert_eq!(merged.aliases.get("done").map(String::as_str), Some("next"));
        assert_eq!(merged.recent_capacity(), 4);
    }

    #[test]
    fn merge_overrides_ignores_zero_capacity() {
        let overrides = ConfigOverrides {
            recent_capacity: Some(0),
            ..ConfigOverrides::default()
        };

        let merged = merge_overrides(&Config::default(), &overrides);
        assert_eq!(merged, Config::default());
    }

    #[test]
    fn expand_alias_rewrites_first_word_only() {
        let config = Config {
            aliases: [
                ("done".into(), "next".into()),
                ("find".into(), "search".into()),
            ]
            .into_iter()
            .collect(),
            ..Config::default()
        };

        assert_eq!(config.expand_alias("DONE"), "next");
        assert_eq!(config.expand_alias("find  Fix bug"), "search Fix bug");
        assert_eq!(config.expand_alias(" list "), "list");
    }
}
