use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings read from `~/.config/ezwrite/config.toml`. Every field is
/// optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the page store, the log file and exports
    pub data_dir: PathBuf,
    pub editor: EditorConfig,
}

/// Timing knobs for the editor, all in milliseconds except the capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Keystrokes closer together than this share one undo entry
    pub undo_debounce_ms: u64,
    pub undo_capacity: usize,
    /// How long after the last keystroke the user counts as typing
    pub typing_timeout_ms: u64,
    pub timer_tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = shellexpand::tilde("~/.local/share/ezwrite");
        Self {
            data_dir: PathBuf::from(data_dir.as_ref()),
            editor: EditorConfig::default(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_debounce_ms: 500,
            undo_capacity: 100,
            typing_timeout_ms: 1000,
            timer_tick_ms: 500,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.data_dir = Self::expand_path(&config.data_dir).unwrap_or(config.data_dir);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/ezwrite");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Replace the data directory, expanding `~` and environment variables.
    pub fn with_data_dir(mut self, data_dir: &Path) -> Self {
        self.data_dir = Self::expand_path(data_dir).unwrap_or_else(|| data_dir.to_path_buf());
        self
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        shellexpand::full(&path_str)
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let path_str = Config::config_path().to_string_lossy().into_owned();
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/ezwrite/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.data_dir.to_string_lossy().starts_with('~'));
        assert!(config.data_dir.ends_with(".local/share/ezwrite"));
        assert_eq!(config.editor.undo_debounce_ms, 500);
        assert_eq!(config.editor.undo_capacity, 100);
        assert_eq!(config.editor.typing_timeout_ms, 1000);
        assert_eq!(config.editor.timer_tick_ms, 500);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[editor]
undo_capacity = 20
"#,
        )
        .unwrap();
        assert_eq!(config.editor.undo_capacity, 20);
        assert_eq!(config.editor.undo_debounce_ms, 500);
        assert_eq!(config.data_dir, Config::default().data_dir);
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("EZWRITE_TEST_ROOT", "/test/env/path");
        }

        let expanded = Config::expand_path(Path::new("$EZWRITE_TEST_ROOT/subdir"));
        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("EZWRITE_TEST_ROOT");
        }
    }

    #[test]
    fn test_expand_path_unknown_var_fails() {
        assert_eq!(
            Config::expand_path(Path::new("$EZWRITE_SURELY_UNSET_VAR/x")),
            None
        );
    }

    #[test]
    fn test_with_data_dir_expands_tilde() {
        let config = Config::default().with_data_dir(Path::new("~/notes"));
        let path = config.data_dir.to_string_lossy();
        assert!(!path.starts_with('~'));
        assert!(path.ends_with("notes"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_path(temp_dir.path().join("nonexistent.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let config = Config {
            data_dir: PathBuf::from("/tmp/ezwrite-data"),
            editor: EditorConfig {
                timer_tick_ms: 250,
                ..EditorConfig::default()
            },
        };

        config.save_to_path(&config_file).unwrap();
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "editor = [").unwrap();

        assert!(matches!(
            Config::load_from_path(&config_file),
            Err(ConfigError::ConfigParseError { .. })
        ));
    }
}
