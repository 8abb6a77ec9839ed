use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LANGUAGE: &str = "en_US";
pub const LOCAL_CONFIG_FILE: &str = ".spellcheck.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_language")]
    pub language: String,

    /// Base directories searched, in order, for `<lang>.aff`/`<lang>.dic`.
    #[serde(default)]
    pub dictionary_dirs: Vec<PathBuf>,

    pub personal_dictionary: Option<PathBuf>,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_max_suggestions() -> usize {
    5
}

fn default_max_text_length() -> usize {
    50_000
}

impl Default for Config {
    fn default() -> Self {
        let mut dictionary_dirs = vec![
            PathBuf::from("public").join("dictionaries"),
            PathBuf::from("dictionaries"),
        ];
        if let Some(data_dir) = Self::data_dir() {
            dictionary_dirs.push(data_dir.join("dictionaries"));
        }

        Self {
            language: default_language(),
            dictionary_dirs,
            personal_dictionary: None,
            max_suggestions: default_max_suggestions(),
            max_text_length: default_max_text_length(),
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(
        language: Option<String>,
        dict_dirs: Vec<PathBuf>,
        personal_dict: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                log::debug!("Loading global config from {}", global_path.display());
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            log::debug!("Loading local config from {}", local_path.display());
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        Ok(config.with_overrides(language, dict_dirs, personal_dict))
    }

    /// CLI flags win; extra dictionary dirs are searched before configured ones.
    pub fn with_overrides(
        mut self,
        language: Option<String>,
        dict_dirs: Vec<PathBuf>,
        personal_dict: Option<PathBuf>,
    ) -> Self {
        if let Some(language) = language {
            self.language = language;
        }
        if !dict_dirs.is_empty() {
            let mut dirs = dict_dirs;
            dirs.extend(self.dictionary_dirs.drain(..));
            self.dictionary_dirs = dirs;
        }
        if personal_dict.is_some() {
            self.personal_dictionary = personal_dict;
        }
        self
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        if other.language != DEFAULT_LANGUAGE {
            self.language = other.language;
        }
        if !other.dictionary_dirs.is_empty() {
            self.dictionary_dirs = other.dictionary_dirs;
        }
        if other.personal_dictionary.is_some() {
            self.personal_dictionary = other.personal_dictionary;
        }
        if other.max_suggestions != default_max_suggestions() {
            self.max_suggestions = other.max_suggestions;
        }
        if other.max_text_length != default_max_text_length() {
            self.max_text_length = other.max_text_length;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellcheck").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellcheck").map(|dirs| dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.language, "en_US");
        assert_eq!(config.max_suggestions, 5);
        assert_eq!(config.max_text_length, 50_000);
        assert_eq!(
            config.dictionary_dirs[0],
            PathBuf::from("public").join("dictionaries")
        );
    }

    #[test]
    fn test_merge_configs() {
        let base = Config::default();
        let override_config = Config {
            language: "en_GB".to_string(),
            dictionary_dirs: Vec::new(),
            max_suggestions: 3,
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.language, "en_GB");
        assert_eq!(merged.max_suggestions, 3);
        assert!(!merged.dictionary_dirs.is_empty());
    }

    #[test]
    fn test_cli_dict_dirs_are_searched_first() {
        let config = Config::default().with_overrides(
            Some("en_GB".to_string()),
            vec![PathBuf::from("/opt/dicts")],
            None,
        );
        assert_eq!(config.language, "en_GB");
        assert_eq!(config.dictionary_dirs[0], PathBuf::from("/opt/dicts"));
        assert!(config.dictionary_dirs.len() > 1);
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "dictionary_dirs = [\"assets\"]\nmax_text_length = 100\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.language, "en_US");
        assert_eq!(config.dictionary_dirs, vec![PathBuf::from("assets")]);
        assert_eq!(config.max_text_length, 100);
        assert_eq!(config.max_suggestions, 5);
    }
}
