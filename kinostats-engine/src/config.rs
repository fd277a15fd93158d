use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use kinostats_db::models::KINO_MAX_NUM;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Impossible de lire {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON invalide dans {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration invalide : {0}")]
    Invalid(String),
}

/// Paramètres du rapport, constants pour toute la durée du processus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Plus grand numéro tirable.
    pub max_num: u8,
    /// Fenêtre du classement top-N ; `None` = tout l'historique.
    pub ranking_window: Option<usize>,
    /// Fenêtres d'affichage ; la première est la fenêtre principale.
    pub display_windows: Vec<usize>,
    pub top_n: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            max_num: KINO_MAX_NUM,
            ranking_window: None,
            display_windows: vec![196],
            top_n: 5,
        }
    }
}

impl StatsConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: StatsConfig = serde_json::from_str(&json).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_num == 0 {
            return Err(ConfigError::Invalid("max_num doit être >= 1".to_string()));
        }
        if self.display_windows.is_empty() {
            return Err(ConfigError::Invalid(
                "au moins une fenêtre d'affichage est requise".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StatsConfig::default();
        assert_eq!(config.max_num, 80);
        assert_eq!(config.ranking_window, None);
        assert_eq!(config.display_windows, vec![196]);
        assert_eq!(config.top_n, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StatsConfig = serde_json::from_str(r#"{"top_n": 10}"#).unwrap();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.max_num, 80);
        assert_eq!(config.display_windows, vec![196]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = StatsConfig { max_num: 0, ..StatsConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        let config = StatsConfig { display_windows: vec![], ..StatsConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let config = StatsConfig {
            max_num: 49,
            ranking_window: Some(500),
            display_windows: vec![50, 196],
            top_n: 6,
        };
        config.save(&path).unwrap();
        assert_eq!(StatsConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(StatsConfig::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ pas du json").unwrap();
        assert!(matches!(StatsConfig::load(&broken), Err(ConfigError::Json { .. })));

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, r#"{"display_windows": []}"#).unwrap();
        assert!(matches!(StatsConfig::load(&invalid), Err(ConfigError::Invalid(_))));
    }
}
