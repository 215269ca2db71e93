use crate::defs::{clamp_dimension, DEFAULT_ANNOUNCEMENT, DEFAULT_DIMENSION, MAX_DIMENSION};
use crate::logging::{log_info, log_warning};

use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "conf/bingo.conf";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub dimension: usize,
    pub announcement: String,
    pub speech_command: Option<String>,
    pub log_file: Option<String>,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            announcement: DEFAULT_ANNOUNCEMENT.to_string(),
            speech_command: None,
            log_file: None,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_str_content(&content)
    }

    pub fn from_str_content(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config_map = parse_config(content)?;
        let defaults = Self::default();

        let dimension = match config_map.get("dimension") {
            Some(d) => {
                let dimension = clamp_dimension(d.parse::<usize>()?);
                if dimension > MAX_DIMENSION {
                    return Err(format!("dimension {dimension} is larger than {MAX_DIMENSION}").into());
                }
                dimension
            }
            None => defaults.dimension,
        };

        let announcement = config_map.get("announcement")
            .filter(|a| !a.is_empty())
            .cloned()
            .unwrap_or(defaults.announcement);

        let speech_command = config_map.get("speech_command")
            .filter(|s| !s.is_empty())
            .cloned();

        let log_file = config_map.get("log_file")
            .filter(|s| !s.is_empty())
            .cloned();

        let seed = match config_map.get("seed") {
            Some(s) => Some(s.parse::<u64>()?),
            None => None,
        };

        Ok(GameConfig { dimension, announcement, speech_command, log_file, seed })
    }

    pub fn load_from_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        match Self::from_file(path) {
            Ok(config) => {
                log_info(&format!("Loaded configuration from {}", path.display()));
                config
            }
            Err(e) => {
                log_warning(&format!("Could not load config from {}: {}. Using defaults.", path.display(), e));
                Self::default()
            }
        }
    }
}

fn parse_config(content: &str) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let mut config = HashMap::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse key = value pairs
        match line.split_once('=') {
            Some((key, value)) => {
                let key = key.trim().to_string();
                let value = value.trim().trim_matches('"').to_string();
                config.insert(key, value);
            }
            None => return Err(format!("line {}: expected key = value", index + 1).into()),
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let content = r#"
            # This is a comment
            dimension = 7
            announcement = "Bingo!"
            # Another comment
            speech_command = espeak
        "#;

        let config = parse_config(content).unwrap();
        assert_eq!(config.get("dimension"), Some(&"7".to_string()));
        assert_eq!(config.get("announcement"), Some(&"Bingo!".to_string()));
        assert_eq!(config.get("speech_command"), Some(&"espeak".to_string()));
    }

    #[test]
    fn test_parse_config_rejects_bare_words() {
        assert!(parse_config("dimension 5").is_err());
    }

    #[test]
    fn test_game_config_default() {
        let config = GameConfig::default();
        assert_eq!(config.dimension, 5);
        assert_eq!(config.announcement, "¡BINGO!");
        assert_eq!(config.speech_command, None);
        assert_eq!(config.log_file, None);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_game_config_from_content() {
        let content = "dimension = 4\nseed = 99\nlog_file = bingo.log\n";
        let config = GameConfig::from_str_content(content).unwrap();
        assert_eq!(config.dimension, 4);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.log_file.as_deref(), Some("bingo.log"));
        assert_eq!(config.announcement, "¡BINGO!");
    }

    #[test]
    fn test_game_config_clamps_small_dimension() {
        let config = GameConfig::from_str_content("dimension = 1").unwrap();
        assert_eq!(config.dimension, 3);
    }

    #[test]
    fn test_game_config_rejects_huge_dimension() {
        assert!(GameConfig::from_str_content("dimension = 50").is_ok());
        assert!(GameConfig::from_str_content("dimension = 40000").is_err());
    }

    #[test]
    fn test_game_config_rejects_bad_numbers() {
        assert!(GameConfig::from_str_content("dimension = five").is_err());
        assert!(GameConfig::from_str_content("seed = -1").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = GameConfig::load_from_or_default("does/not/exist.conf");
        assert_eq!(config, GameConfig::default());
    }
}
