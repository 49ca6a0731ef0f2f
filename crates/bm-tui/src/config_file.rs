//! Configuration file loading.
//!
//! The optional `--config` file is JSON with the same field names as
//! [`GameConfig`]; missing fields fall back to the defaults. This is the one
//! fatal error path in the program: a broken config aborts startup instead
//! of silently playing with other tuning than the player asked for.

use std::fs;
use std::path::Path;

use thiserror::Error;

use bm_core::{ConfigError, GameConfig};

/// Failures loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Loads and validates a [`GameConfig`] from a JSON file.
pub fn load_config(path: &Path) -> Result<GameConfig, ConfigFileError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: GameConfig =
        serde_json::from_str(&text).map_err(|source| ConfigFileError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("bitmasher-{}-{name}.json", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_loads_a_partial_config() {
        let path = temp_config("partial", r#"{"move_chance": 0.5}"#);
        let config = load_config(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.move_chance, 0.5);
        assert_eq!(config.max_steps, GameConfig::default().max_steps);
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let path = temp_config("invalid", r#"{"move_chance": 7.0}"#);
        let result = load_config(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigFileError::Invalid(_))));
    }

    #[test]
    fn test_rejects_garbage() {
        let path = temp_config("garbage", "not json");
        let result = load_config(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigFileError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = load_config(Path::new("/nonexistent/bitmasher.json"));
        assert!(matches!(result, Err(ConfigFileError::Read { .. })));
    }
}
