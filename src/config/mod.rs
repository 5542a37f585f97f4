pub mod init;
mod schema;

pub use init::{starter_data, write_starter_data};
pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Get the config directory path (~/.config/contest-board/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("contest-board")
}

/// Get the default config file path (~/.config/contest-board/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/contest-board/config.yaml) and falls back to built-in
///   defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    debug!(path = %config_path.display(), "config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_explicit_missing_path_is_error() {
        let path = env::temp_dir().join("contest_board_test_no_such_config.yaml");
        let _ = fs::remove_file(&path);

        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_explicit_file() {
        let path = env::temp_dir().join("contest_board_test_config.yaml");
        fs::write(&path, "scoring:\n  max_rating: 7\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.effective_scoring().rating_bounds(), (1.0, 7.0));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_has_context() {
        let path = env::temp_dir().join("contest_board_test_bad_config.yaml");
        fs::write(&path, "scoring: [unclosed").unwrap();

        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("invalid YAML"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_config_path_under_config_dir() {
        assert!(get_config_path().starts_with(get_config_dir()));
        assert!(get_config_path().ends_with("contest-board/config.yaml"));
    }
}
