mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/marksheet/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("marksheet"))
}

/// Get the default config file path (~/.config/marksheet/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Get the default records file path (~/.config/marksheet/records.json)
pub fn get_records_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("records.json"))
}

/// Ensure the parent directory of `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/marksheet/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path yields the default configuration.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let p = get_config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Records file named by the config, or the default location
pub fn records_path(config: &Config) -> Result<PathBuf> {
    match &config.records {
        Some(p) => Ok(PathBuf::from(p)),
        None => get_records_path(),
    }
}

/// Write a config file holding the default grading table. Refuses to
/// overwrite an existing file.
pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Config file already exists at {}", path.display());
    }
    ensure_parent_dir(path)?;

    let config = Config {
        records: None,
        log_level: Some("warn".to_string()),
        grading: Some(crate::grading::GradingConfig::default()),
    };
    let yaml = serde_saphyr::to_string(&config).context("Failed to serialize default config")?;
    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file at {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_explicit_missing_config_is_error() {
        let path = env::temp_dir().join("marksheet_test_no_such_config.yaml");
        let _ = fs::remove_file(&path);
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_write_then_load_default_config() {
        let path = env::temp_dir().join("marksheet_test_default_config.yaml");
        let _ = fs::remove_file(&path);

        write_default_config(&path).unwrap();
        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert!(crate::grading::validate_grading(config.grading.as_ref().unwrap()).is_ok());

        // second init must not clobber
        assert!(write_default_config(&path).is_err());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let path = env::temp_dir().join("marksheet_test_bad_config.yaml");
        fs::write(&path, "grading: [not, a, map]").unwrap();
        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("invalid YAML"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_records_path_override() {
        let config = Config {
            records: Some("/tmp/x.json".to_string()),
            ..Config::default()
        };
        assert_eq!(records_path(&config).unwrap(), PathBuf::from("/tmp/x.json"));
    }
}
