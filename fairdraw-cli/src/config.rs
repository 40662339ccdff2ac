use anyhow::Context;
use fairdraw_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub engine: EngineConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            engine: EngineConfig::default(),
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fairdraw")
}

impl CliConfig {
    /// Defaults, overlaid by `<data_dir>/config.json` when it exists.
    /// An explicit `data_dir` always wins over the file.
    pub fn load(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let dir = data_dir.clone().unwrap_or_else(default_data_dir);
        let mut config = Self::read_file(&dir.join(CONFIG_FILE))?.unwrap_or_default();

        if let Some(explicit) = data_dir {
            config.data_dir = explicit;
        }

        config.engine.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = CliConfig::load(Some(temp_dir.path().to_path_buf())).unwrap();

        assert_eq!(config.data_dir, temp_dir.path());
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_file_overrides_engine_settings() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE),
            r#"{"engine": {"max_span": 100, "max_key_attempts": 2}}"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(temp_dir.path().to_path_buf())).unwrap();
        assert_eq!(config.engine.max_span, 100);
        assert_eq!(config.engine.max_key_attempts, 2);
        assert_eq!(config.engine.key_bytes, 9);
        assert_eq!(config.data_dir, temp_dir.path());
    }

    #[test]
    fn test_invalid_engine_settings_are_rejected() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE),
            r#"{"engine": {"max_key_attempts": 0}}"#,
        )
        .unwrap();

        assert!(CliConfig::load(Some(temp_dir.path().to_path_buf())).is_err());
    }
}
