use std::path::{Path, PathBuf};

use richtext_core::EditorConfig;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to access config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON config")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML config")]
    TomlDe(#[from] toml::de::Error),
    #[error("failed to serialize TOML config")]
    TomlSer(#[from] toml::ser::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// The trait for loading configuration data.
pub trait Loader {
    fn load(&self) -> Result<EditorConfig, ConfigError>;
}

/// The trait for saving configuration data.
pub trait Saver {
    fn save(&self, config: &EditorConfig) -> Result<(), ConfigError>;
}

/// An implementation of [`Loader`] and [`Saver`] that reads and writes a configuration file.
pub struct FileStore {
    path: PathBuf,
}

enum Format {
    Json,
    Toml,
}

impl FileStore {
    /// Create a new [`FileStore`] with the given path.
    ///
    /// [`EditorConfig`] data will be serialized and deserialized using the
    /// file extension, `.json` or `.toml`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Result<Format, ConfigError> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(ConfigError::UnsupportedFormat(self.path.clone())),
        }
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Loader for FileStore {
    fn load(&self) -> Result<EditorConfig, ConfigError> {
        let format = self.format()?;
        let text = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let config = match format {
            Format::Json => serde_json::from_str(&text)?,
            Format::Toml => toml::from_str(&text)?,
        };
        tracing::debug!(path = %self.path.display(), "loaded editor config");
        Ok(config)
    }
}

impl Saver for FileStore {
    fn save(&self, config: &EditorConfig) -> Result<(), ConfigError> {
        let text = match self.format()? {
            Format::Json => serde_json::to_string_pretty(config)?,
            Format::Toml => toml::to_string_pretty(config)?,
        };
        std::fs::write(&self.path, text).map_err(|e| self.io_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("editor.toml"));
        let config = EditorConfig {
            placeholder: "Describe it".into(),
            ..EditorConfig::default()
        };
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{ "link_prompt": "URL?" }"#).unwrap();
        let config = FileStore::new(&path).load().unwrap();
        assert_eq!(config.link_prompt, "URL?");
        assert_eq!(config.placeholder, EditorConfig::default().placeholder);
    }

    #[test]
    fn test_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileStore::new(dir.path().join("editor.yaml")).load(),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            FileStore::new(dir.path().join("missing.json")).load(),
            Err(ConfigError::Io { .. })
        ));
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "placeholder = [").unwrap();
        assert!(matches!(
            FileStore::new(&bad).load(),
            Err(ConfigError::TomlDe(_))
        ));
    }
}
