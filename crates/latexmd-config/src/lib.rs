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

/// Site build settings, read from `latexmd.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the manifest, sources and templates.
    pub src: PathBuf,
    /// Directory the built site is written to.
    pub tgt: PathBuf,
    /// Manifest file name, relative to `src`.
    pub manifest: PathBuf,
    /// Extensions of files loaded as templates.
    pub template_extensions: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            src: PathBuf::from("src"),
            tgt: PathBuf::from("site"),
            manifest: PathBuf::from("manifest.yaml"),
            template_extensions: ["html", "htm", "xml"].map(String::from).to_vec(),
        }
    }
}

impl SiteConfig {
    pub const FILE_NAME: &'static str = "latexmd.toml";

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

        let mut config: SiteConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the configured directories
        config.src = Self::expand_path(&config.src).unwrap_or(config.src);
        config.tgt = Self::expand_path(&config.tgt).unwrap_or(config.tgt);

        Ok(Some(config))
    }

    /// Loads `latexmd.toml` from the working directory, if present.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from(Self::FILE_NAME)
    }

    /// Full path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.src.join(&self.manifest)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
