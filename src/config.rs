//! Application configuration management.
//!
//! Configuration is layered with figment, later layers overriding earlier
//! ones:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML file (`config.toml` in the platform config directory, or `--config`)
//! 3. `ROMDUPE_*` environment variables (e.g. `ROMDUPE_PERMANENT=false`)
//! 4. CLI flags, applied by the caller
//!
//! The multi-part pattern table is compiled while loading so a malformed
//! pattern stops the program at startup instead of surfacing per file.
//!
//! # Example file
//!
//! ```toml
//! image_extensions = [".png", ".jpg"]
//! permanent = false
//! multi_part_patterns = ['\(disc\s*\d+\)', '\(side\s*[AB]\)']
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::images::DEFAULT_IMAGE_EXTENSIONS;
use crate::classifier::{Classifier, MultiPartRules, RuleError, DEFAULT_MULTI_PART_PATTERNS};

/// Prefix of environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "ROMDUPE_";

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// The layered configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] Box<figment::Error>),

    /// A multi-part pattern failed to compile.
    #[error(transparent)]
    InvalidPattern(#[from] RuleError),

    /// An image extension entry is empty.
    #[error("image extensions must not be empty strings")]
    EmptyImageExtension,

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The config file could not be written.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ordered multi-part patterns, matched case-insensitively.
    pub multi_part_patterns: Vec<String>,
    /// Preview image extensions, tried in order.
    pub image_extensions: Vec<String>,
    /// Remove files permanently instead of moving them to the trash.
    pub permanent: bool,
    /// Ignore dot-files in the ROM directory.
    pub skip_hidden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            multi_part_patterns: DEFAULT_MULTI_PART_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            permanent: true,
            skip_hidden: false,
        }
    }
}

impl Config {
    /// Load configuration from the default path (or `path`), then the
    /// environment, and validate it.
    ///
    /// # Errors
    ///
    /// Fails if an explicit `path` is missing, the layers cannot be parsed,
    /// or any pattern is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(ref file) = file {
            log::debug!("Reading configuration from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        Self::from_figment(&figment)
    }

    /// Load from a specific TOML file and the environment.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Extract and validate a configuration from any figment.
    ///
    /// # Errors
    ///
    /// Fails on parse errors or invalid patterns.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let mut config: Self = figment.extract().map_err(Box::new)?;
        config.image_extensions = normalize_extensions(&config.image_extensions)?;
        config.rules()?;
        Ok(config)
    }

    /// Compile the multi-part pattern table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for the first bad pattern.
    pub fn rules(&self) -> Result<MultiPartRules, ConfigError> {
        Ok(MultiPartRules::from_patterns(&self.multi_part_patterns)?)
    }

    /// Build a classifier from the configured rules.
    ///
    /// # Errors
    ///
    /// See [`Config::rules`].
    pub fn classifier(&self) -> Result<Classifier, ConfigError> {
        Ok(Classifier::new(self.rules()?))
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write this configuration to a TOML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails on serialization or I/O errors.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_toml()?).map_err(io_err)?;
        log::info!("Configuration written to {}", path.display());
        Ok(())
    }

    /// Write the built-in defaults to `path`.
    ///
    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        Self::default().save(path)
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "romdupe", "romdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Ensure every extension starts with a dot.
fn normalize_extensions(extensions: &[String]) -> Result<Vec<String>, ConfigError> {
    extensions
        .iter()
        .map(|ext| {
            let ext = ext.trim();
            if ext.is_empty() || ext == "." {
                Err(ConfigError::EmptyImageExtension)
            } else if ext.starts_with('.') {
                Ok(ext.to_string())
            } else {
                Ok(format!(".{}", ext))
            }
        })
        .collect()
}
