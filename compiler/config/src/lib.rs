#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! korpc Configuration
//!
//! This crate provides configuration management for the `korpc` binary.
//! It handles loading and saving the TOML file that specifies:
//! - Repository layout (import base, generated and methods directories)
//! - Deployment settings (gateway domain, namespace)
//! - Toolchain locations (protoc, includes, plugins)
//! - Logging configuration
//!
//! Every section has defaults, so a partial file (or none at all) is valid.
//! Command-line flags override whatever is loaded here.

use std::path::{Path, PathBuf};

use codegen::Toolchain;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Configuration file was not found at the specified path
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
    /// Could not locate the user's home directory for the toolchain root
    #[error("Could not find home directory; set toolchain.root")]
    HomeDirUnavailable,
    /// A configured path is not valid UTF-8
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository layout
    pub layout: LayoutConfig,
    /// Deployment settings
    pub deploy: DeployConfig,
    /// Toolchain locations
    pub toolchain: ToolchainConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Where generated and user-owned code lives
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Go import path of the repository root (e.g., "github.com/acme/api")
    pub base: String,
    /// Generated code and config, relative to the root
    pub gen_dir: String,
    /// Method implementations, relative to the root
    pub methods_dir: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { base: String::new(), gen_dir: "./gen".to_string(), methods_dir: "./pkg/methods".to_string() }
    }
}

/// Deployment settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Host the gateway serves
    pub domain: String,
    /// Kubernetes namespace
    pub namespace: String,
}

impl Default for DeployConfig {
    fn default() -> Self { Self { domain: String::new(), namespace: "default".to_string() } }
}

/// Toolchain locations; unset entries derive from `root`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain root (defaults to `~/.korpc`)
    pub root: Option<PathBuf>,
    /// protoc binary
    pub protoc: Option<PathBuf>,
    /// protoc's bundled include directory
    pub protoc_include: Option<PathBuf>,
    /// Directory holding `korpc/options.proto`
    pub korpc_include: Option<PathBuf>,
    /// The korpc plugin binary
    pub plugin: Option<PathBuf>,
    /// protoc-gen-go binary
    pub protoc_gen_go: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string() } }
}

fn utf8(path: &Path) -> Result<String, ConfigError> {
    path.to_str().map(str::to_string).ok_or_else(|| ConfigError::NonUtf8Path(path.to_path_buf()))
}

impl ToolchainConfig {
    /// The toolchain root: `root` when set, otherwise `~/.korpc`
    pub fn root_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => Ok(dirs::home_dir().ok_or(ConfigError::HomeDirUnavailable)?.join(".korpc")),
        }
    }

    /// Resolve every location, applying overrides on top of the root layout
    pub fn resolve(&self) -> Result<Toolchain, ConfigError> {
        let mut toolchain = Toolchain::from_root(&utf8(&self.root_dir()?)?);
        let overrides = [
            (&self.protoc, &mut toolchain.protoc),
            (&self.protoc_include, &mut toolchain.protoc_include),
            (&self.korpc_include, &mut toolchain.korpc_include),
            (&self.plugin, &mut toolchain.plugin),
            (&self.protoc_gen_go, &mut toolchain.protoc_gen_go),
        ];
        for (configured, slot) in overrides {
            if let Some(path) = configured {
                *slot = utf8(path)?;
            }
        }
        Ok(toolchain)
    }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load an explicitly named file, or the default file if it exists.
    ///
    /// A missing explicit file is an error; a missing default file yields
    /// the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let path = Self::default_path()?;
        match Self::from_file(&path) {
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Returns the default config file path:
    /// `{config_dir()}/korpc/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("korpc");
        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_from_file_partial() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(&temp_file, "[layout]\nbase = \"github.com/acme/api\"\n\n[deploy]\ndomain = \"api.acme.dev\"\n")
            .expect("Failed to write config");

        let config = Config::from_file(&temp_file).expect("Failed to load partial config");
        assert_eq!(config.layout.base, "github.com/acme/api");
        assert_eq!(config.layout.gen_dir, "./gen");
        assert_eq!(config.deploy.domain, "api.acme.dev");
        assert_eq!(config.deploy.namespace, "default");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(&temp_file, "[layout\nbase = ").expect("Failed to write config");

        match Config::from_file(&temp_file).expect_err("Expected parse error for invalid TOML") {
            ConfigError::Parse(_) => {}
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let missing = temp_dir.path().join("config.toml");

        match Config::load(Some(&missing)).expect_err("Explicit missing file must fail") {
            ConfigError::NotFound(path) => assert_eq!(path, missing),
            other => panic!("Expected NotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_path() {
        let path = Config::default_path().expect("Failed to get default config path");
        assert!(path.ends_with("korpc/config.toml"));
    }

    #[test]
    fn test_toolchain_overrides() {
        let toolchain_config = ToolchainConfig {
            root: Some(PathBuf::from("/opt/korpc")),
            plugin: Some(PathBuf::from("/usr/local/bin/korpc")),
            ..ToolchainConfig::default()
        };
        let toolchain = toolchain_config.resolve().expect("Failed to resolve toolchain");
        assert_eq!(toolchain.protoc, "/opt/korpc/protoc-3.7.0/bin/protoc");
        assert_eq!(toolchain.korpc_include, "/opt/korpc/include");
        assert_eq!(toolchain.plugin, "/usr/local/bin/korpc");
    }
}
