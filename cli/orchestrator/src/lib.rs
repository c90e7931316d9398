#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Collection of utilities for the korpc command-line entry point.

use std::io::{Read, Write};
use std::sync::Arc;

use codegen::Toolchain;
use config::{Config, ConfigError};
use parameter::Parameters;
use plugins::GeneratorRegistry;
use thiserror::Error;

/// Errors that end a korpc run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The plugin protocol failed.
    #[error(transparent)]
    Transport(#[from] dispatch::TransportError),
    /// A protoc run failed.
    #[error(transparent)]
    Pipeline(#[from] pipeline::PipelineError),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Toolchain root used when the configured one cannot be resolved.
pub const FALLBACK_TOOLCHAIN_ROOT: &str = ".korpc";

fn with_current_exe(mut toolchain: Toolchain) -> Toolchain {
    if let Some(exe) = std::env::current_exe().ok().and_then(|p| p.to_str().map(str::to_string)) {
        toolchain.plugin = exe;
    }
    toolchain
}

/// Resolve the toolchain, defaulting the plugin to this executable.
pub fn resolve_toolchain(config: &Config) -> Result<Toolchain> {
    let toolchain = config.toolchain.resolve()?;
    if config.toolchain.plugin.is_none() {
        return Ok(with_current_exe(toolchain));
    }
    Ok(toolchain)
}

/// The configuration plugin mode runs with.
///
/// protoc only shows diagnostics carried in the response, so a broken
/// configuration is logged and replaced with the defaults.
pub fn plugin_config(loaded: std::result::Result<Config, ConfigError>) -> Config {
    loaded.unwrap_or_else(|e| {
        tracing::warn!("{}; continuing with the default configuration", e);
        Config::default()
    })
}

/// A registry holding every built-in generator.
pub fn build_registry(toolchain: Toolchain) -> GeneratorRegistry {
    let registry = GeneratorRegistry::new();
    backend_codegen::register_builtin(&registry, Arc::new(toolchain));
    registry
}

/// The layout and deployment fields of a parameter record, from configuration.
pub fn layout_parameters(config: &Config) -> Parameters {
    Parameters {
        base: config.layout.base.clone(),
        gen_dir: config.layout.gen_dir.clone(),
        methods_dir: config.layout.methods_dir.clone(),
        domain: config.deploy.domain.clone(),
        namespace: config.deploy.namespace.clone(),
        ..Parameters::default()
    }
}

/// Serve one plugin request.
///
/// A toolchain that cannot be resolved falls back to
/// [`FALLBACK_TOOLCHAIN_ROOT`]; only the dispatch files reference it.
pub fn run_plugin<R: Read, W: Write>(config: &Config, reader: R, writer: W) -> Result<()> {
    let toolchain = resolve_toolchain(config).unwrap_or_else(|e| {
        tracing::warn!("{}; using the toolchain under {}", e, FALLBACK_TOOLCHAIN_ROOT);
        with_current_exe(Toolchain::from_root(FALLBACK_TOOLCHAIN_ROOT))
    });
    let registry = build_registry(toolchain);
    dispatch::run(&registry, reader, writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_parameters() {
        let mut config = Config::default();
        config.layout.base = "github.com/acme/api".to_string();
        let params = layout_parameters(&config);
        assert_eq!(params.base, "github.com/acme/api");
        assert_eq!(params.gen_dir, "./gen");
        assert_eq!(params.namespace, "default");
        assert!(params.name.is_empty());
    }

    #[test]
    fn test_plugin_config_falls_back_to_defaults() {
        let missing = ConfigError::NotFound(std::path::PathBuf::from("/nonexistent/config.toml"));
        assert_eq!(plugin_config(Err(missing)), Config::default());

        let mut config = Config::default();
        config.deploy.namespace = "prod".to_string();
        assert_eq!(plugin_config(Ok(config.clone())), config);
    }

    #[test]
    fn test_build_registry() {
        let registry = build_registry(Toolchain::from_root("/opt/korpc"));
        assert_eq!(registry.len(), 5);
        assert!(registry.lookup("scaffold").is_some());
    }
}
