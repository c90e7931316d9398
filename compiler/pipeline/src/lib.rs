#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that drives protoc over a repository's protos.
//!
//! A full code generation is five protoc runs, each writing into its own
//! directory below the repository root:
//!
//! - `proto` - protoc-gen-go message and service stubs
//! - `entrypoint` - dispatch file fanning out into per-method servers
//! - `config` - dispatch file fanning out into per-method manifests
//! - `gateway` - the routing rules, next to the manifests
//! - `methods` - dispatch file bootstrapping method implementations
//!
//! ## Module Organization
//!
//! - `invocations` - the standard invocation list and its command lines
//! - `runner` - executing commands, and the `generate` entry point

use thiserror::Error;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// I/O error while creating output directories.
    #[error("failed to create output directory {dir:?}: {source}")]
    CreateDir {
        /// The directory being created.
        dir: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program being started.
        program: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// protoc ran and reported failure.
    #[error("protoc failed for {name:?}: {status}")]
    ProtocFailed {
        /// Invocation name.
        name: String,
        /// Exit status description.
        status: String,
    },
    /// No proto files were given.
    #[error("no proto files given")]
    NoProtos,
}

pub mod invocations;
pub mod runner;

pub use invocations::{standard_invocations, Invocation, PluginKind};
pub use runner::{generate, CommandRunner, SystemRunner};
