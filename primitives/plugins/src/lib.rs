#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! korpc Plugins
//!
//! This crate defines the generator contract every backend implements and the
//! registry the dispatcher uses to find a backend by the name carried in the
//! plugin parameter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use descriptor::{GeneratedFile, GenerationRequest};
use parameter::Parameters;
use thiserror::Error;

/// Errors a generator reports back through the protocol response.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The requested service/method pair is not declared in the files to generate.
    #[error("Unable to find {service}.{method}")]
    NotFound {
        /// Requested service.
        service: String,
        /// Requested method.
        method: String,
    },
    /// The generator only works on a single method but was invoked in meta mode.
    #[error("generator {generator:?} requires a target service and method")]
    RequiresMethod {
        /// Name of the generator.
        generator: String,
    },
    /// Parameters are well-formed but unusable for this generator.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    /// Formatting error while rendering a template.
    #[error(transparent)]
    Render(#[from] std::fmt::Error),
}

/// Convenient result type for generators.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// A named code generator selectable through the plugin parameter.
pub trait Generator: Send + Sync {
    /// Name the parameter record uses to select this generator.
    fn name(&self) -> &'static str;

    /// One-line description for listings.
    fn description(&self) -> &'static str { "" }

    /// Produce the files for one invocation.
    fn generate(&self, params: &Parameters, request: &GenerationRequest)
        -> Result<Vec<GeneratedFile>>;
}

/// Registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A generator with this name is already registered.
    #[error("Duplicate generator named {0:?} registered")]
    Conflict(String),
}

/// Maps generator names to implementations.
///
/// Built once at startup and handed to the dispatcher. Registration and
/// lookup take a mutex; contention is not a concern since a process serves a
/// single request.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: Mutex<HashMap<String, Arc<dyn Generator>>>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self { Self::default() }

    fn guard(&self) -> MutexGuard<'_, HashMap<String, Arc<dyn Generator>>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.generators.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `generator` under `name`, failing if the name is taken.
    pub fn try_register_as(
        &self,
        name: &str,
        generator: Arc<dyn Generator>,
    ) -> std::result::Result<(), RegistryError> {
        let mut generators = self.guard();
        if generators.contains_key(name) {
            return Err(RegistryError::Conflict(name.to_string()));
        }
        tracing::trace!(generator = name, "registered generator");
        generators.insert(name.to_string(), generator);
        Ok(())
    }

    /// Register `generator` under its own name, failing if the name is taken.
    pub fn try_register(&self, generator: Arc<dyn Generator>) -> std::result::Result<(), RegistryError> {
        let name = generator.name();
        self.try_register_as(name, generator)
    }

    /// Register `generator` under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered. Two generators claiming one
    /// name is a wiring bug in the binary, not something to recover from.
    pub fn register_as(&self, name: &str, generator: Arc<dyn Generator>) {
        if let Err(e) = self.try_register_as(name, generator) {
            tracing::error!("{}", e);
            panic!("{}", e);
        }
    }

    /// Register `generator` under its own name.
    ///
    /// # Panics
    ///
    /// Panics if the name is already registered.
    pub fn register(&self, generator: Arc<dyn Generator>) {
        let name = generator.name();
        self.register_as(name, generator)
    }

    /// Look up a generator by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Generator>> { self.guard().get(name).cloned() }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.guard().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered generators.
    pub fn len(&self) -> usize { self.guard().len() }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool { self.guard().is_empty() }
}
