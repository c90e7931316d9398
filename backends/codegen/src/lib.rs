// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! korpc Generator Backends
//!
//! The five generators the `korpc` binary ships with. Each is selected by the
//! `name` field of the plugin parameter and runs in one of two modes:
//!
//! - **meta**: no target method. The generator plans one follow-up
//!   invocation per method ([`plan_all`]) and writes them into a
//!   `//go:generate` dispatch file.
//! - **method**: a single `(service, method)` pair. The generator locates
//!   it, classifies its streaming shape and renders the matching variant.
//!
//! The two passes normally run as separate protoc invocations chained by
//! `go generate`. [`render_one`] runs a planned sub-invocation in process.

use std::sync::Arc;

use codegen::{SubInvocation, Toolchain};
use descriptor::{GeneratedFile, GenerationRequest};
use parameter::{Mode, Parameters};
use path::join;
use plugins::{GeneratorError, GeneratorRegistry, Result};
use semantics::{find_method, methods_to_generate, MethodRef};

pub mod config;
pub mod entrypoint;
pub mod gateway;
pub mod methods;
pub mod scaffold;

pub use config::{render_manifest, ConfigGenerator, ManifestOptions};
pub use entrypoint::EntrypointGenerator;
pub use gateway::{render_routing, GatewayGenerator, Route};
pub use methods::MethodsGenerator;
pub use scaffold::ScaffoldGenerator;

/// Where a planned follow-up invocation writes its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fanout {
    /// Into `lower(service)/lower(method)` below the dispatch file.
    PerMethodDirectory,
    /// Next to the dispatch file.
    SharedDirectory,
}

/// Plan one invocation of generator `name` for every method in the files to generate.
pub fn plan_all(
    name: &str,
    params: &Parameters,
    request: &GenerationRequest,
    fanout: Fanout,
) -> Vec<SubInvocation> {
    methods_to_generate(request)
        .into_iter()
        .map(|m| {
            let (service, method) = (m.service_name(), m.method_name());
            let (dir, nested) = match fanout {
                Fanout::PerMethodDirectory => {
                    let dir = codegen::naming::method_dir(service, method);
                    let nested = join(&[&params.nested_directory, &dir]);
                    (dir, nested)
                }
                Fanout::SharedDirectory => (".".to_string(), params.nested_directory.clone()),
            };
            SubInvocation { dir, parameters: params.with_target(name, service, method, nested) }
        })
        .collect()
}

/// Execute one planned sub-invocation against the same request.
///
/// File names come back relative to the planning invocation's output
/// directory, i.e. prefixed with the sub-invocation's `dir`.
pub fn render_one(
    registry: &GeneratorRegistry,
    invocation: &SubInvocation,
    request: &GenerationRequest,
) -> Result<Vec<GeneratedFile>> {
    let name = &invocation.parameters.name;
    let generator = registry
        .lookup(name)
        .ok_or_else(|| GeneratorError::InvalidParameters(format!("no generator named {name:?}")))?;
    let files = generator.generate(&invocation.parameters, request)?;
    Ok(files
        .into_iter()
        .map(|file| GeneratedFile { name: join(&[&invocation.dir, &file.name]), ..file })
        .collect())
}

/// Resolve the single method a method-mode invocation targets.
///
/// Meta-mode parameters fail with [`GeneratorError::RequiresMethod`].
pub fn target<'a>(params: &Parameters, request: &'a GenerationRequest) -> Result<MethodRef<'a>> {
    match params.mode() {
        Mode::Meta => Err(GeneratorError::RequiresMethod { generator: params.name.clone() }),
        Mode::Method { service, method } => find_method(request, service, method).ok_or_else(|| {
            GeneratorError::NotFound { service: service.to_string(), method: method.to_string() }
        }),
    }
}

/// Kubernetes namespace from the parameters, `default` when unset.
pub fn namespace(params: &Parameters) -> &str {
    match params.namespace.as_str() {
        "" => "default",
        namespace => namespace,
    }
}

/// Register every built-in generator.
///
/// # Panics
///
/// Panics if any of the built-in names is already taken in `registry`.
pub fn register_builtin(registry: &GeneratorRegistry, toolchain: Arc<Toolchain>) {
    registry.register(Arc::new(MethodsGenerator::new(Arc::clone(&toolchain))));
    registry.register(Arc::new(ScaffoldGenerator));
    registry.register(Arc::new(EntrypointGenerator::new(Arc::clone(&toolchain))));
    registry.register(Arc::new(ConfigGenerator::new(toolchain)));
    registry.register(Arc::new(GatewayGenerator));
}
