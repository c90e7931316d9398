//! `methods`: bootstraps the method implementation tree.
//!
//! Implementations are owned by the user once scaffolded, so this generator
//! never writes them directly. Meta mode creates one directory per method
//! and a protoc directive re-invoking `methods` there; the method-mode run
//! then leaves a directive that calls `scaffold`. Running
//! `go generate ./pkg/methods/<service>/<method>` therefore scaffolds just
//! that method without touching the others.

use std::sync::Arc;

use codegen::naming::method_package;
use codegen::{clean_generated_source, proto_arguments, render_dispatch_file, SubInvocation, Toolchain};
use descriptor::{GeneratedFile, GenerationRequest};
use parameter::{Mode, Parameters};
use plugins::{Generator, Result};

use crate::{plan_all, target, Fanout};

/// Name of the dispatch file both modes emit.
pub const DISPATCH_FILE: &str = "korpc.go";

/// The `methods` generator.
#[derive(Debug, Clone)]
pub struct MethodsGenerator {
    toolchain: Arc<Toolchain>,
}

impl MethodsGenerator {
    /// Create the generator with the toolchain its directives call.
    pub fn new(toolchain: Arc<Toolchain>) -> Self { Self { toolchain } }

    fn generate_meta(&self, params: &Parameters, request: &GenerationRequest) -> Vec<GeneratedFile> {
        let invocations = plan_all(self.name(), params, request, Fanout::PerMethodDirectory);
        tracing::debug!(count = invocations.len(), "planned method directories");
        let protos = proto_arguments(params, request);
        let content = render_dispatch_file("methods", &invocations, &self.toolchain, &protos, true);
        vec![GeneratedFile::new(DISPATCH_FILE, clean_generated_source(&content))]
    }

    fn generate_method(&self, params: &Parameters, request: &GenerationRequest) -> Result<Vec<GeneratedFile>> {
        let method = target(params, request)?;
        let scaffold = SubInvocation {
            dir: ".".to_string(),
            parameters: params.with_target(
                "scaffold",
                method.service_name(),
                method.method_name(),
                params.nested_directory.clone(),
            ),
        };
        let protos = proto_arguments(params, request);
        let content = render_dispatch_file(
            &method_package(method.method_name()),
            &[scaffold],
            &self.toolchain,
            &protos,
            false,
        );
        Ok(vec![GeneratedFile::new(DISPATCH_FILE, clean_generated_source(&content))])
    }
}

impl Generator for MethodsGenerator {
    fn name(&self) -> &'static str { "methods" }

    fn description(&self) -> &'static str { "go:generate tree that scaffolds method implementations" }

    fn generate(&self, params: &Parameters, request: &GenerationRequest) -> Result<Vec<GeneratedFile>> {
        match params.mode() {
            Mode::Meta => Ok(self.generate_meta(params, request)),
            Mode::Method { .. } => self.generate_method(params, request),
        }
    }
}
