//! `scaffold`: the user-owned implementation stub of one method.

use codegen::go_stubs::render_impl;
use codegen::naming::method_package;
use codegen::{clean_generated_source, TypeResolver};
use descriptor::{GeneratedFile, GenerationRequest};
use parameter::Parameters;
use plugins::{Generator, Result};
use semantics::MethodRef;

use crate::target;

/// The `scaffold` generator. Method mode only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaffoldGenerator;

/// Render `main.go` for `method`.
pub fn render_scaffold(params: &Parameters, request: &GenerationRequest, method: &MethodRef<'_>) -> String {
    let mut resolver = TypeResolver::new(request, method.file, &params.base, &params.gen_dir);
    let input = resolver.resolve(method.method.input_type()).to_string();
    let output = resolver.resolve(method.method.output_type()).to_string();
    let body = render_impl(method.shape(), method.service_name(), method.method_name(), &input, &output);

    let imports: String = resolver
        .imports()
        .iter()
        .map(|import| format!("\t{} \"{}\"\n", import.alias, import.path))
        .collect();

    format!(
        "package {package}\n\
         \n\
         import (\n\
         \t\"context\"\n\
         \t\"errors\"\n\
         \n\
         {imports}\
         )\n\
         \n\
         // Avoid import errors for streams.\n\
         var _ = context.TODO()\n\
         \n\
         {body}",
        package = method_package(method.method_name()),
    )
}

impl Generator for ScaffoldGenerator {
    fn name(&self) -> &'static str { "scaffold" }

    fn description(&self) -> &'static str { "method implementation stub" }

    fn generate(&self, params: &Parameters, request: &GenerationRequest) -> Result<Vec<GeneratedFile>> {
        let method = target(params, request)?;
        tracing::debug!(shape = %method.shape(), "rendering scaffold for {}", params);
        let content = render_scaffold(params, request, &method);
        Ok(vec![GeneratedFile::new("main.go", clean_generated_source(&content))])
    }
}
