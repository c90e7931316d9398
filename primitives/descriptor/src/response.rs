// SPDX-License-Identifier: Apache-2.0

//! Response-side model and its wire conversion.

use prost_types::compiler::{code_generator_response, CodeGeneratorResponse};

/// One generated output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the `--<name>_out` directory.
    pub name: String,
    /// Full file contents.
    pub content: String,
}

impl GeneratedFile {
    /// Create a generated file record.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { name: name.into(), content: content.into() }
    }
}

/// Outcome of one invocation: files or a single error, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResponse {
    /// Generated files, in emission order.
    Files(Vec<GeneratedFile>),
    /// Error protoc reports as a diagnostic.
    Error(String),
}

impl GenerationResponse {
    /// Convert into the protoc wire message.
    pub fn into_wire(self) -> CodeGeneratorResponse {
        let supported_features = Some(code_generator_response::Feature::Proto3Optional as u64);
        match self {
            GenerationResponse::Files(files) => CodeGeneratorResponse {
                file: files
                    .into_iter()
                    .map(|f| code_generator_response::File {
                        name: Some(f.name),
                        content: Some(f.content),
                        ..Default::default()
                    })
                    .collect(),
                supported_features,
                ..Default::default()
            },
            GenerationResponse::Error(message) => CodeGeneratorResponse {
                error: Some(message),
                supported_features,
                ..Default::default()
            },
        }
    }

    /// Whether this is an error response.
    pub fn is_error(&self) -> bool { matches!(self, GenerationResponse::Error(_)) }
}
