// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Protocol dispatcher.
//!
//! One plugin run is one request: read the serialized request from the
//! reader until EOF, pick the generator named by the plugin parameter, and
//! write exactly one response. Anything that goes wrong inside generation is
//! reported in the response's error field so protoc can print it; only
//! failures to read or write the protocol messages themselves escape as
//! [`TransportError`].

use std::io::{Read, Write};

use descriptor::{GenerationRequest, GenerationResponse};
use parameter::Parameters;
use plugins::GeneratorRegistry;
use prost::Message;
use thiserror::Error;

/// Failures of the plugin protocol itself.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Reading the request failed.
    #[error("failed to read request: {0}")]
    Read(#[source] std::io::Error),
    /// The input is not a serialized request.
    #[error("failed to decode request: {0}")]
    Decode(#[from] prost::DecodeError),
    /// The response could not be serialized.
    #[error("failed to encode response: {0}")]
    Encode(#[from] prost::EncodeError),
    /// Writing the response failed.
    #[error("failed to write response: {0}")]
    Write(#[source] std::io::Error),
}

/// Convenient result type for the dispatcher.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Run one plugin invocation from `reader` to `writer`.
pub fn run<R: Read, W: Write>(registry: &GeneratorRegistry, mut reader: R, mut writer: W) -> Result<()> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input).map_err(TransportError::Read)?;
    tracing::trace!(bytes = input.len(), "read request");

    let request = GenerationRequest::decode(input.as_slice())?;
    let response = dispatch(registry, &request);
    tracing::trace!(error = response.is_error(), "writing response");

    let wire = response.into_wire();
    let mut output = Vec::with_capacity(wire.encoded_len());
    wire.encode(&mut output)?;
    writer.write_all(&output).map_err(TransportError::Write)?;
    writer.flush().map_err(TransportError::Write)?;
    Ok(())
}

/// Route a decoded request to its generator.
///
/// Never fails: every problem becomes an error response.
pub fn dispatch(registry: &GeneratorRegistry, request: &GenerationRequest) -> GenerationResponse {
    let params = match Parameters::decode(request.parameter()) {
        Ok(params) => params,
        Err(e) => {
            tracing::warn!("rejecting request: {}", e);
            return GenerationResponse::Error(format!("invalid plugin parameter: {e}"));
        }
    };
    tracing::debug!(parameters = ?params, "decoded plugin parameter");

    let Some(generator) = registry.lookup(&params.name) else {
        tracing::warn!(generator = %params.name, "no such generator");
        return GenerationResponse::Error(format!("Unrecognized plugin {:?}", params.name));
    };

    match generator.generate(&params, request) {
        Ok(files) if files.is_empty() => {
            GenerationResponse::Error(format!("generator {:?} produced no files", params.name))
        }
        Ok(files) => {
            tracing::info!(count = files.len(), "generated {}", params);
            GenerationResponse::Files(files)
        }
        Err(e) => {
            tracing::warn!("{} failed: {}", params, e);
            GenerationResponse::Error(e.to_string())
        }
    }
}
