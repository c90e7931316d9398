// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Plugin parameter codec.
//!
//! protoc hands a plugin exactly one string of configuration (`--<name>_opt`).
//! korpc packs a small record into it: the record is serialized to JSON,
//! dropping empty fields, and the JSON is wrapped in standard base64 so the
//! value survives shells, argument parsers and `//go:generate` lines without
//! quoting.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding a parameter string.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// The string is not valid standard base64.
    #[error("parameter is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The decoded bytes are not UTF-8.
    #[error("parameter payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// The payload is not the expected JSON record.
    #[error("parameter payload is not a valid record: {0}")]
    Json(#[from] serde_json::Error),
    /// Exactly one of `service` and `method` is set.
    #[error("service ({service:?}) and method ({method:?}) must be set together")]
    PartialTarget {
        /// The decoded service name.
        service: String,
        /// The decoded method name.
        method: String,
    },
}

/// Convenient result type for parameter operations.
pub type Result<T> = std::result::Result<T, ParameterError>;

/// The configuration record carried through the plugin parameter string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Generator to dispatch to.
    pub name: String,
    /// Base import path of the repository, e.g. `github.com/acme/api`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base: String,
    /// Directory (relative to the root) holding generated code and config.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gen_dir: String,
    /// Directory (relative to the root) holding method implementations.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub methods_dir: String,
    /// Domain the API gateway serves on.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
    /// Kubernetes namespace to deploy into.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Target service for a single-method invocation.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,
    /// Target method for a single-method invocation.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method: String,
    /// Output directory of this invocation, relative to the root.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub nested_directory: String,
}

/// Which kind of invocation a parameter record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode<'a> {
    /// No target: enumerate every method.
    Meta,
    /// Exactly one `(service, method)` pair.
    Method {
        /// Target service name.
        service: &'a str,
        /// Target method name.
        method: &'a str,
    },
}

impl Parameters {
    /// Create a meta-mode record for the named generator.
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into(), ..Self::default() } }

    /// Serialize to the opaque parameter string.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(STANDARD.encode(json))
    }

    /// Like [`Parameters::encode`], for call sites building command lines.
    ///
    /// # Panics
    ///
    /// Panics if the record cannot be serialized, which cannot happen for a
    /// struct of plain strings.
    pub fn must_encode(&self) -> String {
        match self.encode() {
            Ok(encoded) => encoded,
            Err(e) => panic!("Failure during must_encode for {:?}: {}", self.name, e),
        }
    }

    /// Parse an opaque parameter string.
    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = STANDARD.decode(encoded.trim())?;
        let json = String::from_utf8(bytes)?;
        let params: Parameters = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Check the service/method pairing invariant.
    pub fn validate(&self) -> Result<()> {
        if self.service.is_empty() != self.method.is_empty() {
            return Err(ParameterError::PartialTarget {
                service: self.service.clone(),
                method: self.method.clone(),
            });
        }
        Ok(())
    }

    /// Meta or single-method, from the target fields.
    pub fn mode(&self) -> Mode<'_> {
        if self.service.is_empty() && self.method.is_empty() {
            Mode::Meta
        } else {
            Mode::Method { service: &self.service, method: &self.method }
        }
    }

    /// Relative path from `nested_directory` back to the repository root.
    pub fn nesting_escape(&self) -> String { path::escape(&self.nested_directory) }

    /// Derive the record for a follow-up invocation of `name` scoped to one method.
    ///
    /// Layout and deployment fields carry over; the target and output
    /// directory are replaced.
    pub fn with_target(
        &self,
        name: &str,
        service: &str,
        method: &str,
        nested_directory: impl Into<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            service: service.to_string(),
            method: method.to_string(),
            nested_directory: nested_directory.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}.{})", self.name, self.service, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_encoding() {
        let params = Parameters::new("gateway");
        let encoded = params.encode().expect("encode");
        let json = String::from_utf8(STANDARD.decode(encoded).expect("base64")).expect("utf8");
        assert_eq!(json, r#"{"name":"gateway"}"#);
    }

    #[test]
    fn test_display() {
        let params = Parameters::new("scaffold").with_target("scaffold", "Greeter", "SayHello", "");
        assert_eq!(params.to_string(), "scaffold (Greeter.SayHello)");
        assert_eq!(Parameters::new("gateway").to_string(), "gateway (.)");
    }
}
