// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! korpc descriptor model
//!
//! The wire types exchanged with `protoc`. The request side is a trimmed prost
//! mirror of `google.protobuf.compiler.CodeGeneratorRequest`: it keeps only the
//! fields the generators read, plus the korpc deployment-options extension on
//! `MethodOptions`, which the stock `prost-types` descriptors would discard.
//! Anything else protoc sends is skipped as an unknown field.
//!
//! The response side reuses `prost_types::compiler::CodeGeneratorResponse`.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
