// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Lexical path utilities for generated output.
//!
//! Generated files live in nested output directories, but the import paths and
//! protoc include roots embedded in them must stay valid relative to the
//! repository root. Everything here works on slash-separated relative paths
//! as plain strings and never touches the filesystem.

pub mod path_utils;

// Re-export for convenience
pub use path_utils::*;
