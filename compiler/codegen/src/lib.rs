// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Shared rendering for the korpc generator backends.
//!
//! This crate holds everything the backends have in common: naming rules
//! for generated services and directories, resolution of proto message
//! names to Go identifiers, the per-shape Go stubs, and the protoc command
//! lines written into `//go:generate` dispatch files.
//!
//! Rendering is pure: every function here maps descriptors and parameters to
//! text and never touches the filesystem.

/// Sub-crate: **`naming`**
///
/// Lowercased service names, method directories and Go import paths.
pub mod naming;

/// Sub-crate: **`type_resolver`**
///
/// Maps fully qualified proto message names to aliased Go identifiers and
/// collects the imports they need.
pub mod type_resolver;
pub use type_resolver::{GoImport, GoType, TypeResolver};

/// Sub-crate: **`go_stubs`**
///
/// Go function skeletons for each of the four method shapes.
pub mod go_stubs;

/// Sub-crate: **`toolchain`**
///
/// Locations of protoc and the plugins, and the command lines that drive them.
pub mod toolchain;
pub use toolchain::{ProtocCommand, Toolchain};

/// Sub-crate: **`dispatch_file`**
///
/// `//go:generate` files that re-invoke the plugin once per method.
pub mod dispatch_file;
pub use dispatch_file::{proto_arguments, render_dispatch_file, SubInvocation};

/// Trim trailing whitespace from each line and drop trailing blank lines.
/// Always ensures the returned string ends with a single newline when not empty.
pub fn clean_generated_source(src: &str) -> String {
    let mut lines: Vec<&str> = src.lines().map(str::trim_end).collect();

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}
