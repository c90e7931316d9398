//! Proto message name resolution for Go templates.
//!
//! protoc reports request and response types fully qualified
//! (`.greeter.v1.HelloRequest`). The Go identifiers protoc-gen-go emits for
//! them depend on the file that declares the message: nested messages are
//! flattened with underscores and each file's package is imported
//! separately. The file that declares the service is always imported as
//! `pb`; any other file gets `pb1`, `pb2`, ... in the order types from it are
//! first resolved.
//!
//! Only files generated in this run live under `{base}/{gen_dir}/proto`.
//! Dependencies protoc merely passes along (`google/protobuf/empty.proto`)
//! are imported from their `go_package`, or left unresolved without one.

use std::collections::{HashMap, HashSet};
use std::fmt;

use descriptor::{FileDescriptor, GenerationRequest, MessageDescriptor};

use crate::naming::{extract_type_name, proto_import_path};

/// Alias of the service file's Go package.
pub const HOME_ALIAS: &str = "pb";

/// A Go type reference, `alias.Name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoType {
    /// Import alias of the declaring package.
    pub alias: String,
    /// Go identifier of the message.
    pub name: String,
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.alias, self.name)
    }
}

/// One aliased Go import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoImport {
    /// Import alias.
    pub alias: String,
    /// Import path.
    pub path: String,
}

#[derive(Debug, Clone)]
struct MessageLocation {
    import: String,
    go_name: String,
}

/// Resolves message names against every file in a request.
#[derive(Debug)]
pub struct TypeResolver {
    messages: HashMap<String, MessageLocation>,
    home_import: String,
    home_used: bool,
    extra: Vec<GoImport>,
}

impl TypeResolver {
    /// Index the messages of `request` for templates rendered next to `home`.
    pub fn new(request: &GenerationRequest, home: &FileDescriptor, base: &str, gen_dir: &str) -> Self {
        let generated: HashSet<&str> = request.file_to_generate.iter().map(String::as_str).collect();
        let mut messages = HashMap::new();
        for file in &request.proto_file {
            let import = if generated.contains(file.name()) {
                proto_import_path(base, gen_dir, file.name())
            } else {
                match file.go_import_path() {
                    Some(import) => import.to_string(),
                    None => continue,
                }
            };
            let prefix = match file.package() {
                "" => String::new(),
                package => format!(".{package}"),
            };
            for message in &file.message_type {
                index_message(&mut messages, &import, &prefix, "", message);
            }
        }

        Self {
            messages,
            home_import: proto_import_path(base, gen_dir, home.name()),
            home_used: false,
            extra: Vec::new(),
        }
    }

    /// Import path of the service file's Go package.
    pub fn home_import(&self) -> &str { &self.home_import }

    /// Resolve a fully qualified message name.
    ///
    /// Names that are not declared in an importable file fall back to
    /// their last segment in the home package.
    pub fn resolve(&mut self, qualified: &str) -> GoType {
        let Some(location) = self.messages.get(qualified) else {
            self.home_used = true;
            return GoType { alias: HOME_ALIAS.to_string(), name: extract_type_name(qualified).to_string() };
        };

        let (import, name) = (location.import.clone(), location.go_name.clone());
        let alias = self.alias_for(import);
        GoType { alias, name }
    }

    fn alias_for(&mut self, import: String) -> String {
        if import == self.home_import {
            self.home_used = true;
            return HOME_ALIAS.to_string();
        }
        if let Some(existing) = self.extra.iter().find(|i| i.path == import) {
            return existing.alias.clone();
        }
        let alias = format!("{}{}", HOME_ALIAS, self.extra.len() + 1);
        self.extra.push(GoImport { alias: alias.clone(), path: import });
        alias
    }

    /// Imports other than the home package, in first-use order.
    pub fn extra_imports(&self) -> &[GoImport] { &self.extra }

    /// Every import the resolved types need, home package first.
    pub fn imports(&self) -> Vec<GoImport> {
        let home = self
            .home_used
            .then(|| GoImport { alias: HOME_ALIAS.to_string(), path: self.home_import.clone() });
        home.into_iter().chain(self.extra.iter().cloned()).collect()
    }
}

fn index_message(
    messages: &mut HashMap<String, MessageLocation>,
    import: &str,
    prefix: &str,
    go_prefix: &str,
    message: &MessageDescriptor,
) {
    let qualified = format!("{prefix}.{}", message.name());
    let go_name = match go_prefix {
        "" => message.name().to_string(),
        outer => format!("{outer}_{}", message.name()),
    };
    for nested in &message.nested_type {
        index_message(messages, import, &qualified, &go_name, nested);
    }
    messages.insert(qualified, MessageLocation { import: import.to_string(), go_name });
}
