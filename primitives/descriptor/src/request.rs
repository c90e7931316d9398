// SPDX-License-Identifier: Apache-2.0

//! Request-side descriptor mirrors.

use std::collections::{BTreeMap, HashSet};

/// Field number of the `korpc.options` extension on `google.protobuf.MethodOptions`.
///
/// Must stay in sync with `include/korpc/options.proto`.
pub const DEPLOY_OPTIONS_EXTENSION: u32 = 50501;

/// A single plugin invocation as protoc serializes it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GenerationRequest {
    /// Files explicitly named on the protoc command line.
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    /// The opaque `--<name>_opt` string.
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    /// Every parsed file, dependencies first.
    #[prost(message, repeated, tag = "15")]
    pub proto_file: Vec<FileDescriptor>,
}

/// Mirror of `FileDescriptorProto`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileDescriptor {
    /// Path relative to the include root, e.g. `greeter/v1/greeter.proto`.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Declared proto package, e.g. `greeter.v1`.
    #[prost(string, optional, tag = "2")]
    pub package: Option<String>,
    /// Top-level messages.
    #[prost(message, repeated, tag = "4")]
    pub message_type: Vec<MessageDescriptor>,
    /// Declared services.
    #[prost(message, repeated, tag = "6")]
    pub service: Vec<ServiceDescriptor>,
    /// File options, reduced to `go_package`.
    #[prost(message, optional, tag = "8")]
    pub options: Option<FileOptions>,
}

/// `FileOptions`, reduced to the Go import path.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileOptions {
    /// `option go_package`, either `path` or `path;name`.
    #[prost(string, optional, tag = "11")]
    pub go_package: Option<String>,
}

/// Mirror of `DescriptorProto`, names only.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageDescriptor {
    /// Simple message name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Messages declared inside this one.
    #[prost(message, repeated, tag = "3")]
    pub nested_type: Vec<MessageDescriptor>,
}

/// Mirror of `ServiceDescriptorProto`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServiceDescriptor {
    /// Service name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Declared RPC methods, in source order.
    #[prost(message, repeated, tag = "2")]
    pub method: Vec<MethodDescriptor>,
}

/// Mirror of `MethodDescriptorProto`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MethodDescriptor {
    /// Method name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Fully qualified request type, e.g. `.greeter.v1.HelloRequest`.
    #[prost(string, optional, tag = "2")]
    pub input_type: Option<String>,
    /// Fully qualified response type.
    #[prost(string, optional, tag = "3")]
    pub output_type: Option<String>,
    /// Method options, including the korpc extension.
    #[prost(message, optional, tag = "4")]
    pub options: Option<MethodOptions>,
    /// Whether the client sends a stream of requests.
    #[prost(bool, optional, tag = "5")]
    pub client_streaming: Option<bool>,
    /// Whether the server sends a stream of responses.
    #[prost(bool, optional, tag = "6")]
    pub server_streaming: Option<bool>,
}

/// `MethodOptions`, reduced to the korpc extension.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MethodOptions {
    /// `(korpc.options)` on the method.
    #[prost(message, optional, tag = "50501")]
    pub deploy: Option<DeployOptions>,
}

/// `korpc.Options`: per-method deployment knobs for the generated manifest.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeployOptions {
    /// Kubernetes service account to run as.
    #[prost(string, tag = "1")]
    pub service_account: String,
    /// Hard limit of concurrent requests per container; 0 means unlimited.
    #[prost(int64, tag = "2")]
    pub container_concurrency: i64,
    /// Request timeout; 0 leaves the platform default.
    #[prost(int64, tag = "3")]
    pub timeout_seconds: i64,
    /// Environment variables for the container.
    #[prost(message, repeated, tag = "4")]
    pub env: Vec<EnvVar>,
    /// Resource limits and requests.
    #[prost(message, optional, tag = "5")]
    pub resources: Option<ResourceRequirements>,
}

/// One `name=value` environment entry.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnvVar {
    /// Variable name.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Variable value.
    #[prost(string, tag = "2")]
    pub value: String,
}

/// Container resource quantities keyed by resource name (`cpu`, `memory`, ...).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResourceRequirements {
    /// Upper bounds.
    #[prost(btree_map = "string, string", tag = "1")]
    pub limits: BTreeMap<String, String>,
    /// Scheduling requests.
    #[prost(btree_map = "string, string", tag = "2")]
    pub requests: BTreeMap<String, String>,
}

impl GenerationRequest {
    /// The files protoc asked us to generate for, in `proto_file` order.
    pub fn files_to_generate(&self) -> impl Iterator<Item = &FileDescriptor> + '_ {
        let wanted: HashSet<&str> = self.file_to_generate.iter().map(String::as_str).collect();
        self.proto_file.iter().filter(move |fd| wanted.contains(fd.name()))
    }
}

impl FileDescriptor {
    /// Create a file descriptor with no messages or services.
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            package: Some(package.into()),
            message_type: Vec::new(),
            service: Vec::new(),
            options: None,
        }
    }

    /// Set `option go_package`.
    pub fn with_go_package(mut self, go_package: impl Into<String>) -> Self {
        self.options = Some(FileOptions { go_package: Some(go_package.into()) });
        self
    }

    /// Import path from `option go_package`, without any `;name` suffix.
    pub fn go_import_path(&self) -> Option<&str> {
        let go_package = self.options.as_ref()?.go_package.as_deref()?;
        match go_package.split_once(';') {
            Some((path, _)) => Some(path),
            None => Some(go_package),
        }
        .filter(|path| !path.is_empty())
    }

    /// Add a top-level message.
    pub fn with_message(mut self, message: MessageDescriptor) -> Self {
        self.message_type.push(message);
        self
    }

    /// Add a service.
    pub fn with_service(mut self, service: ServiceDescriptor) -> Self {
        self.service.push(service);
        self
    }
}

impl MessageDescriptor {
    /// Create a message descriptor without nested types.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), nested_type: Vec::new() }
    }

    /// Add a nested message.
    pub fn with_nested(mut self, nested: MessageDescriptor) -> Self {
        self.nested_type.push(nested);
        self
    }
}

impl ServiceDescriptor {
    /// Create a service with the given methods.
    pub fn new(name: impl Into<String>, methods: Vec<MethodDescriptor>) -> Self {
        Self { name: Some(name.into()), method: methods }
    }
}

impl MethodDescriptor {
    /// Create a unary method.
    pub fn new(
        name: impl Into<String>,
        input_type: impl Into<String>,
        output_type: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            input_type: Some(input_type.into()),
            output_type: Some(output_type.into()),
            options: None,
            client_streaming: None,
            server_streaming: None,
        }
    }

    /// Set the streaming flags.
    pub fn streaming(mut self, client: bool, server: bool) -> Self {
        self.client_streaming = Some(client);
        self.server_streaming = Some(server);
        self
    }

    /// Attach deployment options.
    pub fn with_deploy_options(mut self, deploy: DeployOptions) -> Self {
        self.options = Some(MethodOptions { deploy: Some(deploy) });
        self
    }

    /// Deployment options from the korpc extension, if the method declares any.
    pub fn deploy_options(&self) -> Option<&DeployOptions> {
        self.options.as_ref().and_then(|o| o.deploy.as_ref())
    }
}
