#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Semantic views over the descriptor graph.
//!
//! Generators never walk `proto_file` by hand: they ask this crate for the
//! methods in the files being generated, for one specific `(service, method)`
//! pair, and for the streaming shape that decides which template variant to
//! render.

use descriptor::{FileDescriptor, GenerationRequest, MethodDescriptor, ServiceDescriptor};

/// Streaming-shape classification shared by pipeline and codegen
pub mod method_shape;

pub use method_shape::MethodShape;

/// A method together with the service and file that declare it.
#[derive(Debug, Clone, Copy)]
pub struct MethodRef<'a> {
    /// Declaring file.
    pub file: &'a FileDescriptor,
    /// Declaring service.
    pub service: &'a ServiceDescriptor,
    /// The method itself.
    pub method: &'a MethodDescriptor,
}

impl<'a> MethodRef<'a> {
    /// Service name.
    pub fn service_name(&self) -> &'a str { self.service.name() }

    /// Method name.
    pub fn method_name(&self) -> &'a str { self.method.name() }

    /// Streaming shape of the method.
    pub fn shape(&self) -> MethodShape { MethodShape::of(self.method) }

    /// The gRPC request path, `/{package}.{Service}/{Method}`.
    ///
    /// Files without a package produce `/{Service}/{Method}`.
    pub fn rpc_path(&self) -> String {
        match self.file.package() {
            "" => format!("/{}/{}", self.service_name(), self.method_name()),
            package => format!("/{}.{}/{}", package, self.service_name(), self.method_name()),
        }
    }
}

/// Every method declared in the files to generate, in declaration order.
pub fn methods_to_generate(request: &GenerationRequest) -> Vec<MethodRef<'_>> {
    request
        .files_to_generate()
        .flat_map(|file| {
            file.service.iter().flat_map(move |service| {
                service.method.iter().map(move |method| MethodRef { file, service, method })
            })
        })
        .collect()
}

/// Locate one `(service, method)` pair among the files to generate.
///
/// The first match in declaration order wins.
pub fn find_method<'a>(
    request: &'a GenerationRequest,
    service: &str,
    method: &str,
) -> Option<MethodRef<'a>> {
    methods_to_generate(request)
        .into_iter()
        .find(|m| m.service_name() == service && m.method_name() == method)
}
