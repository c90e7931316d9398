//! Naming rules shared by every backend.

use path::{join, parent};

/// Deployment name of a method: `lower(service)-lower(method)`.
///
/// Used for the manifest file name, the Knative service name and the
/// gateway's authority rewrite, so all three always agree.
pub fn service_name(service: &str, method: &str) -> String {
    format!("{}-{}", service.to_lowercase(), method.to_lowercase())
}

/// Directory holding one method's generated code, `lower(service)/lower(method)`.
pub fn method_dir(service: &str, method: &str) -> String {
    join(&[&service.to_lowercase(), &method.to_lowercase()])
}

/// Go package name of a method implementation.
pub fn method_package(method: &str) -> String { method.to_lowercase() }

/// Last segment of a fully qualified proto type, `.pkg.Hello` -> `Hello`.
pub fn extract_type_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Go import path of the code protoc-gen-go emits for `proto_file`.
///
/// protoc-gen-go keeps the directory of the source file, so a file at
/// `greeter/v1/greeter.proto` lands in `{base}/{gen_dir}/proto/greeter/v1`.
pub fn proto_import_path(base: &str, gen_dir: &str, proto_file: &str) -> String {
    join(&[base, gen_dir, "proto", &parent(proto_file)])
}

/// Go import path of a method implementation under `methods_dir`.
pub fn impl_import_path(base: &str, methods_dir: &str, service: &str, method: &str) -> String {
    join(&[base, methods_dir, &method_dir(service, method)])
}

/// Container image path of a method's entrypoint.
pub fn entrypoint_image(base: &str, gen_dir: &str, service: &str, method: &str) -> String {
    join(&[base, gen_dir, "entrypoint", &method_dir(service, method)])
}
