//! `//go:generate` dispatch files.
//!
//! A meta invocation does not render per-method code itself. It writes a Go
//! file whose `//go:generate` directives call protoc again, once per method,
//! with a parameter record naming that method. Running `go generate` on the
//! directory then fans out into the single-method invocations.

use descriptor::GenerationRequest;
use parameter::Parameters;
use path::join;

use crate::toolchain::Toolchain;

/// A follow-up plugin run planned by a meta invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubInvocation {
    /// Output directory, relative to the dispatch file.
    pub dir: String,
    /// Parameter record of the follow-up run.
    pub parameters: Parameters,
}

/// The proto paths to hand protoc from inside `params.nested_directory`.
///
/// Paths are the request's `file_to_generate` entries, re-rooted so they
/// resolve from the directory the dispatch file lives in.
pub fn proto_arguments(params: &Parameters, request: &GenerationRequest) -> Vec<String> {
    let escape = params.nesting_escape();
    request.file_to_generate.iter().map(|file| join(&[&escape, file])).collect()
}

/// Render a Go file in `package` with one protoc directive per invocation.
///
/// With `mkdir` set, each directive is preceded by one creating the
/// invocation's output directory.
pub fn render_dispatch_file(
    package: &str,
    invocations: &[SubInvocation],
    toolchain: &Toolchain,
    protos: &[String],
    mkdir: bool,
) -> String {
    let mut out = format!("package {package}\n");
    for invocation in invocations {
        out.push('\n');
        if mkdir {
            out.push_str(&format!("//go:generate mkdir -p {}\n", invocation.dir));
        }
        let command = toolchain.protoc_command(&invocation.dir, &invocation.parameters, protos);
        out.push_str(&format!("//go:generate {command}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proto_arguments_escape_nesting() {
        let request = GenerationRequest {
            file_to_generate: vec!["greeter/greeter.proto".to_string()],
            parameter: None,
            proto_file: Vec::new(),
        };
        let mut params = Parameters::new("methods");
        assert_eq!(proto_arguments(&params, &request), vec!["greeter/greeter.proto"]);

        params.nested_directory = "pkg/methods".to_string();
        assert_eq!(proto_arguments(&params, &request), vec!["../../greeter/greeter.proto"]);
    }
}
