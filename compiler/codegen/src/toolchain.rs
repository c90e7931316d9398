//! protoc command lines.

use std::fmt;

use parameter::Parameters;
use path::{join, to_root};

/// protoc release the default layout expects under the toolchain root.
pub const PROTOC_VERSION: &str = "3.7.0";

/// Where protoc, its well-known includes and the two plugins live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// protoc binary.
    pub protoc: String,
    /// Include directory shipped with protoc (`google/protobuf/*.proto`).
    pub protoc_include: String,
    /// Include directory holding `korpc/options.proto`.
    pub korpc_include: String,
    /// The korpc plugin binary.
    pub plugin: String,
    /// protoc-gen-go, used for the message and service stubs.
    pub protoc_gen_go: String,
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocCommand {
    /// Binary to run.
    pub program: String,
    /// Arguments, unquoted.
    pub args: Vec<String>,
}

impl fmt::Display for ProtocCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl Toolchain {
    /// The conventional layout under `root`.
    pub fn from_root(root: &str) -> Self {
        let protoc_dir = join(&[root, &format!("protoc-{PROTOC_VERSION}")]);
        Self {
            protoc: join(&[&protoc_dir, "bin", "protoc"]),
            protoc_include: join(&[&protoc_dir, "include"]),
            korpc_include: join(&[root, "include"]),
            plugin: join(&[root, "bin", "korpc"]),
            protoc_gen_go: join(&[root, "bin", "protoc-gen-go"]),
        }
    }

    fn base_args(&self, out: &str, params: &Parameters, plugin: &str) -> Vec<String> {
        vec![
            format!("-I{}", self.protoc_include),
            format!("-I{}", self.korpc_include),
            format!("-I{}", to_root(out, &params.nested_directory)),
            format!("--plugin=protoc-gen-{}={}", params.name, plugin),
        ]
    }

    /// Run the korpc plugin as generator `params.name`, writing into `out`.
    ///
    /// `out` is relative to the directory the command runs in, and
    /// `params.nested_directory` is where `out` sits relative to the
    /// repository root; together they locate the include root.
    pub fn protoc_command(&self, out: &str, params: &Parameters, protos: &[String]) -> ProtocCommand {
        let mut args = self.base_args(out, params, &self.plugin);
        args.push(format!("--{}_out={}", params.name, out));
        args.push(format!("--{}_opt={}", params.name, params.must_encode()));
        args.extend(protos.iter().cloned());
        ProtocCommand { program: self.protoc.clone(), args }
    }

    /// Run protoc-gen-go with its gRPC plugin under the name `params.name`.
    pub fn go_protoc_command(&self, out: &str, params: &Parameters, protos: &[String]) -> ProtocCommand {
        let mut args = self.base_args(out, params, &self.protoc_gen_go);
        args.push(format!("--{}_out=plugins=grpc:{}", params.name, out));
        args.extend(protos.iter().cloned());
        ProtocCommand { program: self.protoc.clone(), args }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_root() {
        let toolchain = Toolchain::from_root("/home/dev/.korpc");
        assert_eq!(toolchain.protoc, "/home/dev/.korpc/protoc-3.7.0/bin/protoc");
        assert_eq!(toolchain.protoc_include, "/home/dev/.korpc/protoc-3.7.0/include");
        assert_eq!(toolchain.korpc_include, "/home/dev/.korpc/include");
    }

    #[test]
    fn test_go_form() {
        let toolchain = Toolchain::from_root("/k");
        let mut params = Parameters::new("proto");
        params.nested_directory = "gen/proto".to_string();
        let cmd = toolchain.go_protoc_command("gen/proto", &params, &["api.proto".to_string()]);
        assert_eq!(
            cmd.to_string(),
            "/k/protoc-3.7.0/bin/protoc -I/k/protoc-3.7.0/include -I/k/include -I. \
             --plugin=protoc-gen-proto=/k/bin/protoc-gen-go --proto_out=plugins=grpc:gen/proto api.proto"
        );
    }
}
