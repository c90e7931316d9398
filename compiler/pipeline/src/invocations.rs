//! The standard invocation list.

use codegen::{ProtocCommand, Toolchain};
use parameter::Parameters;
use path::join;

/// Which plugin an invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    /// protoc-gen-go with its gRPC plugin.
    Go,
    /// The korpc plugin.
    Korpc,
}

/// One top-level protoc run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Plugin to run.
    pub plugin: PluginKind,
    /// Parameter record; `nested_directory` doubles as the output directory.
    pub parameters: Parameters,
    /// Whether the output is a dispatch file that still needs `go generate`.
    pub go_generate: bool,
}

impl Invocation {
    fn new(plugin: PluginKind, layout: &Parameters, name: &str, nested: String, go_generate: bool) -> Self {
        let parameters = Parameters {
            name: name.to_string(),
            service: String::new(),
            method: String::new(),
            nested_directory: nested,
            ..layout.clone()
        };
        Self { plugin, parameters, go_generate }
    }

    /// Output directory, relative to the repository root.
    pub fn out_dir(&self) -> &str { &self.parameters.nested_directory }

    /// The protoc command, run from the repository root.
    pub fn command(&self, toolchain: &Toolchain, protos: &[String]) -> ProtocCommand {
        let out = self.out_dir();
        match self.plugin {
            PluginKind::Go => toolchain.go_protoc_command(out, &self.parameters, protos),
            PluginKind::Korpc => toolchain.protoc_command(out, &self.parameters, protos),
        }
    }
}

/// The five runs of a full generation, in execution order.
///
/// `layout` supplies `base`, `gen_dir`, `methods_dir`, `domain` and
/// `namespace`; any name or target it carries is ignored.
pub fn standard_invocations(layout: &Parameters) -> Vec<Invocation> {
    let under_gen = |sub: &str| join(&[&layout.gen_dir, sub]);
    vec![
        Invocation::new(PluginKind::Go, layout, "proto", under_gen("proto"), false),
        Invocation::new(PluginKind::Korpc, layout, "entrypoint", under_gen("entrypoint"), true),
        Invocation::new(PluginKind::Korpc, layout, "config", under_gen("config"), true),
        // The routing rules deploy together with the manifests.
        Invocation::new(PluginKind::Korpc, layout, "gateway", under_gen("config"), false),
        Invocation::new(PluginKind::Korpc, layout, "methods", join(&[&layout.methods_dir]), true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_invocations() {
        let mut layout = Parameters::new("ignored");
        layout.gen_dir = "./gen".to_string();
        layout.methods_dir = "./pkg/methods".to_string();

        let invocations = standard_invocations(&layout);
        let summary: Vec<(&str, &str, bool)> = invocations
            .iter()
            .map(|i| (i.parameters.name.as_str(), i.out_dir(), i.go_generate))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("proto", "gen/proto", false),
                ("entrypoint", "gen/entrypoint", true),
                ("config", "gen/config", true),
                ("gateway", "gen/config", false),
                ("methods", "pkg/methods", true),
            ]
        );
        assert_eq!(invocations[0].plugin, PluginKind::Go);
    }
}
