use std::cell::RefCell;
use std::path::{Path, PathBuf};

use codegen::{ProtocCommand, Toolchain};
use parameter::Parameters;
use pipeline::{generate, CommandRunner, PipelineError};

/// Records commands instead of running them; optionally fails one invocation.
#[derive(Default)]
struct RecordingRunner {
    calls: RefCell<Vec<(String, String, PathBuf)>>,
    fail_on: Option<&'static str>,
}

impl CommandRunner for RecordingRunner {
    fn run(&self, name: &str, command: &ProtocCommand, cwd: &Path) -> pipeline::Result<()> {
        self.calls.borrow_mut().push((name.to_string(), command.to_string(), cwd.to_path_buf()));
        if self.fail_on == Some(name) {
            return Err(PipelineError::ProtocFailed { name: name.to_string(), status: "exit status: 1".to_string() });
        }
        Ok(())
    }
}

/// Helper to create the default layout
fn create_test_layout() -> Parameters {
    let mut layout = Parameters::new("");
    layout.base = "github.com/acme/api".to_string();
    layout.gen_dir = "./gen".to_string();
    layout.methods_dir = "./pkg/methods".to_string();
    layout.namespace = "default".to_string();
    layout
}

#[test]
fn test_generate_runs_all_invocations() {
    let root = tempfile::tempdir().expect("Failed to create temporary directory");
    let runner = RecordingRunner::default();
    let toolchain = Toolchain::from_root("/opt/korpc");

    let pending = generate(root.path(), &create_test_layout(), &toolchain, &["api/greeter.proto".to_string()], &runner)
        .expect("generate");

    assert_eq!(pending, vec!["gen/entrypoint", "gen/config", "pkg/methods"]);
    for dir in ["gen/proto", "gen/entrypoint", "gen/config", "pkg/methods"] {
        assert!(root.path().join(dir).is_dir(), "{dir} was not created");
    }

    let calls = runner.calls.borrow();
    let names: Vec<&str> = calls.iter().map(|(name, _, _)| name.as_str()).collect();
    assert_eq!(names, vec!["proto", "entrypoint", "config", "gateway", "methods"]);
    assert!(calls.iter().all(|(_, _, cwd)| cwd == root.path()));

    let (_, proto, _) = &calls[0];
    assert!(proto.contains(" -I. --plugin=protoc-gen-proto=/opt/korpc/bin/protoc-gen-go "));
    assert!(proto.ends_with(" --proto_out=plugins=grpc:gen/proto api/greeter.proto"));

    let (_, gateway, _) = &calls[3];
    assert!(gateway.contains(" --gateway_out=gen/config "));
}

#[test]
fn test_generate_stops_on_failure() {
    let root = tempfile::tempdir().expect("Failed to create temporary directory");
    let runner = RecordingRunner { fail_on: Some("config"), ..RecordingRunner::default() };

    let err = generate(
        root.path(),
        &create_test_layout(),
        &Toolchain::from_root("/opt/korpc"),
        &["api.proto".to_string()],
        &runner,
    )
    .expect_err("config failure must stop the pipeline");

    assert!(matches!(err, PipelineError::ProtocFailed { ref name, .. } if name == "config"));
    assert_eq!(runner.calls.borrow().len(), 3);
}

#[test]
fn test_generate_requires_protos() {
    let root = tempfile::tempdir().expect("Failed to create temporary directory");
    let err = generate(root.path(), &create_test_layout(), &Toolchain::from_root("/k"), &[], &RecordingRunner::default())
        .expect_err("no protos");
    assert!(matches!(err, PipelineError::NoProtos));
}
