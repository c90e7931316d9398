//! `entrypoint`: the gRPC server binary of one method.
//!
//! Each method is deployed as its own service. The entrypoint registers the
//! full gRPC service but serves only its own method through the user's
//! `Impl`; every other method answers `Unimplemented`, since the gateway
//! never routes those calls here.

use std::sync::Arc;

use codegen::go_stubs::{render_server_method, render_unimplemented_method, IMPL_ALIAS};
use codegen::naming::impl_import_path;
use codegen::type_resolver::HOME_ALIAS;
use codegen::{clean_generated_source, proto_arguments, render_dispatch_file, Toolchain, TypeResolver};
use descriptor::{GeneratedFile, GenerationRequest};
use parameter::{Mode, Parameters};
use plugins::{Generator, Result};
use semantics::{MethodRef, MethodShape};

use crate::methods::DISPATCH_FILE;
use crate::{plan_all, target, Fanout};

/// The `entrypoint` generator.
#[derive(Debug, Clone)]
pub struct EntrypointGenerator {
    toolchain: Arc<Toolchain>,
}

const ENTRYPOINT_MAIN: &str = r#"func main() {
	if len(os.Args) > 1 && os.Args[1] == "probe" {
		probe()
		return
	}
	lis, err := net.Listen("tcp", fmt.Sprintf(":%s", os.Getenv("PORT")))
	if err != nil {
		log.Fatalf("failed to listen: %v", err)
	}

	// Serves h2c; TLS terminates at the ingress.
	grpcServer := grpc.NewServer()

	pb.Register{{SERVICE}}Server(grpcServer, &server{})
	healthpb.RegisterHealthServer(grpcServer, &health{})

	if err := grpcServer.Serve(lis); err != nil {
		log.Fatalf("failed to serve: %v", err)
	}
}

func probe() {
	ctx, cancel := context.WithTimeout(context.Background(), 1*time.Second)
	defer cancel()
	conn, err := grpc.DialContext(ctx, fmt.Sprintf("localhost:%s", os.Getenv("PORT")), grpc.WithInsecure())
	if err != nil {
		log.Fatalf("Error connecting: %v", err)
	}
	resp, err := healthpb.NewHealthClient(conn).Check(ctx, &healthpb.HealthCheckRequest{Service: "{{SERVICE}}"})
	if err != nil {
		log.Fatalf("Error health checking: %v", err)
	}
	log.Printf("Health check: %#v", resp)
}

type health struct{}

func (h *health) Check(ctx context.Context, req *healthpb.HealthCheckRequest) (*healthpb.HealthCheckResponse, error) {
	return &healthpb.HealthCheckResponse{Status: healthpb.HealthCheckResponse_SERVING}, nil
}

func (h *health) Watch(*healthpb.HealthCheckRequest, healthpb.Health_WatchServer) error {
	return status.Error(codes.Unimplemented, "korpc does not implement Watch")
}

var _ = errors.New("keep errors imported")
var _ = io.EOF
"#;

impl EntrypointGenerator {
    /// Create the generator with the toolchain its directives call.
    pub fn new(toolchain: Arc<Toolchain>) -> Self { Self { toolchain } }

    fn generate_meta(&self, params: &Parameters, request: &GenerationRequest) -> Vec<GeneratedFile> {
        let invocations = plan_all(self.name(), params, request, Fanout::PerMethodDirectory);
        tracing::debug!(count = invocations.len(), "planned entrypoint directories");
        let protos = proto_arguments(params, request);
        let content = render_dispatch_file("entrypoint", &invocations, &self.toolchain, &protos, true);
        vec![GeneratedFile::new(DISPATCH_FILE, clean_generated_source(&content))]
    }
}

/// Render `main.go` serving `served` and stubbing its sibling methods.
pub fn render_entrypoint(params: &Parameters, request: &GenerationRequest, served: &MethodRef<'_>) -> String {
    let mut resolver = TypeResolver::new(request, served.file, &params.base, &params.gen_dir);
    let service = served.service_name();

    let mut methods = Vec::with_capacity(served.service.method.len());
    for method in &served.service.method {
        let input = resolver.resolve(method.input_type()).to_string();
        let output = resolver.resolve(method.output_type()).to_string();
        let shape = MethodShape::of(method);
        let rendered = if method.name() == served.method_name() {
            render_server_method(shape, service, method.name(), &input, &output)
        } else {
            render_unimplemented_method(shape, service, method.name(), &input, &output)
        };
        methods.push(rendered);
    }

    let extra_imports: String = resolver
        .extra_imports()
        .iter()
        .map(|import| format!("\t{} \"{}\"\n", import.alias, import.path))
        .collect();

    format!(
        "package main\n\
         \n\
         import (\n\
         \t\"context\"\n\
         \t\"errors\"\n\
         \t\"fmt\"\n\
         \t\"io\"\n\
         \t\"log\"\n\
         \t\"net\"\n\
         \t\"os\"\n\
         \t\"time\"\n\
         \n\
         \t\"google.golang.org/grpc\"\n\
         \t\"google.golang.org/grpc/codes\"\n\
         \thealthpb \"google.golang.org/grpc/health/grpc_health_v1\"\n\
         \t\"google.golang.org/grpc/status\"\n\
         \n\
         \t{home_alias} \"{home}\"\n\
         {extra_imports}\
         \t{impl_alias} \"{implementation}\"\n\
         )\n\
         \n\
         type server struct{{}}\n\
         \n\
         {methods}\n\
         {main}",
        home_alias = HOME_ALIAS,
        home = resolver.home_import(),
        impl_alias = IMPL_ALIAS,
        implementation = impl_import_path(&params.base, &params.methods_dir, service, served.method_name()),
        methods = methods.join("\n"),
        main = ENTRYPOINT_MAIN.replace("{{SERVICE}}", service),
    )
}

impl Generator for EntrypointGenerator {
    fn name(&self) -> &'static str { "entrypoint" }

    fn description(&self) -> &'static str { "gRPC server binary per method" }

    fn generate(&self, params: &Parameters, request: &GenerationRequest) -> Result<Vec<GeneratedFile>> {
        if params.mode() == Mode::Meta {
            return Ok(self.generate_meta(params, request));
        }
        let method = target(params, request)?;
        tracing::debug!(shape = %method.shape(), "rendering entrypoint for {}", params);
        let content = render_entrypoint(params, request, &method);
        Ok(vec![GeneratedFile::new("main.go", clean_generated_source(&content))])
    }
}
