//! Go function skeletons per method shape.
//!
//! Two families are rendered here. The scaffold `Impl` function is the one
//! users fill in: request streams arrive as a receive-only channel and
//! response streams leave through a send-only channel, so business logic
//! never touches gRPC types. The entrypoint server methods adapt the gRPC
//! stream API to that channel contract.

use semantics::MethodShape;

/// Alias the entrypoint imports the method implementation under.
pub const IMPL_ALIAS: &str = "impl";

/// Error text of a freshly scaffolded method.
pub fn todo_message(service: &str, method: &str) -> String {
    format!("You need to implement {service}.{method}!!!")
}

/// Status message of a method the entrypoint does not serve.
pub fn unimplemented_message(service: &str, method: &str) -> String {
    format!("{service}.{method} is served by a different entrypoint")
}

/// gRPC stream type protoc-gen-go declares for a streaming method.
fn stream_type(service: &str, method: &str) -> String { format!("pb.{service}_{method}Server") }

/// The `Impl` function a method package exports.
///
/// `request` and `response` are Go type references such as `pb.HelloRequest`.
pub fn render_impl(shape: MethodShape, service: &str, method: &str, request: &str, response: &str) -> String {
    let message = todo_message(service, method);
    match shape {
        MethodShape::Unary => format!(
            "func Impl(ctx context.Context, req *{request}) (*{response}, error) {{\n\
             \treturn nil, errors.New(`{message}`)\n\
             }}\n"
        ),
        MethodShape::ClientStreaming => format!(
            "func Impl(ctx context.Context, input <-chan *{request}) (*{response}, error) {{\n\
             \treturn nil, errors.New(`{message}`)\n\
             }}\n"
        ),
        MethodShape::ServerStreaming => format!(
            "func Impl(ctx context.Context, req *{request}, output chan<- *{response}) error {{\n\
             \treturn errors.New(`{message}`)\n\
             }}\n"
        ),
        MethodShape::BidiStreaming => format!(
            "func Impl(ctx context.Context, input <-chan *{request}, output chan<- *{response}) error {{\n\
             \treturn errors.New(`{message}`)\n\
             }}\n"
        ),
    }
}

/// Receive loop feeding `input` until the client half-closes.
fn receive_loop() -> &'static str {
    r#"	go func() {
		defer close(input)
		for {
			req, err := stream.Recv()
			if err == io.EOF {
				return
			}
			if err != nil {
				errCh <- err
				return
			}
			select {
			case input <- req:
			case <-stream.Context().Done():
				return
			}
		}
	}()
"#
}

/// Send loop draining `output`; reports `nil` once the channel closes.
fn send_loop() -> &'static str {
    r#"	go func() {
		for resp := range output {
			if err := stream.Send(resp); err != nil {
				errCh <- err
				for range output {
				}
				return
			}
		}
		errCh <- nil
	}()
"#
}

/// The `server` method serving `method` through the implementation package.
pub fn render_server_method(
    shape: MethodShape,
    service: &str,
    method: &str,
    request: &str,
    response: &str,
) -> String {
    let stream = stream_type(service, method);
    match shape {
        MethodShape::Unary => format!(
            "func (s *server) {method}(ctx context.Context, req *{request}) (*{response}, error) {{\n\
             \treturn {IMPL_ALIAS}.Impl(ctx, req)\n\
             }}\n"
        ),
        MethodShape::ClientStreaming => format!(
            "func (s *server) {method}(stream {stream}) error {{\n\
             \tinput := make(chan *{request})\n\
             \terrCh := make(chan error, 2)\n\
             \n\
             {recv}\
             \n\
             \tgo func() {{\n\
             \t\tresp, err := {IMPL_ALIAS}.Impl(stream.Context(), input)\n\
             \t\tif err != nil {{\n\
             \t\t\terrCh <- err\n\
             \t\t\treturn\n\
             \t\t}}\n\
             \t\terrCh <- stream.SendAndClose(resp)\n\
             \t}}()\n\
             \n\
             \treturn <-errCh\n\
             }}\n",
            recv = receive_loop(),
        ),
        MethodShape::ServerStreaming => format!(
            "func (s *server) {method}(req *{request}, stream {stream}) error {{\n\
             \toutput := make(chan *{response})\n\
             \terrCh := make(chan error, 2)\n\
             \n\
             \tgo func() {{\n\
             \t\tdefer close(output)\n\
             \t\tif err := {IMPL_ALIAS}.Impl(stream.Context(), req, output); err != nil {{\n\
             \t\t\terrCh <- err\n\
             \t\t}}\n\
             \t}}()\n\
             \n\
             {send}\
             \n\
             \treturn <-errCh\n\
             }}\n",
            send = send_loop(),
        ),
        MethodShape::BidiStreaming => format!(
            "func (s *server) {method}(stream {stream}) error {{\n\
             \tinput := make(chan *{request})\n\
             \toutput := make(chan *{response})\n\
             \terrCh := make(chan error, 3)\n\
             \n\
             {recv}\
             \n\
             \tgo func() {{\n\
             \t\tdefer close(output)\n\
             \t\tif err := {IMPL_ALIAS}.Impl(stream.Context(), input, output); err != nil {{\n\
             \t\t\terrCh <- err\n\
             \t\t}}\n\
             \t}}()\n\
             \n\
             {send}\
             \n\
             \treturn <-errCh\n\
             }}\n",
            recv = receive_loop(),
            send = send_loop(),
        ),
    }
}

/// A `server` method answering `codes.Unimplemented`.
///
/// Every method of the service needs one so `server` satisfies the
/// generated server interface, even though this entrypoint serves only one.
pub fn render_unimplemented_method(
    shape: MethodShape,
    service: &str,
    method: &str,
    request: &str,
    response: &str,
) -> String {
    let message = unimplemented_message(service, method);
    let stream = stream_type(service, method);
    match shape {
        MethodShape::Unary => format!(
            "func (s *server) {method}(ctx context.Context, req *{request}) (*{response}, error) {{\n\
             \treturn nil, status.Error(codes.Unimplemented, \"{message}\")\n\
             }}\n"
        ),
        MethodShape::ServerStreaming => format!(
            "func (s *server) {method}(req *{request}, stream {stream}) error {{\n\
             \treturn status.Error(codes.Unimplemented, \"{message}\")\n\
             }}\n"
        ),
        MethodShape::ClientStreaming | MethodShape::BidiStreaming => format!(
            "func (s *server) {method}(stream {stream}) error {{\n\
             \treturn status.Error(codes.Unimplemented, \"{message}\")\n\
             }}\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impl_signatures() {
        let unary = render_impl(MethodShape::Unary, "Greeter", "SayHello", "pb.Req", "pb.Resp");
        assert!(unary.starts_with("func Impl(ctx context.Context, req *pb.Req) (*pb.Resp, error) {\n"));
        assert!(unary.contains("\treturn nil, errors.New(`You need to implement Greeter.SayHello!!!`)\n"));

        let bidi = render_impl(MethodShape::BidiStreaming, "Greeter", "Chat", "pb.Req", "pb.Resp");
        assert!(bidi.contains("input <-chan *pb.Req, output chan<- *pb.Resp) error {"));
        assert!(bidi.contains("\treturn errors.New("));
    }

    #[test]
    fn test_server_methods_use_stream_type() {
        let client = render_server_method(MethodShape::ClientStreaming, "Greeter", "Upload", "pb.Chunk", "pb.Ack");
        assert!(client.starts_with("func (s *server) Upload(stream pb.Greeter_UploadServer) error {\n"));
        assert!(client.contains("stream.SendAndClose(resp)"));
        assert!(client.contains("\tgo func() {\n\t\tdefer close(input)\n"));

        let server = render_server_method(MethodShape::ServerStreaming, "Greeter", "Watch", "pb.Req", "pb.Event");
        assert!(server.starts_with("func (s *server) Watch(req *pb.Req, stream pb.Greeter_WatchServer) error {\n"));
        assert!(!server.contains("stream.Recv()"));
    }

    #[test]
    fn test_streaming_impl_signatures() {
        let client = render_impl(MethodShape::ClientStreaming, "Greeter", "Upload", "pb.Chunk", "pb.Ack");
        assert_eq!(
            client,
            "func Impl(ctx context.Context, input <-chan *pb.Chunk) (*pb.Ack, error) {\n\
             \treturn nil, errors.New(`You need to implement Greeter.Upload!!!`)\n\
             }\n"
        );

        let server = render_impl(MethodShape::ServerStreaming, "Greeter", "Watch", "pb.Req", "pb.Event");
        assert_eq!(
            server,
            "func Impl(ctx context.Context, req *pb.Req, output chan<- *pb.Event) error {\n\
             \treturn errors.New(`You need to implement Greeter.Watch!!!`)\n\
             }\n"
        );
    }

    #[test]
    fn test_unimplemented_single_request_methods() {
        let unary = render_unimplemented_method(MethodShape::Unary, "Greeter", "SayHello", "pb.A", "pb.B");
        assert_eq!(
            unary,
            "func (s *server) SayHello(ctx context.Context, req *pb.A) (*pb.B, error) {\n\
             \treturn nil, status.Error(codes.Unimplemented, \"Greeter.SayHello is served by a different entrypoint\")\n\
             }\n"
        );

        let server = render_unimplemented_method(MethodShape::ServerStreaming, "Greeter", "Watch", "pb.A", "pb.B");
        assert_eq!(
            server,
            "func (s *server) Watch(req *pb.A, stream pb.Greeter_WatchServer) error {\n\
             \treturn status.Error(codes.Unimplemented, \"Greeter.Watch is served by a different entrypoint\")\n\
             }\n"
        );
    }

    #[test]
    fn test_unimplemented_method() {
        let stub = render_unimplemented_method(MethodShape::BidiStreaming, "Greeter", "Chat", "pb.A", "pb.B");
        assert_eq!(
            stub,
            "func (s *server) Chat(stream pb.Greeter_ChatServer) error {\n\
             \treturn status.Error(codes.Unimplemented, \"Greeter.Chat is served by a different entrypoint\")\n\
             }\n"
        );
    }
}
