//! Wire compatibility of the descriptor mirrors with stock protoc messages.

use descriptor::*;
use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileOptions as StockFileOptions, MethodDescriptorProto,
    ServiceDescriptorProto,
};

/// Helper to build a stock descriptor for a method
fn create_test_method(name: &str, client: bool, server: bool) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(".greeter.HelloRequest".to_string()),
        output_type: Some(".greeter.HelloReply".to_string()),
        client_streaming: Some(client),
        server_streaming: Some(server),
        ..Default::default()
    }
}

/// Helper to build a stock request with extra fields our mirror does not model
fn create_test_request() -> CodeGeneratorRequest {
    let file = FileDescriptorProto {
        name: Some("greeter/greeter.proto".to_string()),
        package: Some("greeter".to_string()),
        dependency: vec!["google/protobuf/empty.proto".to_string()],
        message_type: vec![DescriptorProto {
            name: Some("HelloRequest".to_string()),
            field: vec![FieldDescriptorProto {
                name: Some("name".to_string()),
                number: Some(1),
                ..Default::default()
            }],
            nested_type: vec![DescriptorProto {
                name: Some("Meta".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }],
        service: vec![ServiceDescriptorProto {
            name: Some("Greeter".to_string()),
            method: vec![
                create_test_method("SayHello", false, false),
                create_test_method("Chat", true, true),
            ],
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    };
    let other = FileDescriptorProto {
        name: Some("google/protobuf/empty.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        ..Default::default()
    };

    CodeGeneratorRequest {
        file_to_generate: vec!["greeter/greeter.proto".to_string()],
        parameter: Some("eyJuYW1lIjoiZ2F0ZXdheSJ9".to_string()),
        proto_file: vec![other, file],
        ..Default::default()
    }
}

#[test]
fn test_decode_stock_request() {
    let bytes = create_test_request().encode_to_vec();
    let request = GenerationRequest::decode(bytes.as_slice()).expect("mirror should decode");

    assert_eq!(request.parameter.as_deref(), Some("eyJuYW1lIjoiZ2F0ZXdheSJ9"));
    assert_eq!(request.proto_file.len(), 2);

    let file = &request.proto_file[1];
    assert_eq!(file.name(), "greeter/greeter.proto");
    assert_eq!(file.package(), "greeter");
    assert_eq!(file.message_type[0].name(), "HelloRequest");
    assert_eq!(file.message_type[0].nested_type[0].name(), "Meta");

    let methods = &file.service[0].method;
    assert_eq!(methods[0].name(), "SayHello");
    assert!(!methods[0].client_streaming());
    assert!(methods[1].client_streaming() && methods[1].server_streaming());
    assert_eq!(methods[1].input_type(), ".greeter.HelloRequest");
    assert!(methods[0].deploy_options().is_none());
}

#[test]
fn test_files_to_generate_preserves_proto_file_order() {
    let bytes = create_test_request().encode_to_vec();
    let request = GenerationRequest::decode(bytes.as_slice()).expect("mirror should decode");

    let names: Vec<&str> = request.files_to_generate().map(|f| f.name()).collect();
    assert_eq!(names, vec!["greeter/greeter.proto"]);
}

#[test]
fn test_deploy_options_extension_round_trip() {
    let mut resources = ResourceRequirements::default();
    resources.limits.insert("memory".to_string(), "128Mi".to_string());
    resources.limits.insert("cpu".to_string(), "500m".to_string());

    let method = MethodDescriptor::new("SayHello", ".greeter.HelloRequest", ".greeter.HelloReply")
        .with_deploy_options(DeployOptions {
            service_account: "greeter-sa".to_string(),
            container_concurrency: 4,
            timeout_seconds: 30,
            env: vec![EnvVar { name: "MODE".to_string(), value: "prod".to_string() }],
            resources: Some(resources),
        });
    let request = GenerationRequest {
        file_to_generate: vec!["greeter.proto".to_string()],
        parameter: None,
        proto_file: vec![FileDescriptor::new("greeter.proto", "greeter")
            .with_service(ServiceDescriptor::new("Greeter", vec![method]))],
    };

    let decoded = GenerationRequest::decode(request.encode_to_vec().as_slice())
        .expect("request should decode");
    let deploy = decoded.proto_file[0].service[0].method[0]
        .deploy_options()
        .expect("deploy options should survive the wire");
    assert_eq!(deploy.service_account, "greeter-sa");
    assert_eq!(deploy.timeout_seconds, 30);
    let limits: Vec<&str> = deploy
        .resources
        .as_ref()
        .expect("resources should be present")
        .limits
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(limits, vec!["cpu", "memory"]);

    // Stock descriptors ignore the extension but still parse the request.
    let stock = CodeGeneratorRequest::decode(request.encode_to_vec().as_slice())
        .expect("stock request should decode");
    assert_eq!(stock.proto_file[0].service[0].method[0].name(), "SayHello");
}

#[test]
fn test_response_is_files_or_error() {
    let files = GenerationResponse::Files(vec![
        GeneratedFile::new("a.go", "package a\n"),
        GeneratedFile::new("b.go", "package b\n"),
    ]);
    let wire = CodeGeneratorResponse::decode(files.into_wire().encode_to_vec().as_slice())
        .expect("response should decode");
    assert!(wire.error.is_none());
    let names: Vec<&str> = wire.file.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["a.go", "b.go"]);
    assert_eq!(wire.file[1].content(), "package b\n");

    let error = GenerationResponse::Error("Unable to find Greeter.Nope".to_string());
    assert!(error.is_error());
    let wire = CodeGeneratorResponse::decode(error.into_wire().encode_to_vec().as_slice())
        .expect("response should decode");
    assert_eq!(wire.error(), "Unable to find Greeter.Nope");
    assert!(wire.file.is_empty());
}

#[test]
fn test_go_package_survives_stock_encoding() {
    let stock = FileDescriptorProto {
        name: Some("google/protobuf/empty.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        options: Some(StockFileOptions {
            go_package: Some("google.golang.org/protobuf/types/known/emptypb".to_string()),
            java_package: Some("com.google.protobuf".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let mirror = FileDescriptor::decode(stock.encode_to_vec().as_slice()).expect("file should decode");
    assert_eq!(mirror.go_import_path(), Some("google.golang.org/protobuf/types/known/emptypb"));
}
