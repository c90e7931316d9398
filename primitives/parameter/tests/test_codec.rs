use parameter::{Mode, ParameterError, Parameters};

/// Helper building a fully populated single-method record
fn create_test_parameters() -> Parameters {
    Parameters {
        name: "entrypoint".to_string(),
        base: "github.com/acme/api".to_string(),
        gen_dir: "./gen".to_string(),
        methods_dir: "./pkg/methods".to_string(),
        domain: "api.acme.dev".to_string(),
        namespace: "prod".to_string(),
        service: "Greeter".to_string(),
        method: "SayHello".to_string(),
        nested_directory: "gen/entrypoint/greeter/sayhello".to_string(),
    }
}

#[test]
fn test_round_trip() {
    let samples = vec![
        create_test_parameters(),
        Parameters::new("gateway"),
        Parameters { name: String::new(), ..Parameters::default() },
        Parameters {
            base: "example.com/\"quoted\" path/with spaces".to_string(),
            nested_directory: "ünïcødé/dir".to_string(),
            ..Parameters::new("methods")
        },
    ];

    for params in samples {
        let encoded = params.encode().expect("encode should succeed");
        let decoded = Parameters::decode(&encoded).expect("decode should succeed");
        assert_eq!(decoded, params);
    }
}

#[test]
fn test_encoding_is_shell_safe() {
    let encoded = create_test_parameters().must_encode();
    assert!(encoded
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));
    assert!(!encoded.contains(' '));
}

#[test]
fn test_missing_fields_decode_as_empty() {
    // {"name":"config","service":"Greeter","method":"SayHello"}
    let decoded =
        Parameters::decode("eyJuYW1lIjoiY29uZmlnIiwic2VydmljZSI6IkdyZWV0ZXIiLCJtZXRob2QiOiJTYXlIZWxsbyJ9")
            .expect("decode should succeed");
    assert_eq!(decoded.name, "config");
    assert_eq!(decoded.base, "");
    assert_eq!(decoded.nested_directory, "");
    assert_eq!(decoded.mode(), Mode::Method { service: "Greeter", method: "SayHello" });
}

#[test]
fn test_decode_errors() {
    match Parameters::decode("not base64!").expect_err("bad base64 should fail") {
        ParameterError::Base64(_) => {}
        other => panic!("Expected Base64 error, got {other:?}"),
    }

    // "not json"
    match Parameters::decode("bm90IGpzb24=").expect_err("bad json should fail") {
        ParameterError::Json(_) => {}
        other => panic!("Expected Json error, got {other:?}"),
    }

    // Truncated payload: {"name":"con
    match Parameters::decode("eyJuYW1lIjoiY29u").expect_err("truncated json should fail") {
        ParameterError::Json(_) => {}
        other => panic!("Expected Json error, got {other:?}"),
    }

    let partial = Parameters { service: "Greeter".to_string(), ..Parameters::new("config") };
    let encoded = partial.encode().expect("encode should succeed");
    match Parameters::decode(&encoded).expect_err("half-set target should fail") {
        ParameterError::PartialTarget { service, method } => {
            assert_eq!(service, "Greeter");
            assert_eq!(method, "");
        }
        other => panic!("Expected PartialTarget error, got {other:?}"),
    }
}

#[test]
fn test_mode_and_nesting() {
    let meta = Parameters { nested_directory: "gen/entrypoint".to_string(), ..Parameters::new("entrypoint") };
    assert_eq!(meta.mode(), Mode::Meta);
    assert_eq!(meta.nesting_escape(), "../..");

    let single = meta.with_target("entrypoint", "Greeter", "SayHello", "gen/entrypoint/greeter/sayhello");
    assert_eq!(single.nesting_escape(), "../../../..");
    assert_eq!(single.name, "entrypoint");
    assert_eq!(single.mode(), Mode::Method { service: "Greeter", method: "SayHello" });
}
