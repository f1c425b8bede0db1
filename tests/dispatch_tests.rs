use hasten_core::{
    decode, decompress, CoreConfig, DispatchError, Dispatcher, Encoding, RouteSpec, Value,
};
use http::Method;

fn pet_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::new(Method::GET, "/pets", "list_pets"),
        RouteSpec::new(Method::POST, "/pets", "create_pet"),
        RouteSpec::new(Method::GET, "/pets/{id}", "get_pet"),
        RouteSpec::new(Method::GET, "/files/{rest:path}", "serve_file"),
    ]
}

fn dispatcher(accelerated: bool) -> Dispatcher {
    let config = CoreConfig {
        accelerated,
        ..CoreConfig::default()
    };
    Dispatcher::new(pet_routes(), config).unwrap()
}

#[test]
fn matched_request_exposes_handler_and_params() {
    let d = dispatcher(true);
    let result = d.dispatch(&Method::GET, "/pets/42", None, None).unwrap();
    assert_eq!(result.handler.as_ref(), "get_pet");
    assert_eq!(result.get_param("id"), Some("42"));
    assert!(result.body.is_none());
}

#[test]
fn rest_param_captures_raw_remainder() {
    let d = dispatcher(true);
    let result = d
        .dispatch(&Method::GET, "/files/docs/a/b.txt", None, None)
        .unwrap();
    assert_eq!(result.get_param("rest"), Some("docs/a/b.txt"));
}

#[test]
fn unknown_path_is_not_found() {
    let d = dispatcher(true);
    assert!(matches!(
        d.dispatch(&Method::GET, "/nothing", None, None),
        Err(DispatchError::NotFound)
    ));
}

#[test]
fn wrong_method_reports_allowed_set() {
    let d = dispatcher(true);
    match d.dispatch(&Method::DELETE, "/pets", None, None) {
        Err(DispatchError::MethodNotAllowed { allowed }) => {
            assert_eq!(allowed, vec![Method::GET, Method::POST]);
        }
        other => panic!("expected 405, got {other:?}"),
    }
}

#[test]
fn body_is_decoded_when_present() {
    let d = dispatcher(true);
    let result = d
        .dispatch(
            &Method::POST,
            "/pets",
            Some(br#"{"name":"rex","age":3}"#),
            None,
        )
        .unwrap();
    let body = result.body.unwrap();
    let obj = body.as_object().unwrap();
    assert_eq!(obj.get("name"), Some(&Value::from("rex")));
    assert_eq!(obj.get("age"), Some(&Value::from(3i64)));
}

#[test]
fn malformed_body_surfaces_codec_error() {
    let d = dispatcher(true);
    match d.dispatch(&Method::POST, "/pets", Some(b"{bad"), None) {
        Err(DispatchError::Codec(err)) => assert_eq!(err.offset, 1),
        other => panic!("expected codec error, got {other:?}"),
    }
}

#[test]
fn small_responses_skip_compression() {
    let d = dispatcher(true);
    let result = d
        .dispatch(&Method::GET, "/pets", None, Some("gzip"))
        .unwrap();
    assert_eq!(result.encoder.negotiated(), Encoding::Gzip);

    let response = result.encoder.encode_response(&Value::from("tiny")).unwrap();
    // 6 bytes of output, well under the 256-byte default threshold.
    assert_eq!(response.encoding, Encoding::Identity);
    assert_eq!(response.bytes, br#""tiny""#);
}

#[test]
fn large_responses_are_compressed() {
    let d = dispatcher(true);
    let result = d
        .dispatch(&Method::GET, "/pets", None, Some("gzip, br;q=0.4"))
        .unwrap();

    let big = Value::from("x".repeat(4096));
    let response = result.encoder.encode_response(&big).unwrap();
    assert_eq!(response.encoding, Encoding::Gzip);
    assert!(response.bytes.len() < 4096);

    let inflated = decompress(&response.bytes, Encoding::Gzip).unwrap();
    assert_eq!(decode(&inflated).unwrap(), big);
}

#[test]
fn missing_accept_encoding_means_identity() {
    let d = dispatcher(true);
    let result = d.dispatch(&Method::GET, "/pets", None, None).unwrap();
    assert_eq!(result.encoder.negotiated(), Encoding::Identity);

    let big = Value::from("x".repeat(4096));
    let response = result.encoder.encode_response(&big).unwrap();
    assert_eq!(response.encoding, Encoding::Identity);
}

#[test]
fn encode_raw_applies_the_same_policy() {
    let d = dispatcher(true);
    let result = d
        .dispatch(&Method::GET, "/files/index.html", None, Some("zstd"))
        .unwrap();

    let page = vec![b'a'; 2048];
    let response = result.encoder.encode_raw(page.clone());
    assert_eq!(response.encoding, Encoding::Zstd);
    assert_eq!(
        decompress(&response.bytes, Encoding::Zstd).unwrap(),
        page
    );

    let small = result.encoder.encode_raw(b"hi".to_vec());
    assert_eq!(small.encoding, Encoding::Identity);
    assert_eq!(small.bytes, b"hi");
}

#[test]
fn engines_produce_identical_responses() {
    let accelerated = dispatcher(true);
    let fallback = dispatcher(false);
    assert!(accelerated.accelerated());
    assert!(!fallback.accelerated());

    let body = br#"{"filter":{"species":"dog"},"limit":5}"#;
    for (method, path) in [
        (Method::GET, "/pets/7"),
        (Method::GET, "/files/a/b"),
        (Method::PATCH, "/pets"),
        (Method::GET, "/absent"),
    ] {
        let a = accelerated.dispatch(&method, path, Some(body), Some("br"));
        let b = fallback.dispatch(&method, path, Some(body), Some("br"));
        match (a, b) {
            (Ok(ra), Ok(rb)) => {
                assert_eq!(ra.handler, rb.handler);
                assert_eq!(ra.params, rb.params);
                assert_eq!(ra.body, rb.body);
                let payload = Value::from(vec![Value::from("k".repeat(512))]);
                let ea = ra.encoder.encode_response(&payload).unwrap();
                let eb = rb.encoder.encode_response(&payload).unwrap();
                assert_eq!(ea, eb, "response bytes differ for {path}");
            }
            (Err(DispatchError::NotFound), Err(DispatchError::NotFound)) => {}
            (
                Err(DispatchError::MethodNotAllowed { allowed: la }),
                Err(DispatchError::MethodNotAllowed { allowed: lb }),
            ) => assert_eq!(la, lb),
            (a, b) => panic!("engines disagree for {path}: {a:?} vs {b:?}"),
        }
    }
}

#[test]
fn reload_swaps_routes_atomically_for_new_requests() {
    let d = dispatcher(true);
    assert!(d.dispatch(&Method::GET, "/pets", None, None).is_ok());

    d.reload(&[RouteSpec::new(Method::GET, "/v2/pets", "list_pets_v2")])
        .unwrap();

    assert!(matches!(
        d.dispatch(&Method::GET, "/pets", None, None),
        Err(DispatchError::NotFound)
    ));
    let result = d.dispatch(&Method::GET, "/v2/pets", None, None).unwrap();
    assert_eq!(result.handler.as_ref(), "list_pets_v2");
}

#[test]
fn reload_failure_keeps_previous_table() {
    let d = dispatcher(true);
    let bad = vec![
        RouteSpec::new(Method::GET, "/a/{x}", "one"),
        RouteSpec::new(Method::GET, "/a/{x}", "two"),
    ];
    assert!(d.reload(&bad).is_err());
    // The original routes still serve.
    assert!(d.dispatch(&Method::GET, "/pets", None, None).is_ok());
}

#[test]
fn clones_observe_the_same_table() {
    let d = dispatcher(true);
    let clone = d.clone();
    d.reload(&[RouteSpec::new(Method::GET, "/only", "only")])
        .unwrap();
    assert!(clone.dispatch(&Method::GET, "/only", None, None).is_ok());
}

#[test]
fn depth_limit_from_config_applies_to_bodies() {
    let config = CoreConfig {
        max_nesting_depth: 3,
        ..CoreConfig::default()
    };
    let d = Dispatcher::new(pet_routes(), config).unwrap();
    assert!(d
        .dispatch(&Method::POST, "/pets", Some(b"[[[1]]]"), None)
        .is_ok());
    assert!(matches!(
        d.dispatch(&Method::POST, "/pets", Some(b"[[[[1]]]]"), None),
        Err(DispatchError::Codec(_))
    ));
}
