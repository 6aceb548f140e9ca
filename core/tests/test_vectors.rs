//! Verify the codec and the build/parse methods against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use std::fmt::Debug;

use medium_core::{
    decode_value, encode_value, ApiError, Contributor, DecodeError, DecodeOptions, HttpMethod,
    HttpRequest, HttpResponse, Image, MediumClient, NewPost, Post, Publication, Resource, User,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> MediumClient {
    MediumClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn options(case: &Value) -> DecodeOptions {
    match case.get("policy").and_then(Value::as_str) {
        None | Some("reject") => DecodeOptions::default(),
        Some("preserve") => DecodeOptions::preserving(),
        Some(other) => panic!("unknown policy: {other}"),
    }
}

fn decode_error_matches(err: &DecodeError, expected: &Value) -> bool {
    let field = expected.get("field").and_then(Value::as_str);
    match (expected["type"].as_str().unwrap(), err) {
        ("MissingField", DecodeError::MissingField { field: f }) => field == Some(*f),
        ("InvalidType", DecodeError::InvalidType { field: f, .. }) => field == Some(*f),
        ("UnknownVariant", DecodeError::UnknownVariant { field: f, .. }) => field == Some(*f),
        ("UnexpectedShape", DecodeError::UnexpectedShape { .. }) => true,
        ("InvalidJson", DecodeError::InvalidJson(_)) => true,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

fn check_codec_case<R: Resource + PartialEq + Debug>(case: &Value) {
    let name = case["name"].as_str().unwrap();
    let options = options(case);
    let result = decode_value::<R>(&case["input"], &options);

    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        assert!(
            decode_error_matches(&err, expected_error),
            "{name}: expected {expected_error}, got {err:?}"
        );
        return;
    }

    let resource = result.unwrap();
    let encoded = encode_value(&resource);
    assert_eq!(encoded, case["expected_encoded"], "{name}: encoded");

    let back: R = decode_value(&encoded, &options).unwrap();
    assert_eq!(back, resource, "{name}: roundtrip");
}

#[test]
fn codec_test_vectors() {
    let raw = include_str!("../../test-vectors/codec.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        match case["kind"].as_str().unwrap() {
            "image" => check_codec_case::<Image>(case),
            "contributor" => check_codec_case::<Contributor>(case),
            "publication" => check_codec_case::<Publication>(case),
            "user" => check_codec_case::<User>(case),
            "post" => check_codec_case::<Post>(case),
            other => panic!("unknown kind: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn build(c: &MediumClient, case: &Value) -> HttpRequest {
    let id = case.get("input_id").and_then(Value::as_str).unwrap_or_default();
    let new_post = || decode_value::<NewPost>(&case["input"], &DecodeOptions::default()).unwrap();
    match case["operation"].as_str().unwrap() {
        "get_current_user" => c.build_get_current_user(),
        "list_publications" => c.build_list_publications(id),
        "list_contributors" => c.build_list_contributors(id),
        "create_post" => c.build_create_post(id, &new_post()).unwrap(),
        "create_publication_post" => c.build_create_publication_post(id, &new_post()).unwrap(),
        "upload_image" => {
            let content_type = case["content_type"].as_str().unwrap();
            c.build_upload_image(content_type, b"fake image bytes").unwrap()
        }
        other => panic!("unknown operation: {other}"),
    }
}

/// Run the matching parse method and re-encode the result as JSON.
fn parse(c: &MediumClient, operation: &str, response: HttpResponse) -> Result<Value, ApiError> {
    fn list<R: Resource>(items: Vec<R>) -> Value {
        Value::Array(items.iter().map(encode_value::<R>).collect())
    }

    match operation {
        "get_current_user" => c.parse_get_current_user(response).map(|r| encode_value(&r)),
        "list_publications" => c.parse_list_publications(response).map(list),
        "list_contributors" => c.parse_list_contributors(response).map(list),
        "create_post" => c.parse_create_post(response).map(|r| encode_value(&r)),
        "create_publication_post" => c
            .parse_create_publication_post(response)
            .map(|r| encode_value(&r)),
        "upload_image" => c.parse_upload_image(response).map(|r| encode_value(&r)),
        other => panic!("unknown operation: {other}"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = case["operation"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = build(&c, case);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert_eq!(req.header("accept"), Some("application/json"), "{name}: accept");

        match (req.method, expected_req.get("body")) {
            (HttpMethod::Get, _) => assert!(req.body.is_none(), "{name}: body should be None"),
            (HttpMethod::Post, Some(expected_body)) => {
                assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content-type");
                let body: Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&body, expected_body, "{name}: body");
            }
            (HttpMethod::Post, None) => {
                let content_type = req.header("content-type").unwrap();
                assert!(content_type.starts_with("multipart/form-data; boundary="), "{name}: content-type");
                assert!(req.body.is_some(), "{name}: body should be set");
            }
        }

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: u16::try_from(sim["status"].as_u64().unwrap()).unwrap(),
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = parse(&c, operation, response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
                "Unauthorized" => assert!(matches!(err, ApiError::Unauthorized), "{name}: expected Unauthorized"),
                "Http" => assert!(matches!(err, ApiError::Http { .. }), "{name}: expected Http"),
                "Decode" => assert!(matches!(err, ApiError::Decode(_)), "{name}: expected Decode"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
        }
    }
}
