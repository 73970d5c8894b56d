use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::Deserialize;
use toolbelt_core::{ToolError, ToolbeltConfig};
use toolbelt_http::json::{error_json, read_json, write_json};

#[derive(Debug, Deserialize)]
struct Payload {
    foo: Option<String>,
}

fn config() -> ToolbeltConfig {
    ToolbeltConfig::default()
}

#[tokio::test]
async fn valid_json_decodes() {
    let payload: Payload = read_json(&config(), Body::from(r#"{"foo":"bar"}"#))
        .await
        .unwrap();
    assert_eq!(payload.foo.as_deref(), Some("bar"));
}

#[tokio::test]
async fn unknown_key_is_rejected_by_default() {
    let err = read_json::<Payload>(&config(), Body::from(r#"{"hello":"world"}"#))
        .await
        .unwrap_err();
    match err {
        ToolError::UnknownField(key) => assert_eq!(key, "hello"),
        other => panic!("expected UnknownField, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_key_is_tolerated_when_configured() {
    let config = ToolbeltConfig {
        allow_unknown_fields: true,
        ..Default::default()
    };
    let payload: Payload = read_json(&config, Body::from(r#"{"hello":"world"}"#))
        .await
        .unwrap();
    assert_eq!(payload.foo, None);
}

#[tokio::test]
async fn second_json_value_is_rejected() {
    let err = read_json::<Payload>(&config(), Body::from(r#"{"foo":"bar"}{"x":1}"#))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::MultipleJsonValues));
}

#[tokio::test]
async fn trailing_whitespace_is_not_a_second_value() {
    let payload: Payload = read_json(&config(), Body::from("{\"foo\":\"bar\"}  \n"))
        .await
        .unwrap();
    assert_eq!(payload.foo.as_deref(), Some("bar"));
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let err = read_json::<Payload>(&config(), Body::empty())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::EmptyBody));
}

#[tokio::test]
async fn truncated_body_is_malformed_without_position() {
    let err = read_json::<Payload>(&config(), Body::from(r#"{"foo":"bar""#))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::MalformedJson));
}

#[tokio::test]
async fn syntax_error_reports_position() {
    let err = read_json::<Payload>(&config(), Body::from("Hello, World!"))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::MalformedJsonAt { .. }));

    let err = read_json::<Payload>(&config(), Body::from(r#"{foo:"bar"}"#))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::MalformedJsonAt { .. }));
}

#[tokio::test]
async fn type_mismatch_names_the_field() {
    let err = read_json::<Payload>(&config(), Body::from(r#"{"foo": 7}"#))
        .await
        .unwrap_err();
    match err {
        ToolError::TypeMismatch(field) => assert_eq!(field, "foo"),
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn top_level_type_mismatch_reports_position() {
    let err = read_json::<Payload>(&config(), Body::from("[1,2,3]"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ToolError::TypeMismatchAt { .. } | ToolError::TypeMismatch(_)
    ));
}

#[tokio::test]
async fn oversized_body_reports_the_limit() {
    let config = ToolbeltConfig {
        max_json_size: Some(8),
        ..Default::default()
    };
    let err = read_json::<Payload>(&config, Body::from(r#"{"foo":"bar"}"#))
        .await
        .unwrap_err();
    match err {
        ToolError::PayloadTooLarge(limit) => assert_eq!(limit, 8),
        other => panic!("expected PayloadTooLarge, got {other:?}"),
    }
}

#[tokio::test]
async fn write_json_applies_custom_headers() {
    let mut headers = HeaderMap::new();
    headers.insert("X-Test", HeaderValue::from_static("1"));

    let response = write_json(
        StatusCode::CREATED,
        &serde_json::json!({"id": 42}),
        Some(headers),
    )
    .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()["X-Test"], "1");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], br#"{"id":42}"#);
}

#[tokio::test]
async fn write_json_always_sets_json_content_type() {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));

    let response = write_json(StatusCode::OK, &serde_json::json!({}), Some(headers)).unwrap();
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn error_json_defaults_to_bad_request() {
    let response = error_json(&ToolError::EmptyBody, None).unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope["error"], true);
    assert_eq!(envelope["message"], "body must not be empty");
}

#[tokio::test]
async fn error_json_honors_explicit_status() {
    let response = error_json(
        &ToolError::NotFound("x".into()),
        Some(StatusCode::NOT_FOUND),
    )
    .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope["error"], true);
}
