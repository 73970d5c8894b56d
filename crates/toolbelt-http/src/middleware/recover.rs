//! Panic recovery middleware.
//!
//! A panicking handler must not take the connection down silently: the
//! panic is logged with its payload and the client gets the standard 500
//! JSON envelope with `Connection: close`.

use std::any::Any;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::JsonResponse;
use crate::json::write_json;

type PanicPayload = Box<dyn Any + Send + 'static>;

/// Layer that converts handler panics into 500 responses. Attach it to the
/// router like any other tower layer.
pub fn recover_panic_layer() -> CatchPanicLayer<fn(PanicPayload) -> Response> {
    let responder: fn(PanicPayload) -> Response = handle_panic;
    CatchPanicLayer::custom(responder)
}

fn handle_panic(payload: PanicPayload) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "recovered from panic in request handler");

    // The client gets a generic message; the detail stays in the log.
    let envelope = JsonResponse::failure("Internal Server Error");
    let mut response = match write_json(StatusCode::INTERNAL_SERVER_ERROR, &envelope, None) {
        Ok(response) => response,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}
