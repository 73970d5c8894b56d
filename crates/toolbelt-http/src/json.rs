//! JSON request decoding and response writing.
//!
//! `read_json` classifies decode failures precisely (syntax position, the
//! field behind a type mismatch, the first unknown key) instead of passing
//! serde's message through; `write_json`/`error_json` build the outgoing
//! response with the uniform envelope.

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::error::Category;
use toolbelt_core::{ToolError, ToolbeltConfig};

use crate::error::JsonResponse;

/// Decode a JSON request body into `T`.
///
/// The body is capped at `config.effective_max_json_size()` bytes while it is
/// being collected, must hold exactly one JSON value, and — unless
/// `config.allow_unknown_fields` is set — must not contain keys without a
/// matching field in `T`.
pub async fn read_json<T>(config: &ToolbeltConfig, body: Body) -> Result<T, ToolError>
where
    T: DeserializeOwned,
{
    let limit = config.effective_max_json_size();
    let bytes = to_bytes(body, limit)
        .await
        .map_err(|err| classify_body_error(err, limit))?;

    if bytes.is_empty() {
        return Err(ToolError::EmptyBody);
    }

    let mut de = serde_json::Deserializer::from_slice(&bytes);
    let mut track = serde_path_to_error::Track::new();
    let mut unknown_key: Option<String> = None;

    let decoded: Result<T, serde_json::Error> = if config.allow_unknown_fields {
        T::deserialize(serde_path_to_error::Deserializer::new(&mut de, &mut track))
    } else {
        serde_ignored::deserialize(
            serde_path_to_error::Deserializer::new(&mut de, &mut track),
            |path| {
                unknown_key.get_or_insert_with(|| path.to_string());
            },
        )
    };

    let value = match decoded {
        Ok(value) => value,
        Err(err) => return Err(classify_decode_error(err, track.path().to_string())),
    };

    if let Some(key) = unknown_key {
        return Err(ToolError::UnknownField(key));
    }

    // Exactly one JSON value: anything but whitespace after the first value
    // (including a second object) is rejected.
    de.end().map_err(|_| ToolError::MultipleJsonValues)?;

    Ok(value)
}

fn classify_body_error(err: axum::Error, limit: usize) -> ToolError {
    if err.to_string().contains("length limit exceeded") {
        ToolError::PayloadTooLarge(limit)
    } else {
        ToolError::Decode(err.to_string())
    }
}

fn classify_decode_error(err: serde_json::Error, path: String) -> ToolError {
    match err.classify() {
        // Column 0 means nothing was consumed: the body held no value at all.
        Category::Eof if err.column() == 0 => ToolError::EmptyBody,
        Category::Eof => ToolError::MalformedJson,
        Category::Syntax => ToolError::MalformedJsonAt {
            line: err.line(),
            column: err.column(),
        },
        Category::Data => {
            let message = err.to_string();
            if let Some(rest) = message.strip_prefix("unknown field `") {
                if let Some(field) = rest.split('`').next() {
                    return ToolError::UnknownField(field.to_string());
                }
            }
            if message.starts_with("missing field") {
                return ToolError::Decode(message);
            }
            if path.is_empty() || path == "." {
                ToolError::TypeMismatchAt {
                    line: err.line(),
                    column: err.column(),
                }
            } else {
                ToolError::TypeMismatch(path)
            }
        }
        Category::Io => ToolError::Decode(err.to_string()),
    }
}

/// Serialize `payload` and build a response around it.
///
/// Caller-supplied headers are applied first, each replacing any existing
/// header of the same name; `Content-Type: application/json` is always set
/// last. A serialization failure returns the error and builds nothing.
pub fn write_json<T>(
    status: StatusCode,
    payload: &T,
    headers: Option<HeaderMap>,
) -> Result<Response, ToolError>
where
    T: Serialize,
{
    let body = serde_json::to_vec(payload).map_err(|err| ToolError::Decode(err.to_string()))?;

    let mut response = Response::builder()
        .status(status)
        .body(Body::from(body))
        .map_err(|err| ToolError::Internal(err.to_string()))?;

    if let Some(extra) = headers {
        for (name, value) in extra.iter() {
            response.headers_mut().insert(name.clone(), value.clone());
        }
    }
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Ok(response)
}

/// Wrap an error's message into the JSON envelope. The status defaults to
/// 400 Bad Request.
pub fn error_json(
    err: &dyn std::fmt::Display,
    status: Option<StatusCode>,
) -> Result<Response, ToolError> {
    let status = status.unwrap_or(StatusCode::BAD_REQUEST);
    let payload = JsonResponse::failure(err.to_string());
    write_json(status, &payload, None)
}
