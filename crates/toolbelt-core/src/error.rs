//! Error types module
//!
//! All helper operations report failures through the `ToolError` enum. The
//! hosting HTTP handler decides how to surface them to clients; the
//! `toolbelt-http` crate provides the standard surfacing path.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("body must not be larger than {0} bytes")]
    PayloadTooLarge(usize),

    #[error("the uploaded file type is not permitted: {0}")]
    UnsupportedFileType(String),

    #[error("no file was provided in the request")]
    NoFileProvided,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("body contains badly-formed JSON")]
    MalformedJson,

    #[error("body contains badly-formed JSON (at line {line} column {column})")]
    MalformedJsonAt { line: usize, column: usize },

    #[error("body contains an incorrect JSON type for field \"{0}\"")]
    TypeMismatch(String),

    #[error("body contains an incorrect JSON type (at line {line} column {column})")]
    TypeMismatchAt { line: usize, column: usize },

    #[error("body must not be empty")]
    EmptyBody,

    #[error("body contains unknown key \"{0}\"")]
    UnknownField(String),

    #[error("body must contain only one JSON value")]
    MultipleJsonValues,

    #[error("error decoding JSON: {0}")]
    Decode(String),

    #[error("input is empty or whitespace only")]
    EmptyInput,

    #[error("slug is empty after removing invalid characters")]
    EmptySlug,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// HTTP status code this error should surface as.
    pub fn status_code(&self) -> u16 {
        match self {
            ToolError::PayloadTooLarge(_) => 413,
            ToolError::UnsupportedFileType(_) => 415,
            ToolError::NotFound(_) => 404,
            ToolError::NoFileProvided
            | ToolError::MalformedJson
            | ToolError::MalformedJsonAt { .. }
            | ToolError::TypeMismatch(_)
            | ToolError::TypeMismatchAt { .. }
            | ToolError::EmptyBody
            | ToolError::UnknownField(_)
            | ToolError::MultipleJsonValues
            | ToolError::Decode(_)
            | ToolError::EmptyInput
            | ToolError::EmptySlug => 400,
            ToolError::Io(_) | ToolError::Internal(_) => 500,
        }
    }
}
