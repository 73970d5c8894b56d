//! Static file download.

use std::io;
use std::path::Path;

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use toolbelt_core::ToolError;

/// Stream `directory/file_name` as an attachment named `display_name`.
///
/// The stored filename and the client-visible name are independent, so files
/// kept under generated names can still download under a friendly one. A
/// missing file fails with [`ToolError::NotFound`].
pub async fn download_static_file(
    directory: impl AsRef<Path>,
    file_name: &str,
    display_name: &str,
) -> Result<Response, ToolError> {
    let path = directory.as_ref().join(file_name);

    let file = File::open(&path).await.map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            ToolError::NotFound(file_name.to_string())
        } else {
            ToolError::Io(err)
        }
    })?;
    let length = file.metadata().await?.len();

    let stream = ReaderStream::new(file);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_LENGTH, length)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{display_name}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|err| ToolError::Internal(err.to_string()))
}
