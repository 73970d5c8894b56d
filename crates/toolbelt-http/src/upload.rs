//! Multipart file upload processing.
//!
//! Every part of the form that carries a filename is treated as a candidate
//! file: its leading bytes are sniffed for the real content type, the
//! allow-list is consulted, and the part is streamed to the target
//! directory under either a random or the original name.
//!
//! The batch is deliberately partial-success-tolerant: on the first failing
//! file, processing stops and the error carries the files already written.
//! Nothing is rolled back.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, Multipart};
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use toolbelt_core::{random_string, ToolError, ToolbeltConfig};

/// Length of generated destination names, before the original extension.
pub const RANDOM_NAME_LEN: usize = 25;

/// How many leading bytes are inspected to classify the content type.
const SNIFF_LEN: usize = 512;

/// Per-file result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name the file was stored under.
    pub new_file_name: String,
    /// Filename as submitted by the client.
    pub original_file_name: String,
    /// Bytes written to disk.
    pub file_size: u64,
}

/// Failure of an upload batch. `completed` holds the files that were
/// persisted before the failing one; they are real and on disk.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct UploadError {
    pub completed: Vec<UploadedFile>,
    #[source]
    pub source: ToolError,
}

/// Store every file part of `multipart` under `upload_dir`.
///
/// `upload_dir` must already exist; a missing directory surfaces as the
/// file-creation I/O error. With `rename` set, each file gets a
/// [`RANDOM_NAME_LEN`]-character random name with the original extension
/// appended; otherwise the client-supplied filename is used verbatim (the
/// caller owns path-traversal sanitization in that case).
///
/// The combined size of all parts is capped at
/// `config.effective_max_file_size()`, enforced while reading.
pub async fn upload_files(
    config: &ToolbeltConfig,
    mut multipart: Multipart,
    upload_dir: impl AsRef<Path>,
    rename: bool,
) -> Result<Vec<UploadedFile>, UploadError> {
    let upload_dir = upload_dir.as_ref();
    let max_total = config.effective_max_file_size();
    let mut uploaded: Vec<UploadedFile> = Vec::new();
    let mut total_bytes: usize = 0;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                let source = ToolError::Decode(format!("failed to read multipart form: {err}"));
                return Err(UploadError {
                    completed: uploaded,
                    source,
                });
            }
        };

        // Parts without a filename are plain form fields, not files.
        let original_file_name = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        match store_file_part(
            config,
            field,
            upload_dir,
            rename,
            &original_file_name,
            max_total,
            &mut total_bytes,
        )
        .await
        {
            Ok(file) => {
                tracing::debug!(
                    new_file_name = %file.new_file_name,
                    original_file_name = %file.original_file_name,
                    file_size = file.file_size,
                    "stored uploaded file"
                );
                uploaded.push(file);
            }
            Err(source) => {
                tracing::warn!(
                    error = %source,
                    original_file_name = %original_file_name,
                    completed = uploaded.len(),
                    "upload batch stopped"
                );
                return Err(UploadError {
                    completed: uploaded,
                    source,
                });
            }
        }
    }

    Ok(uploaded)
}

/// Convenience wrapper around [`upload_files`] for forms expected to carry
/// exactly one file. A form with no file parts fails with
/// [`ToolError::NoFileProvided`].
pub async fn upload_one_file(
    config: &ToolbeltConfig,
    multipart: Multipart,
    upload_dir: impl AsRef<Path>,
    rename: bool,
) -> Result<UploadedFile, UploadError> {
    let files = upload_files(config, multipart, upload_dir, rename).await?;

    files.into_iter().next().ok_or(UploadError {
        completed: Vec::new(),
        source: ToolError::NoFileProvided,
    })
}

async fn store_file_part(
    config: &ToolbeltConfig,
    mut field: Field<'_>,
    upload_dir: &Path,
    rename: bool,
    original_file_name: &str,
    max_total: usize,
    total_bytes: &mut usize,
) -> Result<UploadedFile, ToolError> {
    // Buffer chunks until the sniff window is full (or the part ends), so
    // the classified bytes are still written out afterwards.
    let mut buffered: Vec<Bytes> = Vec::new();
    let mut buffered_len = 0usize;
    while buffered_len < SNIFF_LEN {
        match next_chunk(&mut field).await? {
            Some(chunk) => {
                guard_total(total_bytes, chunk.len(), max_total)?;
                buffered_len += chunk.len();
                buffered.push(chunk);
            }
            None => break,
        }
    }

    let head: Vec<u8> = buffered
        .iter()
        .flat_map(|chunk| chunk.iter().copied())
        .take(SNIFF_LEN)
        .collect();
    let detected = detect_content_type(&head);
    validate_content_type(&detected, &config.allowed_file_types)?;

    let new_file_name = destination_name(original_file_name, rename);
    let destination: PathBuf = upload_dir.join(&new_file_name);

    let mut out = fs::File::create(&destination).await?;
    let mut file_size: u64 = 0;
    for chunk in &buffered {
        out.write_all(chunk).await?;
        file_size += chunk.len() as u64;
    }
    while let Some(chunk) = next_chunk(&mut field).await? {
        guard_total(total_bytes, chunk.len(), max_total)?;
        out.write_all(&chunk).await?;
        file_size += chunk.len() as u64;
    }
    out.flush().await?;

    Ok(UploadedFile {
        new_file_name,
        original_file_name: original_file_name.to_string(),
        file_size,
    })
}

async fn next_chunk(field: &mut Field<'_>) -> Result<Option<Bytes>, ToolError> {
    field
        .chunk()
        .await
        .map_err(|err| ToolError::Decode(format!("failed to read multipart form: {err}")))
}

fn guard_total(total_bytes: &mut usize, chunk_len: usize, max_total: usize) -> Result<(), ToolError> {
    *total_bytes += chunk_len;
    if *total_bytes > max_total {
        return Err(ToolError::PayloadTooLarge(max_total));
    }
    Ok(())
}

/// Classify a sniff window the way `http.DetectContentType` would: magic
/// bytes first, then a UTF-8 text fallback, then the binary catch-all.
fn detect_content_type(head: &[u8]) -> String {
    if let Some(kind) = infer::get(head) {
        return kind.mime_type().to_string();
    }
    if !head.is_empty() && std::str::from_utf8(head).is_ok() {
        return "text/plain".to_string();
    }
    "application/octet-stream".to_string()
}

/// Strip MIME parameters, e.g. "text/plain; charset=utf-8" -> "text/plain".
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or(content_type)
}

/// Compare the detected type against the allow-list, case-insensitively and
/// ignoring parameters. An empty allow-list accepts everything.
fn validate_content_type(detected: &str, allowed_types: &[String]) -> Result<(), ToolError> {
    if allowed_types.is_empty() {
        return Ok(());
    }

    let normalized = normalize_mime_type(detected).to_lowercase();
    if allowed_types
        .iter()
        .any(|allowed| normalize_mime_type(allowed).to_lowercase() == normalized)
    {
        return Ok(());
    }

    Err(ToolError::UnsupportedFileType(format!(
        "{} (allowed: {})",
        detected,
        allowed_types.join(", ")
    )))
}

fn destination_name(original_file_name: &str, rename: bool) -> String {
    if !rename {
        return original_file_name.to_string();
    }

    match Path::new(original_file_name)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("{}.{}", random_string(RANDOM_NAME_LEN), ext),
        None => random_string(RANDOM_NAME_LEN),
    }
}
