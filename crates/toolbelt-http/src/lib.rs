//! Toolbelt HTTP helpers
//!
//! Axum-facing helper utilities for HTTP services: multipart file uploads
//! with content sniffing, JSON request/response helpers with classified
//! decode errors, static file download, and a small set of middleware
//! (client IP extraction, panic recovery, request logging).
//!
//! Every fallible operation returns a [`toolbelt_core::ToolError`]; handlers
//! that want the uniform JSON error envelope can return
//! [`error::HttpToolError`] and use `?` throughout.

pub mod download;
pub mod error;
pub mod json;
pub mod middleware;
pub mod upload;

// Re-export commonly used items
pub use download::download_static_file;
pub use error::{client_error, not_found, server_error, HttpToolError, JsonResponse};
pub use json::{error_json, read_json, write_json};
pub use middleware::{client_ip, log_request, recover_panic_layer, ClientIp};
pub use toolbelt_core::{ToolError, ToolbeltConfig};
pub use upload::{upload_files, upload_one_file, UploadError, UploadedFile};
