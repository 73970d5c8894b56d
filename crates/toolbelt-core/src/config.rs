//! Configuration module
//!
//! One immutable configuration value carries every knob the helpers read.
//! Defaults are computed by the `effective_*` accessors instead of being
//! written back into the struct, so a single instance can be shared
//! read-only across concurrently handled requests.

use std::env;

/// Default cap for a multipart upload body: 1 GiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 1024 * 1024 * 1024;

/// Default cap for a JSON request body: 1 MiB.
pub const DEFAULT_MAX_JSON_SIZE: usize = 1024 * 1024;

#[derive(Clone, Debug, Default)]
pub struct ToolbeltConfig {
    /// Max size of a multipart upload body in bytes. `None` means the default.
    pub max_file_size: Option<usize>,
    /// MIME types permitted for uploads. Empty means allow all.
    pub allowed_file_types: Vec<String>,
    /// Max size of a JSON request body in bytes. `None` means the default.
    pub max_json_size: Option<usize>,
    /// Whether `read_json` tolerates keys that have no matching field.
    pub allow_unknown_fields: bool,
}

impl ToolbeltConfig {
    pub fn effective_max_file_size(&self) -> usize {
        self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }

    pub fn effective_max_json_size(&self) -> usize {
        self.max_json_size.unwrap_or(DEFAULT_MAX_JSON_SIZE)
    }

    /// Build a configuration from `TOOLBELT_*` environment variables.
    /// Unset or unparseable variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            max_file_size: env::var("TOOLBELT_MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok()),
            allowed_file_types: env::var("TOOLBELT_ALLOWED_FILE_TYPES")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            max_json_size: env::var("TOOLBELT_MAX_JSON_SIZE")
                .ok()
                .and_then(|v| v.parse().ok()),
            allow_unknown_fields: env::var("TOOLBELT_ALLOW_UNKNOWN_FIELDS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
