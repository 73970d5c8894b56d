//! Slugification of free text into URL-safe identifiers.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ToolError;

static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern compiles"));

/// Turn arbitrary text into a lowercase, hyphen-delimited, ASCII-alphanumeric
/// slug. Runs of any other characters collapse into a single hyphen; leading
/// and trailing hyphens are trimmed.
///
/// Fails with [`ToolError::EmptyInput`] for empty or whitespace-only input,
/// and [`ToolError::EmptySlug`] when nothing alphanumeric survives (which
/// also rejects input made up entirely of non-ASCII letters).
pub fn slugify(input: &str) -> Result<String, ToolError> {
    if input.trim().is_empty() {
        return Err(ToolError::EmptyInput);
    }

    let lowered = input.to_lowercase();
    let slug = NON_SLUG_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string();

    if slug.is_empty() {
        return Err(ToolError::EmptySlug);
    }

    Ok(slug)
}
