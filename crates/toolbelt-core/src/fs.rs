//! Filesystem helpers.

use std::fs::DirBuilder;
use std::path::Path;

use crate::error::ToolError;

/// Create a directory (and any missing parents), owner rwx and group/other
/// rx. A no-op without error when the directory already exists.
pub fn create_dir_if_not_exist(path: impl AsRef<Path>) -> Result<(), ToolError> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder.create(path.as_ref())?;
    Ok(())
}
