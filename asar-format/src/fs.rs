//! Filesystem helpers for collecting the files to archive.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

/// Collects every regular file below `root`, depth first, siblings sorted by name.
///
/// Hidden files are included. Symbolic links are neither followed nor returned.
pub(crate) fn collect_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = vec![];

    for entry in WalkDir::new(root)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false)
    {
        let entry = entry.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        if entry.file_type().is_file() {
            files.push(entry.path());
        } else if entry.file_type().is_symlink() {
            tracing::debug!(path = %entry.path().display(), "skipping symlink");
        }
    }

    Ok(files)
}
