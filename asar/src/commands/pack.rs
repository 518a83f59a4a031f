use std::path::Path;

use asar_format::AsarWriter;

use crate::cli::PackArgs;
use crate::error::{Error, Result};
use crate::util::format_size;

/// True when `archive` would be written somewhere below `source`.
fn is_inside(source: &Path, archive: &Path) -> bool {
    let parent = match archive.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    match (source.canonicalize(), parent.canonicalize()) {
        (Ok(source), Ok(parent)) => parent.starts_with(source),
        _ => false,
    }
}

pub fn run(args: PackArgs) -> Result<()> {
    let PackArgs {
        source,
        archive,
        force,
        quiet,
    } = args;

    if !force && archive.exists() {
        return Err(Error::ArchiveExists { path: archive });
    }

    if is_inside(&source, &archive) {
        return Err(Error::ArchiveInsideSource { path: archive });
    }

    let mut writer = AsarWriter::new();
    let count = writer.add_dir(&source).map_err(|source_err| Error::Pack {
        path: source.clone(),
        source: source_err,
    })?;
    let content_len = writer.content_len();

    let written = writer.finish_to(&archive).map_err(|e| Error::WriteArchive {
        path: archive.clone(),
        source: e,
    })?;

    if !quiet {
        println!(
            "Packed {} files ({}) into {} ({} total)",
            count,
            format_size(content_len),
            archive.display(),
            format_size(written)
        );
    }

    Ok(())
}
