use std::path::PathBuf;

use asar_format::{path::AsarPath, AsarReader};

use crate::cli::ExtractArgs;
use crate::error::{Error, Result};
use crate::util::format_size;

pub fn run(args: ExtractArgs) -> Result<()> {
    let ExtractArgs {
        archive,
        output,
        file,
        unpacked_dir,
        quiet,
    } = args;

    let selected = match file {
        Some(file) => Some(
            AsarPath::new(&file).map_err(|source| Error::InvalidPath { path: file, source })?,
        ),
        None => None,
    };

    let reader = AsarReader::open(&archive).map_err(|source| Error::OpenArchive {
        path: archive.clone(),
        source,
    })?;

    let reader = match unpacked_dir {
        Some(dir) => reader.with_unpacked_dir(dir),
        None => reader,
    };

    let output = output.unwrap_or_else(|| PathBuf::from("."));

    let stats = match &selected {
        Some(path) => reader.extract_file(path, &output),
        None => reader.extract_all(&output),
    }
    .map_err(|source| Error::Extract { source })?;

    if !quiet {
        println!(
            "Extracted {} files ({}) to {}",
            stats.files_extracted,
            format_size(stats.bytes_written),
            output.display()
        );
    }

    Ok(())
}
