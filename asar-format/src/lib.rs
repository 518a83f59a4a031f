//! Reading and writing of asar archives: a 16-byte prefix, a JSON header
//! describing a directory tree, and the concatenated contents of every file.
//!
//! ```text
//! [u32 magic = 4][u32 header_size + 4][u32 header_size][u32 document_size]
//! [JSON document][zero padding to a multiple of 4]
//! [content]
//! ```

mod de;
mod error;
mod file;
#[cfg(feature = "writer")]
mod fs;
mod header;
pub mod path;
mod record;
mod ser;

use std::path::Path;

pub use error::{Error, FormatError, Result};
#[cfg(feature = "reader")]
pub use file::reader::{AsarReader, ExtractStats};
#[cfg(feature = "writer")]
pub use file::writer::AsarWriter;
pub use file::AsarMetadata;
pub use header::{AsarHeader, MAGIC, PREFIX_LEN};
pub use path::AsarPath;
pub use record::{Directory, FileRecord, Node};

/// Packs every regular file below `source` into an in-memory archive.
///
/// Entries are stored under the final component of `source`, so packing
/// `work/app` yields entries such as `app/index.js`.
#[cfg(feature = "writer")]
pub fn pack<P: AsRef<Path>>(source: P) -> Result<Vec<u8>> {
    let mut writer = AsarWriter::new();
    writer.add_dir(source)?;
    writer.finish()
}

/// Packs `source` and writes the archive to `archive`.
#[cfg(feature = "writer")]
pub fn pack_to_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, archive: Q) -> Result<u64> {
    let mut writer = AsarWriter::new();
    writer.add_dir(source)?;
    writer.finish_to(archive)
}

/// Extracts an in-memory archive into `dest`.
///
/// With `single_file`, only that entry is written, directly into `dest`.
/// Unpacked entries cannot be resolved without an archive location; use
/// [`unpack_file`] or [`AsarReader::with_unpacked_dir`] for those.
#[cfg(feature = "reader")]
pub fn unpack<B, P>(bytes: B, dest: P, single_file: Option<&str>) -> Result<ExtractStats>
where
    B: Into<Vec<u8>>,
    P: AsRef<Path>,
{
    let single_file = single_file.map(AsarPath::new).transpose()?;
    let reader = AsarReader::from_bytes(bytes.into())?;
    extract(&reader, dest.as_ref(), single_file.as_ref())
}

/// Extracts the archive file at `archive` into `dest`. Unpacked entries are
/// copied from beside `archive`.
#[cfg(feature = "reader")]
pub fn unpack_file<P, Q>(archive: P, dest: Q, single_file: Option<&str>) -> Result<ExtractStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let single_file = single_file.map(AsarPath::new).transpose()?;
    let reader = AsarReader::open(archive)?;
    extract(&reader, dest.as_ref(), single_file.as_ref())
}

#[cfg(feature = "reader")]
fn extract(reader: &AsarReader, dest: &Path, single_file: Option<&AsarPath>) -> Result<ExtractStats> {
    match single_file {
        Some(path) => reader.extract_file(path, dest),
        None => reader.extract_all(dest),
    }
}
