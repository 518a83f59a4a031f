use std::fs::File;
use std::io::{prelude::*, BufReader};
use std::path::Path;

use crate::{
    error::{Error, FormatError, Result},
    path::AsarPath,
    record::FileRecord,
    ser::write_frame,
};

use super::AsarMetadata;

/// Accumulates file contents and their records, then frames them into an archive.
///
/// Everything is held in memory until [`AsarWriter::finish`].
#[derive(Debug, Default)]
pub struct AsarWriter {
    pub(crate) content: Vec<u8>,
    pub(crate) meta: AsarMetadata,
}

impl AsarWriter {
    pub fn new() -> AsarWriter {
        AsarWriter::default()
    }

    /// Will return the metadata of every entry inserted so far.
    #[inline(always)]
    pub fn metadata(&self) -> &AsarMetadata {
        &self.meta
    }

    #[inline(always)]
    pub fn content_len(&self) -> u64 {
        self.content.len() as u64
    }

    /// Appends everything `value` yields to the content region under `path`.
    pub fn insert<R: Read>(&mut self, path: AsarPath, value: &mut R) -> std::io::Result<FileRecord> {
        if self.meta.get(&path).is_some() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("archive already contains `{}`", path),
            ));
        }

        let offset = self.content.len();
        if let Err(e) = value.read_to_end(&mut self.content) {
            self.content.truncate(offset);
            return Err(e);
        }

        let record = FileRecord::new(offset as u64, (self.content.len() - offset) as u64);
        tracing::debug!(%path, offset = record.offset, size = record.size, "inserted file");
        self.meta.insert(path, record);
        Ok(record)
    }

    /// Records a file whose bytes will live beside the archive instead of inside it.
    pub fn insert_unpacked(&mut self, path: AsarPath, size: u64) -> std::io::Result<FileRecord> {
        if self.meta.get(&path).is_some() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("archive already contains `{}`", path),
            ));
        }

        let record = FileRecord::unpacked(size);
        tracing::debug!(%path, size, "inserted unpacked file");
        self.meta.insert(path, record);
        Ok(record)
    }

    /// Inserts every regular file below `source`, keyed by its path relative to
    /// the parent of `source`. Symbolic links are skipped.
    ///
    /// `source` is canonicalized first, so `.` or `app/sub/..` still contribute
    /// their real directory name as the first segment.
    pub fn add_dir<P: AsRef<Path>>(&mut self, source: P) -> Result<usize> {
        let source = source.as_ref();
        let root = source.canonicalize().map_err(Error::io(source))?;
        let source = root.as_path();

        let meta = std::fs::metadata(source).map_err(Error::io(source))?;
        if !meta.is_dir() {
            return Err(Error::Io {
                path: source.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "source is not a directory",
                ),
            });
        }

        let files = crate::fs::collect_files(source).map_err(Error::io(source))?;
        let count = files.len();

        for file_path in files.into_iter() {
            let path = AsarPath::from_fs_path(source, &file_path)?;
            let file = File::open(&file_path).map_err(Error::io(&file_path))?;
            self.insert(path, &mut BufReader::new(file))
                .map_err(Error::io(&file_path))?;
        }

        tracing::info!(
            source = %source.display(),
            files = count,
            bytes = self.content.len(),
            "collected directory"
        );

        Ok(count)
    }

    /// Serializes the header and returns the complete archive.
    pub fn finish(self) -> Result<Vec<u8>> {
        let tree = self.meta.to_tree()?;
        let document = serde_json::to_vec(&tree).map_err(FormatError::Json)?;

        let mut out = Vec::with_capacity(document.len() + 20 + self.content.len());
        let header = write_frame(&mut out, &document)
            .map_err(|_| FormatError::TooLarge { len: document.len() })?;
        out.extend_from_slice(&self.content);

        tracing::info!(
            entries = self.meta.len(),
            document_size = header.document_size,
            content_start = header.content_start(),
            bytes = out.len(),
            "finished archive"
        );

        Ok(out)
    }

    /// Serializes the archive and writes it to `path`, returning the bytes written.
    pub fn finish_to<P: AsRef<Path>>(self, path: P) -> Result<u64> {
        let path = path.as_ref();
        let bytes = self.finish()?;
        std::fs::write(path, &bytes).map_err(Error::io(path))?;
        Ok(bytes.len() as u64)
    }
}
