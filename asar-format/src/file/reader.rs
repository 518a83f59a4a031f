use std::borrow::Cow;
use std::fs::OpenOptions;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use super::AsarMetadata;
use crate::{
    de::read_frame,
    error::{Error, FormatError, Result},
    header::AsarHeader,
    path::AsarPath,
    record::FileRecord,
};

enum Backing {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Deref for Backing {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Backing::Owned(bytes) => bytes.as_slice(),
            Backing::Mapped(mmap) => &mmap[..],
        }
    }
}

/// Counters returned by the extraction methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub files_extracted: u64,
    pub bytes_written: u64,
}

impl std::ops::AddAssign for ExtractStats {
    fn add_assign(&mut self, other: Self) {
        self.files_extracted += other.files_extracted;
        self.bytes_written += other.bytes_written;
    }
}

/// A parsed archive, ready to extract from.
pub struct AsarReader {
    data: Backing,
    pub(crate) header: AsarHeader,
    pub(crate) meta: AsarMetadata,
    unpacked_dir: Option<PathBuf>,
}

impl std::fmt::Debug for AsarReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsarReader")
            .field("len", &self.data.len())
            .field("header", &self.header)
            .field("entries", &self.meta.len())
            .field("unpacked_dir", &self.unpacked_dir)
            .finish()
    }
}

impl AsarReader {
    /// Parses an archive held in memory.
    ///
    /// Such a reader has no location on disk, so unpacked entries can only be
    /// read once [`AsarReader::with_unpacked_dir`] has been set.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<AsarReader> {
        Self::parse(Backing::Owned(bytes), None)
    }

    /// This will open an existing archive file, and error if the file is not valid.
    ///
    /// Unpacked entries are looked up relative to the directory holding the archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<AsarReader> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(Error::io(path))?;

        let len = file.metadata().map_err(Error::io(path))?.len();
        let data = if len == 0 {
            Backing::Owned(vec![])
        } else {
            // Safety: the map is read-only and lives as long as the reader.
            Backing::Mapped(unsafe { Mmap::map(&file) }.map_err(Error::io(path))?)
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self::parse(data, Some(dir))
    }

    fn parse(data: Backing, unpacked_dir: Option<PathBuf>) -> Result<AsarReader> {
        let (header, root) = read_frame(&data)?;
        let meta = AsarMetadata::from_tree(&root);

        tracing::debug!(
            entries = meta.len(),
            content_start = header.content_start(),
            bytes = data.len(),
            "opened archive"
        );

        Ok(AsarReader {
            data,
            header,
            meta,
            unpacked_dir,
        })
    }

    /// Sets the directory that unpacked entries are copied from.
    pub fn with_unpacked_dir<P: Into<PathBuf>>(mut self, dir: P) -> AsarReader {
        self.unpacked_dir = Some(dir.into());
        self
    }

    #[inline(always)]
    pub fn unpacked_dir(&self) -> Option<&Path> {
        self.unpacked_dir.as_deref()
    }

    #[inline(always)]
    pub fn header(&self) -> &AsarHeader {
        &self.header
    }

    #[inline(always)]
    pub fn content_start(&self) -> usize {
        self.header.content_start()
    }

    /// Length of the content region. Zero if the buffer ends inside the padding.
    #[inline(always)]
    pub fn content_len(&self) -> usize {
        self.data.len().saturating_sub(self.content_start())
    }

    /// Will return the flattened entries of the archive.
    #[inline(always)]
    pub fn metadata(&self) -> &AsarMetadata {
        &self.meta
    }

    /// Raw JSON header document.
    #[inline(always)]
    pub fn header_document(&self) -> &[u8] {
        &self.data[crate::header::PREFIX_LEN..self.header.header_end()]
    }

    #[inline(always)]
    pub fn entries(&self) -> impl Iterator<Item = (&AsarPath, &FileRecord)> {
        self.meta.iter()
    }

    #[inline(always)]
    pub fn record(&self, path: &AsarPath) -> Option<&FileRecord> {
        self.meta.get(path)
    }

    /// Returns the bytes of the entry at `path`.
    pub fn read_file(&self, path: &AsarPath) -> Result<Cow<'_, [u8]>> {
        let record = self.lookup(path)?;
        self.read(path, record)
    }

    /// Returns the bytes described by `record`: a slice of the content region,
    /// or the contents of the unpacked sibling file.
    pub fn read(&self, path: &AsarPath, record: &FileRecord) -> Result<Cow<'_, [u8]>> {
        if record.unpacked {
            let source = self.unpacked_source(path)?;
            let bytes = std::fs::read(&source).map_err(Error::io(&source))?;
            return Ok(Cow::Owned(bytes));
        }

        self.packed_bytes(path, record).map(Cow::Borrowed)
    }

    /// Extracts every entry to `dest/<path>`, creating directories as needed.
    pub fn extract_all<P: AsRef<Path>>(&self, dest: P) -> Result<ExtractStats> {
        let dest = dest.as_ref();
        std::fs::create_dir_all(dest).map_err(Error::io(dest))?;

        let mut stats = ExtractStats::default();

        for (path, record) in self.meta.iter() {
            let out_path = path.resolve_in(dest).ok_or_else(|| Error::PathSafety {
                path: path.clone(),
            })?;

            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(Error::io(parent))?;
            }

            stats += self.extract_inner(path, record, &out_path)?;
        }

        tracing::info!(
            dest = %dest.display(),
            files = stats.files_extracted,
            bytes = stats.bytes_written,
            "extracted archive"
        );

        Ok(stats)
    }

    /// Extracts the single entry at `path` directly into `dest`, named after its
    /// last segment. No subdirectories are created.
    ///
    /// An archive without such an entry extracts nothing and still succeeds.
    pub fn extract_file<P: AsRef<Path>>(&self, path: &AsarPath, dest: P) -> Result<ExtractStats> {
        let dest = dest.as_ref();
        let record = match self.meta.get(path) {
            Some(record) => record,
            None => {
                tracing::warn!(%path, "no such entry in archive, nothing extracted");
                return Ok(ExtractStats::default());
            }
        };

        let out_path = AsarPath::join_name(None, path.filename())
            .resolve_in(dest)
            .ok_or_else(|| Error::PathSafety { path: path.clone() })?;

        std::fs::create_dir_all(dest).map_err(Error::io(dest))?;
        self.extract_inner(path, record, &out_path)
    }

    fn lookup(&self, path: &AsarPath) -> Result<&FileRecord> {
        self.meta
            .get(path)
            .ok_or_else(|| Error::EntryNotFound { path: path.clone() })
    }

    fn extract_inner(
        &self,
        path: &AsarPath,
        record: &FileRecord,
        out_path: &Path,
    ) -> Result<ExtractStats> {
        let bytes_written = if record.unpacked {
            let source = self.unpacked_source(path)?;
            if is_same_file(&source, out_path) {
                tracing::debug!(%path, out = %out_path.display(), "unpacked file already in place");
                0
            } else {
                std::fs::copy(&source, out_path).map_err(Error::io(&source))?
            }
        } else {
            let bytes = self.packed_bytes(path, record)?;
            std::fs::write(out_path, bytes).map_err(Error::io(out_path))?;
            bytes.len() as u64
        };

        tracing::debug!(
            %path,
            out = %out_path.display(),
            unpacked = record.unpacked,
            bytes = bytes_written,
            "extracted file"
        );

        Ok(ExtractStats {
            files_extracted: 1,
            bytes_written,
        })
    }

    fn packed_bytes(&self, path: &AsarPath, record: &FileRecord) -> Result<&[u8]> {
        let content = self.data.get(self.content_start()..).unwrap_or(&[]);

        let out_of_bounds = || FormatError::OutOfBounds {
            path: path.clone(),
            start: record.offset,
            end: record.offset.saturating_add(record.size),
            len: content.len(),
        };

        let end = record.end().ok_or_else(out_of_bounds)?;
        if end > content.len() as u64 {
            return Err(out_of_bounds().into());
        }

        Ok(&content[record.offset as usize..end as usize])
    }

    fn unpacked_source(&self, path: &AsarPath) -> Result<PathBuf> {
        let dir = self.unpacked_dir.as_deref().ok_or_else(|| Error::Io {
            path: PathBuf::from(path.as_str()),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "unpacked entry has no archive directory to be read from",
            ),
        })?;

        path.resolve_in(dir)
            .ok_or_else(|| Error::PathSafety { path: path.clone() })
    }
}

/// Copying a file onto itself truncates it, so both sides are compared first.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
