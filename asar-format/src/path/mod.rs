use relative_path::{Component as RelComponent, RelativePath, RelativePathBuf};
use std::{
    fmt,
    path::{Component, Path, PathBuf},
};

mod error;

pub use self::error::IntoAsarPathError;

/// The separator used between segments of an `AsarPath`, regardless of platform.
pub const PATH_ASAR_SEP: &str = "/";

/// A path inside the archive namespace: relative, "/"-joined, no leading separator.
///
/// Paths read from an archive header are taken as-is and may contain `..` or
/// other hostile segments. They are only checked when resolved against a
/// directory on disk, see [`AsarPath::resolve_in`].
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct AsarPath(pub(crate) String);

impl AsarPath {
    pub fn new<S: AsRef<str>>(path: S) -> std::result::Result<AsarPath, IntoAsarPathError> {
        let path = path.as_ref();

        if path.is_empty() {
            return Err(IntoAsarPathError::EmptyPath);
        }

        if path.starts_with(PATH_ASAR_SEP) {
            return Err(IntoAsarPathError::AbsolutePath);
        }

        if path.split(PATH_ASAR_SEP).any(str::is_empty) {
            return Err(IntoAsarPathError::EmptySegment);
        }

        Ok(AsarPath(path.to_string()))
    }

    /// Archive path of `file`, found while walking `root`.
    ///
    /// The final component of `root` itself is kept as the first segment, so
    /// packing `/tmp/app` stores `/tmp/app/a.txt` as `app/a.txt`.
    pub fn from_fs_path(
        root: &Path,
        file: &Path,
    ) -> std::result::Result<AsarPath, IntoAsarPathError> {
        let rel = file
            .strip_prefix(root)
            .map_err(|_| IntoAsarPathError::AbsolutePath)?;

        let mut out: Vec<&str> = vec![];

        if let Some(name) = root.file_name() {
            out.push(name.to_str().ok_or(IntoAsarPathError::UnrepresentableStr)?);
        }

        for component in rel.components() {
            match component {
                Component::Normal(os_str) => {
                    out.push(os_str.to_str().ok_or(IntoAsarPathError::UnrepresentableStr)?)
                }
                Component::CurDir => {}
                _ => return Err(IntoAsarPathError::AbsolutePath),
            }
        }

        if out.is_empty() {
            return Err(IntoAsarPathError::EmptyPath);
        }

        Ok(AsarPath(out.join(PATH_ASAR_SEP)))
    }

    /// Appends a raw header name. No validation is done.
    pub(crate) fn join_name(parent: Option<&AsarPath>, name: &str) -> AsarPath {
        match parent {
            Some(parent) => AsarPath(format!("{}{}{}", parent.0, PATH_ASAR_SEP, name)),
            None => AsarPath(name.to_string()),
        }
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn iter(&self) -> std::str::Split<'_, &str> {
        self.0.split(PATH_ASAR_SEP)
    }

    pub fn filename(&self) -> &str {
        self.0
            .rsplit(PATH_ASAR_SEP)
            .next()
            .unwrap_or(self.0.as_str())
    }

    pub fn parent(&self) -> Option<AsarPath> {
        self.0
            .rsplit_once(PATH_ASAR_SEP)
            .map(|(parent, _)| AsarPath(parent.to_string()))
    }

    pub fn depth(&self) -> usize {
        self.0.matches(PATH_ASAR_SEP).count()
    }

    /// Resolves this path lexically beneath `root`.
    ///
    /// Returns `None` if the path is absolute, climbs above `root` through `..`,
    /// normalises to nothing, or has a segment that is not a single plain file
    /// name on this platform.
    pub fn resolve_in<P: AsRef<Path>>(&self, root: P) -> Option<PathBuf> {
        if self.0.starts_with(PATH_ASAR_SEP) {
            return None;
        }

        let mut parts: Vec<&str> = vec![];
        for component in RelativePath::new(&self.0).components() {
            match component {
                RelComponent::CurDir => {}
                RelComponent::ParentDir => {
                    parts.pop()?;
                }
                RelComponent::Normal(name) => {
                    let mut native = Path::new(name).components();
                    match (native.next(), native.next()) {
                        (Some(Component::Normal(_)), None) => parts.push(name),
                        _ => return None,
                    }
                }
            }
        }

        if parts.is_empty() {
            return None;
        }

        let rel = RelativePathBuf::from(parts.join(PATH_ASAR_SEP));
        Some(rel.to_path(root.as_ref()))
    }
}

impl fmt::Display for AsarPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AsarPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
