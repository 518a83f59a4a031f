use std::path::PathBuf;

use crate::path::{AsarPath, IntoAsarPathError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed archive")]
    Format(#[from] FormatError),

    #[error("entry `{path}` resolves outside of the destination directory")]
    PathSafety { path: AsarPath },

    #[error("no entry `{path}` in archive")]
    EntryNotFound { path: AsarPath },

    #[error("cannot handle path")]
    InvalidPath(#[from] IntoAsarPathError),
}

impl Error {
    pub(crate) fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("archive truncated: need {needed} bytes, have {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("unexpected magic value {0:#x}")]
    BadMagic(u32),

    #[error("header is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("invalid header node `{path}`: {reason}")]
    Shape { path: String, reason: &'static str },

    #[error("invalid offset `{value}` for `{path}`")]
    InvalidOffset { path: String, value: String },

    #[error("header document of {len} bytes does not fit in the frame")]
    TooLarge { len: usize },

    #[error("`{path}` is used both as a directory and as a file")]
    PathConflict { path: AsarPath },

    #[error("content of `{path}` spans {start}..{end}, beyond archive length {len}")]
    OutOfBounds {
        path: AsarPath,
        start: u64,
        end: u64,
        len: usize,
    },
}
