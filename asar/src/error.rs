use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open archive `{}`", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: asar_format::Error,
    },

    #[error("Cannot pack directory `{}`", .path.display())]
    Pack {
        path: PathBuf,
        #[source]
        source: asar_format::Error,
    },

    #[error("Cannot write archive `{}`", .path.display())]
    WriteArchive {
        path: PathBuf,
        #[source]
        source: asar_format::Error,
    },

    #[error("Cannot extract files")]
    Extract {
        #[source]
        source: asar_format::Error,
    },

    #[error("Cannot handle path `{path}`")]
    InvalidPath {
        path: String,
        #[source]
        source: asar_format::path::IntoAsarPathError,
    },

    #[error("Archive already exists: `{}` (use -f/--force to overwrite)", .path.display())]
    ArchiveExists { path: PathBuf },

    #[error("Cowardly refusing to write archive `{}` into its own source directory", .path.display())]
    ArchiveInsideSource { path: PathBuf },

    #[error("Cannot print header")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}
