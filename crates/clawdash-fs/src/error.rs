use clawdash_core::PathRejection;
use thiserror::Error;

/// Errors returned by workspace file operations.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("{0}")]
    Rejected(#[from] PathRejection),

    #[error("File not found")]
    NotFound,

    #[error("Not a directory")]
    NotADirectory,

    #[error("Path is a directory")]
    IsDirectory,

    #[error("File too large (max {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    /// HTTP status the dashboard routes answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            FsError::Rejected(_)
            | FsError::NotADirectory
            | FsError::IsDirectory
            | FsError::TooLarge { .. } => 400,
            FsError::NotFound => 404,
            FsError::Io(_) => 500,
        }
    }

    pub(crate) fn from_io(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            FsError::NotFound
        } else {
            FsError::Io(err)
        }
    }
}
