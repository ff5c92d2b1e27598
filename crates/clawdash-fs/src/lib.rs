//! Workspace file operations for the dashboard: directory listing, file
//! preview and file download. Every operation validates the requested path
//! with [`clawdash_core::WorkspacePathValidator`] before touching the disk.

mod error;
mod files;
mod types;

pub use error::FsError;
pub use files::{sanitize_file_name, WorkspaceFiles};
pub use types::{EntryKind, FileDownload, FilePreview, WorkspaceEntry};
