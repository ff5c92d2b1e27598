use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl WorkspaceEntry {
    /// Symlinks are not followed; a link to a directory lists as a file.
    pub(crate) fn from_metadata(name: String, meta: &Metadata) -> Self {
        Self {
            name,
            kind: if meta.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            },
            size: meta.len(),
            modified: modified_of(meta),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Text preview of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePreview {
    pub name: String,
    pub content: String,
    /// Size on disk, not of `content`.
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub truncated: bool,
}

/// File content ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub size: u64,
}

impl FileDownload {
    pub const CONTENT_TYPE: &'static str = "application/octet-stream";

    /// `Content-Disposition` header value.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

pub(crate) fn modified_of(meta: &Metadata) -> Option<DateTime<Utc>> {
    meta.modified().ok().map(DateTime::<Utc>::from)
}
