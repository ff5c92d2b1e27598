//! List, preview and download inside an agent workspace.

use std::fs;
use std::io::ErrorKind;

use clawdash_core::config::FileLimits;
use clawdash_core::observability;
use clawdash_core::{PathRejection, WorkspacePath, WorkspacePathValidator};

use crate::error::FsError;
use crate::types::{modified_of, FileDownload, FilePreview, WorkspaceEntry};

/// Keep only the last path component and the characters `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// File operations confined to `<workspace_root>/<agent>`.
#[derive(Debug, Clone)]
pub struct WorkspaceFiles {
    validator: WorkspacePathValidator,
    limits: FileLimits,
}

impl WorkspaceFiles {
    pub fn new(validator: WorkspacePathValidator, limits: FileLimits) -> Self {
        Self { validator, limits }
    }

    pub fn validator(&self) -> &WorkspacePathValidator {
        &self.validator
    }

    pub fn limits(&self) -> &FileLimits {
        &self.limits
    }

    /// Validate `path`, then make sure an existing target does not reach
    /// outside the workspace through a symlink.
    fn authorize(&self, operation: &str, agent_id: &str, path: &str) -> Result<WorkspacePath, FsError> {
        let target = self
            .validator
            .resolve(path, agent_id)
            .and_then(|target| {
                ensure_no_symlink_escape(&target)?;
                Ok(target)
            })
            .map_err(|rejection| {
                observability::security_path_rejected(
                    &clawdash_core::sanitize_agent_id(agent_id),
                    operation,
                    path,
                    rejection,
                );
                FsError::Rejected(rejection)
            })?;
        tracing::debug!(agent = %target.agent(), operation, relative = %target.relative(), "Workspace path authorized");
        Ok(target)
    }

    /// Entries of a directory, sorted by name. Hidden files are included.
    pub fn list(&self, agent_id: &str, path: &str) -> Result<Vec<WorkspaceEntry>, FsError> {
        let target = self.authorize("list", agent_id, path)?;
        let meta = fs::metadata(target.as_path()).map_err(FsError::from_io)?;
        if !meta.is_dir() {
            return Err(FsError::NotADirectory);
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(target.as_path()).map_err(FsError::from_io)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            match entry.metadata() {
                Ok(meta) => entries.push(WorkspaceEntry::from_metadata(name, &meta)),
                Err(e) => tracing::debug!(name = %name, error = %e, "Skipping unreadable entry"),
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// UTF-8 preview of a file, refused above `preview_max_bytes` and cut to
    /// `preview_max_chars`.
    pub fn preview(&self, agent_id: &str, path: &str) -> Result<FilePreview, FsError> {
        let target = self.authorize("preview", agent_id, path)?;
        let meta = fs::metadata(target.as_path()).map_err(FsError::from_io)?;
        if meta.is_dir() {
            return Err(FsError::IsDirectory);
        }
        if meta.len() > self.limits.preview_max_bytes {
            return Err(FsError::TooLarge {
                size: meta.len(),
                limit: self.limits.preview_max_bytes,
            });
        }

        let bytes = fs::read(target.as_path()).map_err(FsError::from_io)?;
        let text = String::from_utf8_lossy(&bytes);
        let (content, truncated) = truncate_chars(&text, self.limits.preview_max_chars);
        Ok(FilePreview {
            name: target.file_name().unwrap_or("unknown").to_string(),
            content,
            size: meta.len(),
            modified: modified_of(&meta),
            truncated,
        })
    }

    /// Raw file bytes for an attachment, refused above `download_max_bytes`.
    pub fn download(&self, agent_id: &str, path: &str) -> Result<FileDownload, FsError> {
        let target = self.authorize("download", agent_id, path)?;
        let meta = fs::metadata(target.as_path()).map_err(FsError::from_io)?;
        if meta.is_dir() {
            return Err(FsError::IsDirectory);
        }
        if meta.len() > self.limits.download_max_bytes {
            return Err(FsError::TooLarge {
                size: meta.len(),
                limit: self.limits.download_max_bytes,
            });
        }

        let bytes = fs::read(target.as_path()).map_err(FsError::from_io)?;
        let file_name = Some(sanitize_file_name(target.file_name().unwrap_or("")))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "file".to_string());
        tracing::info!(agent = %target.agent(), file_name = %file_name, size = bytes.len(), "Workspace file downloaded");
        Ok(FileDownload {
            file_name,
            size: bytes.len() as u64,
            bytes,
        })
    }
}

/// A missing target is fine here; the caller reports not-found after this.
fn ensure_no_symlink_escape(target: &WorkspacePath) -> Result<(), PathRejection> {
    let Ok(base) = target.base().canonicalize() else {
        return Ok(());
    };
    match target.as_path().canonicalize() {
        Ok(real) if real.starts_with(&base) => Ok(()),
        Ok(_) => Err(PathRejection::OutsideWorkspace),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => {
            tracing::debug!(error = %e, "Could not canonicalize workspace path");
            Ok(())
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (text[..idx].to_string(), true),
        None => (text.to_string(), false),
    }
}
