use anyhow::{Context, Result};
use serde_json::json;
use std::io::Write;
use std::path::Path;

use clawdash_fs::{FileDownload, FsError, WorkspaceFiles};

use super::{print_json, EXIT_FAILURE};

fn report_error<W: Write>(out: &mut W, err: &FsError) -> Result<i32> {
    tracing::debug!(error = %err, status = err.http_status(), "File operation failed");
    print_json(
        out,
        &json!({ "error": err.to_string(), "status": err.http_status() }),
    )?;
    Ok(EXIT_FAILURE)
}

pub fn list<W: Write>(files: &WorkspaceFiles, agent: &str, path: &str, out: &mut W) -> Result<i32> {
    match files.list(agent, path) {
        Ok(entries) => {
            print_json(out, &json!({ "files": entries }))?;
            Ok(0)
        }
        Err(e) => report_error(out, &e),
    }
}

pub fn preview<W: Write>(files: &WorkspaceFiles, agent: &str, path: &str, out: &mut W) -> Result<i32> {
    match files.preview(agent, path) {
        Ok(preview) => {
            print_json(out, &preview)?;
            Ok(0)
        }
        Err(e) => report_error(out, &e),
    }
}

/// With `output`, save the file and print its metadata; without, stream the
/// raw bytes to `out`.
pub fn download<W: Write>(
    files: &WorkspaceFiles,
    agent: &str,
    path: &str,
    output: Option<&Path>,
    out: &mut W,
) -> Result<i32> {
    let download = match files.download(agent, path) {
        Ok(d) => d,
        Err(e) => return report_error(out, &e),
    };
    match output {
        Some(dest) => {
            std::fs::write(dest, &download.bytes)
                .with_context(|| format!("Failed to write {}", dest.display()))?;
            print_json(
                out,
                &json!({
                    "fileName": download.file_name,
                    "size": download.size,
                    "contentType": FileDownload::CONTENT_TYPE,
                    "contentDisposition": download.content_disposition(),
                    "output": dest.display().to_string(),
                }),
            )?;
        }
        None => out.write_all(&download.bytes)?,
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawdash_core::config::FileLimits;
    use clawdash_core::WorkspacePathValidator;
    use tempfile::TempDir;

    fn setup() -> (TempDir, WorkspaceFiles) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("code/notes")).unwrap();
        std::fs::write(dir.path().join("code/notes/todo.md"), "todo").unwrap();
        let validator = WorkspacePathValidator::new(dir.path()).unwrap();
        (dir, WorkspaceFiles::new(validator, FileLimits::default()))
    }

    fn as_json(buf: &[u8]) -> serde_json::Value {
        serde_json::from_slice(buf).unwrap()
    }

    #[test]
    fn test_list_prints_files() {
        let (_dir, files) = setup();
        let mut buf = Vec::new();
        assert_eq!(list(&files, "code", "", &mut buf).unwrap(), 0);
        let json = as_json(&buf);
        assert_eq!(json["files"][0]["name"], "notes");
        assert_eq!(json["files"][0]["type"], "dir");
    }

    #[test]
    fn test_preview_error_is_reported() {
        let (_dir, files) = setup();
        let mut buf = Vec::new();
        assert_eq!(preview(&files, "code", "../x", &mut buf).unwrap(), EXIT_FAILURE);
        let json = as_json(&buf);
        assert_eq!(json["error"], "traversal not allowed");
        assert_eq!(json["status"], 400);
    }

    #[test]
    fn test_download_to_stdout_is_raw() {
        let (_dir, files) = setup();
        let mut buf = Vec::new();
        assert_eq!(download(&files, "code", "notes/todo.md", None, &mut buf).unwrap(), 0);
        assert_eq!(buf, b"todo");
    }

    #[test]
    fn test_download_to_file() {
        let (dir, files) = setup();
        let dest = dir.path().join("saved.md");
        let mut buf = Vec::new();
        let code = download(&files, "code", "/notes/todo.md", Some(&dest), &mut buf).unwrap();
        assert_eq!(code, 0);
        assert_eq!(std::fs::read(&dest).unwrap(), b"todo");
        let json = as_json(&buf);
        assert_eq!(json["fileName"], "todo.md");
        assert_eq!(json["contentDisposition"], "attachment; filename=\"todo.md\"");
    }

    #[test]
    fn test_download_missing_reports_404() {
        let (_dir, files) = setup();
        let mut buf = Vec::new();
        assert_eq!(download(&files, "code", "nope", None, &mut buf).unwrap(), EXIT_FAILURE);
        assert_eq!(as_json(&buf)["status"], 404);
    }
}
