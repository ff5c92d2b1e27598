//! Path validation utilities.
//!
//! Confines caller-supplied paths to `<workspace_root>/<agent_id>`. Every file
//! list, preview and download goes through [`WorkspacePathValidator`] before
//! touching the filesystem.
//!
//! ## Rules
//!
//! 1. **Agent id sanitization**: characters outside `[A-Za-z0-9_-]` are dropped,
//!    never rejected, so `"../etc"` becomes `"etc"`.
//! 2. **Segment check**: any `.` or `..` segment is rejected, even when the net
//!    effect would stay inside the workspace (`foo/../bar`, `./foo`).
//! 3. **Absolute-looking input**: a leading `/` is relative to the agent
//!    workspace. A path that already names the workspace is stripped back to its
//!    relative portion; a sibling that merely shares the textual prefix
//!    (`/ws/codesuffix` vs `/ws/code`) is refused.
//! 4. **Confinement check**: the joined result must be the base itself or a
//!    separator-bounded descendant of it.
//!
//! Validation is purely syntactic. Nothing here reads the filesystem; symlink
//! checks belong to the I/O layer.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

const SEP: char = '/';

/// Why a path was refused. Display strings never contain filesystem paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PathRejection {
    /// The path contains a `.` or `..` segment.
    #[error("traversal not allowed")]
    Traversal,

    /// The resolved path is not inside the agent workspace.
    #[error("access outside workspace not permitted")]
    OutsideWorkspace,
}

impl PathRejection {
    /// Short machine-readable tag used in logs and security events.
    pub fn kind(&self) -> &'static str {
        match self {
            PathRejection::Traversal => "traversal",
            PathRejection::OutsideWorkspace => "out_of_sandbox",
        }
    }
}

/// Errors from building a validator out of a configured workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceRootError {
    #[error("Workspace root is empty")]
    Empty,

    #[error("Workspace root must be an absolute path: {0}")]
    NotAbsolute(String),

    #[error("Workspace root is not valid UTF-8")]
    NotUtf8,
}

/// Strip every character outside `[A-Za-z0-9_-]`. May return an empty string.
pub fn sanitize_agent_id(agent_id: &str) -> String {
    agent_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

fn is_traversal_segment(segment: &str) -> bool {
    segment == ".." || segment == "."
}

/// Separator-aware prefix test: `candidate` equals `base` or lives below it.
fn is_within(base: &str, candidate: &str) -> bool {
    if base == "/" {
        return candidate.starts_with(SEP);
    }
    match candidate.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with(SEP),
        None => false,
    }
}

fn join_under(base: &str, segments: &[&str]) -> String {
    if segments.is_empty() {
        return base.to_string();
    }
    let tail = segments.join("/");
    if base == "/" {
        format!("/{}", tail)
    } else {
        format!("{}/{}", base, tail)
    }
}

fn segments_of(path: &str) -> Vec<&str> {
    path.split(SEP).filter(|s| !s.is_empty()).collect()
}

/// Normalize the trusted, configured root. Unlike user input, `.` and `..`
/// are resolved here rather than rejected.
fn normalize_root(root: &str) -> Result<String, WorkspaceRootError> {
    if root.trim().is_empty() {
        return Err(WorkspaceRootError::Empty);
    }
    if !root.starts_with(SEP) {
        return Err(WorkspaceRootError::NotAbsolute(root.to_string()));
    }
    let mut parts: Vec<&str> = Vec::new();
    for segment in root.split(SEP) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    Ok(format!("/{}", parts.join("/")))
}

/// A path that passed validation. The only thing I/O code may open.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkspacePath {
    agent: String,
    base: String,
    relative: String,
    resolved: String,
}

impl WorkspacePath {
    /// Absolute path inside the agent workspace.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.resolved)
    }

    pub fn as_str(&self) -> &str {
        &self.resolved
    }

    pub fn into_path_buf(self) -> PathBuf {
        PathBuf::from(self.resolved)
    }

    /// Sanitized agent id the path was resolved for.
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// The agent workspace directory (`ExpectedBase`).
    pub fn base(&self) -> &Path {
        Path::new(&self.base)
    }

    /// Portion below the workspace, `""` for the workspace itself.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    pub fn is_workspace_root(&self) -> bool {
        self.relative.is_empty()
    }

    /// Last segment of the relative portion.
    pub fn file_name(&self) -> Option<&str> {
        self.relative.rsplit(SEP).next().filter(|s| !s.is_empty())
    }
}

impl AsRef<Path> for WorkspacePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

/// Tagged validation outcome. Serializes to the dashboard wire shape
/// `{"valid": true, "resolvedPath": ...}` / `{"valid": false, "error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid { resolved_path: String },
    Invalid { error: PathRejection },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    pub fn resolved_path(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid { resolved_path } => Some(resolved_path),
            ValidationResult::Invalid { .. } => None,
        }
    }

    pub fn error(&self) -> Option<PathRejection> {
        match self {
            ValidationResult::Valid { .. } => None,
            ValidationResult::Invalid { error } => Some(*error),
        }
    }
}

impl From<Result<WorkspacePath, PathRejection>> for ValidationResult {
    fn from(result: Result<WorkspacePath, PathRejection>) -> Self {
        match result {
            Ok(path) => ValidationResult::Valid {
                resolved_path: path.resolved,
            },
            Err(error) => ValidationResult::Invalid { error },
        }
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ValidationResult", 2)?;
        match self {
            ValidationResult::Valid { resolved_path } => {
                s.serialize_field("valid", &true)?;
                s.serialize_field("resolvedPath", resolved_path)?;
            }
            ValidationResult::Invalid { error } => {
                s.serialize_field("valid", &false)?;
                s.serialize_field("error", &error.to_string())?;
            }
        }
        s.end()
    }
}

/// Validator bound to one workspace root. Holds no mutable state; clone or
/// share it freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePathValidator {
    root: String,
}

impl WorkspacePathValidator {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, WorkspaceRootError> {
        let root = root.as_ref().to_str().ok_or(WorkspaceRootError::NotUtf8)?;
        Ok(Self {
            root: normalize_root(root)?,
        })
    }

    pub fn root(&self) -> &Path {
        Path::new(&self.root)
    }

    /// `normalize(root + "/" + sanitize(agent_id))`.
    pub fn expected_base(&self, agent_id: &str) -> String {
        let agent = sanitize_agent_id(agent_id);
        join_under(&self.root, &segments_of(&agent))
    }

    /// Resolve `user_path` inside the workspace of `agent_id`.
    pub fn resolve(&self, user_path: &str, agent_id: &str) -> Result<WorkspacePath, PathRejection> {
        let agent = sanitize_agent_id(agent_id);
        let base = join_under(&self.root, &segments_of(&agent));
        let segments = segments_of(user_path);

        let relative: &[&str] = if user_path.starts_with(SEP) {
            let normalized = join_under("/", &segments);
            if is_within(&base, &normalized) {
                &segments[segments_of(&base).len()..]
            } else if normalized.starts_with(base.as_str()) {
                tracing::debug!(agent = %agent, "rejected sibling sharing the workspace prefix");
                return Err(PathRejection::OutsideWorkspace);
            } else {
                &segments
            }
        } else {
            &segments
        };

        if relative.iter().any(|s| is_traversal_segment(s)) {
            tracing::debug!(agent = %agent, "rejected traversal segment");
            return Err(PathRejection::Traversal);
        }

        let resolved = join_under(&base, relative);
        if !is_within(&base, &resolved) {
            tracing::error!(agent = %agent, "joined path left the workspace after passing segment checks");
            return Err(PathRejection::OutsideWorkspace);
        }

        Ok(WorkspacePath {
            agent,
            base,
            relative: relative.join("/"),
            resolved,
        })
    }

    /// [`resolve`](Self::resolve) as a tagged [`ValidationResult`].
    pub fn validate(&self, user_path: &str, agent_id: &str) -> ValidationResult {
        self.resolve(user_path, agent_id).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ws() -> WorkspacePathValidator {
        WorkspacePathValidator::new("/ws/").unwrap()
    }

    fn resolved(result: ValidationResult) -> String {
        result
            .resolved_path()
            .map(str::to_string)
            .unwrap_or_else(|| panic!("expected valid result, got {:?}", result))
    }

    // ---- Reference scenarios ----

    #[test]
    fn test_empty_path_is_workspace_root() {
        assert_eq!(resolved(ws().validate("", "code")), "/ws/code");
    }

    #[test]
    fn test_slash_is_workspace_root() {
        assert_eq!(resolved(ws().validate("/", "code")), "/ws/code");
        assert_eq!(resolved(ws().validate("///", "code")), "/ws/code");
    }

    #[test]
    fn test_absolute_traversal_rejected() {
        assert_eq!(
            ws().validate("/../../etc/passwd", "code"),
            ValidationResult::Invalid {
                error: PathRejection::Traversal
            }
        );
    }

    #[test]
    fn test_relative_path_joined() {
        assert_eq!(
            resolved(ws().validate("notes/todo.md", "code")),
            "/ws/code/notes/todo.md"
        );
    }

    #[test]
    fn test_absolute_inside_workspace_is_stripped_and_rejoined() {
        assert_eq!(
            resolved(ws().validate("/ws/code/notes/todo.md", "code")),
            "/ws/code/notes/todo.md"
        );
        assert_eq!(resolved(ws().validate("/ws/code", "code")), "/ws/code");
        assert_eq!(resolved(ws().validate("/ws/code/", "code")), "/ws/code");
    }

    #[test]
    fn test_benign_parent_segment_still_rejected() {
        assert_eq!(
            ws().validate("foo/../bar", "code").error(),
            Some(PathRejection::Traversal)
        );
        assert_eq!(
            ws().validate("a/b/../c", "code").error(),
            Some(PathRejection::Traversal)
        );
    }

    #[test]
    fn test_hostile_agent_id_is_sanitized() {
        assert_eq!(resolved(ws().validate("x", "../../etc")), "/ws/etc/x");
    }

    #[test]
    fn test_sibling_prefix_rejected() {
        assert_eq!(
            ws().validate("/ws/codesuffix/secret", "code").error(),
            Some(PathRejection::OutsideWorkspace)
        );
    }

    // ---- Segment rules ----

    #[test]
    fn test_current_dir_segment_rejected() {
        assert_eq!(
            ws().validate("./foo", "code").error(),
            Some(PathRejection::Traversal)
        );
        assert_eq!(
            ws().validate("foo/.", "code").error(),
            Some(PathRejection::Traversal)
        );
        assert_eq!(ws().validate(".", "code").error(), Some(PathRejection::Traversal));
    }

    #[test]
    fn test_traversal_after_workspace_prefix_rejected() {
        assert_eq!(
            ws().validate("/ws/code/../other/secret", "code").error(),
            Some(PathRejection::Traversal)
        );
    }

    #[test]
    fn test_dotted_names_are_not_traversal() {
        assert_eq!(resolved(ws().validate(".env", "code")), "/ws/code/.env");
        assert_eq!(resolved(ws().validate("a/...", "code")), "/ws/code/a/...");
        assert_eq!(resolved(ws().validate("..hidden", "code")), "/ws/code/..hidden");
    }

    #[test]
    fn test_repeated_separators_collapsed() {
        assert_eq!(
            resolved(ws().validate("notes//todo.md/", "code")),
            "/ws/code/notes/todo.md"
        );
    }

    #[test]
    fn test_absolute_outside_workspace_treated_as_relative() {
        assert_eq!(
            resolved(ws().validate("/etc/passwd", "code")),
            "/ws/code/etc/passwd"
        );
        assert_eq!(
            resolved(ws().validate("/ws/other/file", "code")),
            "/ws/code/ws/other/file"
        );
    }

    #[test]
    fn test_empty_agent_resolves_to_root() {
        assert_eq!(resolved(ws().validate("", "")), "/ws");
        assert_eq!(resolved(ws().validate("code/a", "../")), "/ws/code/a");
    }

    #[test]
    fn test_error_messages_do_not_leak_paths() {
        let result = ws().validate("/../../etc/passwd", "code");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["error"], "traversal not allowed");
        assert!(json.get("resolvedPath").is_none());

        let msg = PathRejection::OutsideWorkspace.to_string();
        assert_eq!(msg, "access outside workspace not permitted");
        assert!(!msg.contains('/'));
    }

    #[test]
    fn test_valid_result_wire_shape() {
        let json = serde_json::to_value(ws().validate("notes", "code")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"valid": true, "resolvedPath": "/ws/code/notes"})
        );
    }

    #[test]
    fn test_workspace_path_accessors() {
        let path = ws().resolve("/ws/code/notes/todo.md", "co de").unwrap();
        assert_eq!(path.agent(), "code");
        assert_eq!(path.base(), Path::new("/ws/code"));
        assert_eq!(path.relative(), "notes/todo.md");
        assert_eq!(path.file_name(), Some("todo.md"));
        assert!(!path.is_workspace_root());

        let root = ws().resolve("", "code").unwrap();
        assert!(root.is_workspace_root());
        assert_eq!(root.file_name(), None);
    }

    // ---- Root handling ----

    #[test]
    fn test_root_normalized() {
        let v = WorkspacePathValidator::new("/srv//workspaces/./x/../").unwrap();
        assert_eq!(v.root(), Path::new("/srv/workspaces"));
        assert_eq!(v.expected_base("code"), "/srv/workspaces/code");
    }

    #[test]
    fn test_filesystem_root_as_workspace_root() {
        let v = WorkspacePathValidator::new("/").unwrap();
        assert_eq!(resolved(v.validate("a", "")), "/a");
        assert_eq!(resolved(v.validate("/code/a", "code")), "/code/a");
    }

    #[test]
    fn test_invalid_roots() {
        assert_eq!(WorkspacePathValidator::new(""), Err(WorkspaceRootError::Empty));
        assert!(matches!(
            WorkspacePathValidator::new("relative/ws"),
            Err(WorkspaceRootError::NotAbsolute(_))
        ));
    }

    #[test]
    fn test_sanitize_agent_id() {
        assert_eq!(sanitize_agent_id("../etc"), "etc");
        assert_eq!(sanitize_agent_id("my-agent_01"), "my-agent_01");
        assert_eq!(sanitize_agent_id("a/b\\c d.e"), "abcde");
        assert_eq!(sanitize_agent_id("代理"), "");
    }

    #[test]
    fn test_is_within_is_separator_aware() {
        assert!(is_within("/ws/code", "/ws/code"));
        assert!(is_within("/ws/code", "/ws/code/a"));
        assert!(!is_within("/ws/code", "/ws/codesuffix"));
        assert!(!is_within("/ws/code", "/ws"));
        assert!(is_within("/", "/anything"));
    }
}
