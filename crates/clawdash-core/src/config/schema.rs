//! 按领域分组的配置结构体
//!
//! 从环境变量加载，统一 fallback 逻辑。

use super::env_keys::{limits, observability as obv_keys, workspace};
use super::loader::{env_bool, env_optional, env_or, env_u64};
use crate::path_validation::{WorkspacePathValidator, WorkspaceRootError};
use std::path::PathBuf;

/// 默认 agent（与 dashboard 路由的缺省值一致）
pub const DEFAULT_AGENT: &str = "code";

/// 工作区配置：所有 agent 工作区所在的根目录
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    pub workspace_root: PathBuf,
    pub default_agent: String,
}

impl WorkspaceConfig {
    /// 从环境变量加载（会自动加载 .env）
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        let workspace_root = env_optional(
            workspace::CLAWDASH_WORKSPACE_ROOT,
            workspace::WORKSPACE_ROOT_ALIASES,
        )
        .map(PathBuf::from)
        .unwrap_or_else(Self::default_workspace_root);
        let default_agent = env_or(workspace::CLAWDASH_DEFAULT_AGENT, &[], || {
            DEFAULT_AGENT.to_string()
        });
        Self::new(workspace_root, default_agent)
    }

    /// Relative roots are anchored at the current directory.
    pub fn new(workspace_root: impl Into<PathBuf>, default_agent: impl Into<String>) -> Self {
        Self {
            workspace_root: absolutize(workspace_root.into()),
            default_agent: default_agent.into(),
        }
    }

    /// `~/.openclaw/workspaces`
    pub fn default_workspace_root() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/"))
            .join(".openclaw")
            .join("workspaces")
    }

    pub fn with_root(self, workspace_root: impl Into<PathBuf>) -> Self {
        Self::new(workspace_root, self.default_agent)
    }

    /// Build the validator for this root. The root reaches path validation
    /// only through here.
    pub fn validator(&self) -> Result<WorkspacePathValidator, WorkspaceRootError> {
        WorkspacePathValidator::new(&self.workspace_root)
    }
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() || path.as_os_str().is_empty() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

/// 文件预览 / 下载大小限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLimits {
    /// Files larger than this are refused for preview.
    pub preview_max_bytes: u64,
    /// Preview content is cut to this many characters.
    pub preview_max_chars: usize,
    pub download_max_bytes: u64,
}

impl Default for FileLimits {
    fn default() -> Self {
        Self {
            preview_max_bytes: 1024 * 1024,
            preview_max_chars: 50_000,
            download_max_bytes: 50 * 1024 * 1024,
        }
    }
}

impl FileLimits {
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        let d = Self::default();
        Self {
            preview_max_bytes: env_u64(limits::CLAWDASH_PREVIEW_MAX_BYTES, &[], d.preview_max_bytes),
            preview_max_chars: env_u64(
                limits::CLAWDASH_PREVIEW_MAX_CHARS,
                &[],
                d.preview_max_chars as u64,
            ) as usize,
            download_max_bytes: env_u64(
                limits::CLAWDASH_DOWNLOAD_MAX_BYTES,
                &[],
                d.download_max_bytes,
            ),
        }
    }
}

/// 可观测性配置：quiet、log_level、log_json、security_events_log
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
    pub security_events_log: Option<String>,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::CLAWDASH_QUIET, &[], false),
                log_level: env_or(obv_keys::CLAWDASH_LOG_LEVEL, &[], || {
                    "clawdash=info".to_string()
                }),
                log_json: env_bool(obv_keys::CLAWDASH_LOG_JSON, &[], false),
                security_events_log: env_optional(obv_keys::CLAWDASH_SECURITY_EVENTS_LOG, &[]),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_match_dashboard() {
        let limits = FileLimits::default();
        assert_eq!(limits.preview_max_bytes, 1_048_576);
        assert_eq!(limits.preview_max_chars, 50_000);
        assert_eq!(limits.download_max_bytes, 52_428_800);
    }

    #[test]
    fn test_default_root_under_openclaw() {
        let root = WorkspaceConfig::default_workspace_root();
        assert!(root.ends_with(".openclaw/workspaces"));
    }

    #[test]
    fn test_relative_root_is_anchored() {
        let cfg = WorkspaceConfig::new("ws", "code");
        assert!(cfg.workspace_root.is_absolute());
        assert!(cfg.workspace_root.ends_with("ws"));
    }

    #[test]
    fn test_with_root_keeps_agent() {
        let cfg = WorkspaceConfig::new("/a", "main").with_root("/b");
        assert_eq!(cfg.workspace_root, PathBuf::from("/b"));
        assert_eq!(cfg.default_agent, "main");
    }

    #[test]
    fn test_validator_uses_configured_root() {
        let cfg = WorkspaceConfig::new("/ws/", "code");
        let v = cfg.validator().unwrap();
        assert_eq!(v.expected_base("code"), "/ws/code");
        assert_eq!(WorkspacePathValidator::new("/ws").unwrap(), v);
    }

    #[test]
    fn test_empty_root_rejected() {
        let cfg = WorkspaceConfig::new("", "code");
        assert_eq!(cfg.validator(), Err(WorkspaceRootError::Empty));
    }
}
