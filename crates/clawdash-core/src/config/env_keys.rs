//! 环境变量 key 常量与别名定义
//!
//! 主变量优先使用 `CLAWDASH_*`，兼容 OpenClaw 的 `OPENCLAW_*`。

/// 工作区根目录与默认 agent
pub mod workspace {
    /// Directory holding every agent workspace.
    pub const CLAWDASH_WORKSPACE_ROOT: &str = "CLAWDASH_WORKSPACE_ROOT";
    pub const WORKSPACE_ROOT_ALIASES: &[&str] = &["OPENCLAW_WORKSPACES"];

    /// Agent used when a request names none.
    pub const CLAWDASH_DEFAULT_AGENT: &str = "CLAWDASH_DEFAULT_AGENT";
}

/// 文件预览 / 下载大小限制
pub mod limits {
    pub const CLAWDASH_PREVIEW_MAX_BYTES: &str = "CLAWDASH_PREVIEW_MAX_BYTES";
    pub const CLAWDASH_PREVIEW_MAX_CHARS: &str = "CLAWDASH_PREVIEW_MAX_CHARS";
    pub const CLAWDASH_DOWNLOAD_MAX_BYTES: &str = "CLAWDASH_DOWNLOAD_MAX_BYTES";
}

/// 可观测性与日志
pub mod observability {
    pub const CLAWDASH_QUIET: &str = "CLAWDASH_QUIET";
    pub const CLAWDASH_LOG_LEVEL: &str = "CLAWDASH_LOG_LEVEL";
    pub const CLAWDASH_LOG_JSON: &str = "CLAWDASH_LOG_JSON";
    pub const CLAWDASH_SECURITY_EVENTS_LOG: &str = "CLAWDASH_SECURITY_EVENTS_LOG";
}
