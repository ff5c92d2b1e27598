//! 统一环境变量加载逻辑
//!
//! 集中维护 fallback 链，避免在业务代码中重复 `or_else` 调用。

use std::env;
use std::path::Path;

/// 加载当前目录下的 `.env` 到环境变量（不覆盖已存在的变量）
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let dir = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        load_dotenv_from_dir(&dir);
    });
}

/// 加载指定目录下的 `.env`（不覆盖已存在的变量）
pub fn load_dotenv_from_dir(dir: &Path) {
    let Ok(content) = std::fs::read_to_string(dir.join(".env")) else {
        return;
    };
    for line in content.lines() {
        if let Some((key, value)) = parse_dotenv_line(line) {
            if env::var(key).is_err() {
                env::set_var(key, value);
            }
        }
    }
}

/// Parse one `KEY=value` line. Returns `None` for blanks, comments and
/// malformed lines.
pub(crate) fn parse_dotenv_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let mut value = value.trim();
    // Strip inline comment (# not inside quotes)
    if let Some(hash_pos) = value.find('#') {
        let before_hash = value[..hash_pos].trim_end();
        if !before_hash.contains('"') && !before_hash.contains('\'') {
            value = before_hash;
        }
    }
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        value = &value[1..value.len() - 1];
    }
    if key.is_empty() {
        None
    } else {
        Some((key, value))
    }
}

/// 从主变量或别名链读取环境变量，失败时使用默认值
pub fn env_or<F>(primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default)
}

/// 从主变量或别名链读取，返回 Option（空值视为未设置）
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
}

/// 解析布尔型环境变量：0/false/no/off 为 false，其它非空值为 true
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    env_optional(primary, aliases)
        .map(|s| parse_bool(&s))
        .unwrap_or(default)
}

/// 解析数值型环境变量，无法解析时记录 warn 并使用默认值
pub fn env_u64(primary: &str, aliases: &[&str], default: u64) -> u64 {
    match env_optional(primary, aliases) {
        Some(s) => s.parse::<u64>().unwrap_or_else(|_| {
            tracing::warn!(key = %primary, value = %s, "Ignoring non-numeric value, using default");
            default
        }),
        None => default,
    }
}

pub(crate) fn parse_bool(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
