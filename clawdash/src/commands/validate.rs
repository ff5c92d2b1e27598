use anyhow::Result;
use std::io::Write;

use clawdash_core::WorkspacePathValidator;

use super::{print_json, EXIT_INVALID};

/// Print `{"valid": ..., "resolvedPath"|"error": ...}` for `path`.
pub fn run<W: Write>(
    validator: &WorkspacePathValidator,
    agent: &str,
    path: &str,
    out: &mut W,
) -> Result<i32> {
    let result = validator.validate(path, agent);
    print_json(out, &result)?;
    Ok(if result.is_valid() { 0 } else { EXIT_INVALID })
}
