pub mod config;
pub mod observability;
pub mod path_validation;

pub use path_validation::{
    sanitize_agent_id, PathRejection, ValidationResult, WorkspacePath, WorkspacePathValidator,
    WorkspaceRootError,
};
