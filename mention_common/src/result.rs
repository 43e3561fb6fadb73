//! Result type alias shared across the workspace.
//!
//! Defaults the error type to `MentionError`, so functions can simply return `Result<T>`.
use crate::error::MentionError;

/// Workspace-wide `Result` alias with `MentionError` as the default error.
pub type Result<T, E = MentionError> = std::result::Result<T, E>;
