pub mod discover;
pub mod expand;
pub mod resolve;

pub use discover::discover_command;
pub use expand::{ExpandOverrides, expand_command};
pub use resolve::{ResolveOverrides, resolve_command};

use anyhow::Result;
use serde::Serialize;

use crate::error_utils::ErrorContext;

/// Pretty JSON for a stage response, as written to stdout
pub fn render_response<T: Serialize>(response: &T) -> Result<String> {
    serde_json::to_string_pretty(response).with_context_msg("Failed to encode response")
}
