use anyhow::{Context, Result};
use sqlplan::{DiscoverResponse, ScriptKind};

use crate::common::{CliContext, KindChoice};
use diagnostics::*;

/// List one script directory as a discovery response
pub fn discover_command(ctx: &CliContext, kind: KindChoice) -> Result<DiscoverResponse> {
    let kind: ScriptKind = kind.into();
    let layout = ctx.layout()?;
    let dir = layout.dir(kind);

    let dir_name = dir.display().to_string();
    debug!("discover_command listing {dir}", dir: dir_name.as_str());

    sqlplan::handle_discover(&dir, &ctx.stage_context())
        .with_context(|| format!("discover failed for {}", dir_name))
}
