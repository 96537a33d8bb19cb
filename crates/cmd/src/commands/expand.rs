use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlplan::handler::Flag;
use sqlplan::{DiscoverResponse, ExpandRequest, PlanResponse, ScriptKind};

use crate::common::CliContext;
use diagnostics::*;

/// Command-line flags that take precedence over the event's fields
#[derive(Debug, Clone, Default)]
pub struct ExpandOverrides {
    pub history: bool,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub file: Option<String>,
}

impl ExpandOverrides {
    /// Apply the flags that were given on top of `request`
    #[must_use]
    pub fn apply(self, mut request: ExpandRequest) -> ExpandRequest {
        if self.history {
            request.history = Some(Flag::Bool(true));
        }
        if self.start_date.is_some() {
            request.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            request.end_date = self.end_date;
        }
        if self.file.is_some() {
            request.file = self.file;
        }
        request
    }
}

/// Expand the request's script listing, or the load directory when the
/// request carries none, into an execution plan dated against `today`
pub fn expand_command(
    ctx: &CliContext,
    request: &ExpandRequest,
    today: NaiveDate,
) -> Result<PlanResponse> {
    let files = match &request.payload {
        Some(entries) => {
            let count = entries.len();
            debug!("expand_command using {count} scripts from the event", count: count);
            DiscoverResponse {
                payload: entries.clone(),
            }
            .scripts()
        }
        None => {
            let layout = ctx.layout()?;
            sqlplan::discover_kind(&layout, ScriptKind::Load)
                .context("expand failed to list data-load scripts")?
        }
    };

    sqlplan::handle_expand(request, &files, today, &ctx.stage_context()).context("expand failed")
}
