// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Stage entry points and their JSON request/response contracts.
//!
//! Each handler takes a request and an invocation [`Context`] and either
//! returns a complete response or an error; nothing partial is produced.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use diagnostics::*;

use crate::config::PlaceholderSet;
use crate::dates;
use crate::discovery;
use crate::error::{Error, Result};
use crate::plan::{self, ExecutionPlan, ExpandOptions, HistoryWindow};
use crate::script::ScriptFile;
use crate::template;

/// Orchestrator hand-off data; only used to correlate log lines
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub request_id: Option<String>,
}

impl Context {
    fn id(&self) -> &str {
        self.request_id.as_deref().unwrap_or("-")
    }
}

/// One entry of a discovery response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverResponse {
    pub payload: Vec<FileEntry>,
}

impl DiscoverResponse {
    /// Script identities in path order, each listed once
    #[must_use]
    pub fn scripts(&self) -> Vec<ScriptFile> {
        let mut scripts: Vec<ScriptFile> = self
            .payload
            .iter()
            .map(|entry| ScriptFile::new(&entry.file_name))
            .collect();
        scripts.sort();
        scripts.dedup();
        scripts
    }
}

/// `history` arrives either as the string "true" or as a JSON boolean
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Text(s) => s == "true",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Substring filter on script paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// A discovery payload to expand instead of listing the load directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Vec<FileEntry>>,
}

impl ExpandRequest {
    /// Validate the request into expansion options.
    ///
    /// Dates are checked whenever present, even in incremental mode where
    /// they are otherwise unused.
    pub fn options(&self) -> Result<ExpandOptions> {
        let start = self
            .start_date
            .as_deref()
            .map(|s| dates::parse_date("start_date", s))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .map(|s| dates::parse_date("end_date", s))
            .transpose()?;

        let history = if self.history.as_ref().is_some_and(Flag::is_set) {
            let start = start.ok_or_else(|| {
                Error::validation("start_date", "required when history is true")
            })?;
            Some(HistoryWindow { start, end })
        } else {
            None
        };

        Ok(ExpandOptions {
            history,
            file_filter: self.file.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanResponse {
    pub payload: ExecutionPlan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub dumpdate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub query: String,
}

/// List the scripts in `dir` as a discovery response
pub fn handle_discover<P: AsRef<Path>>(dir: P, ctx: &Context) -> Result<DiscoverResponse> {
    let request_id = ctx.id();
    let dir = dir.as_ref();
    let scripts = discovery::discover(dir).inspect_err(|e| {
        let message = e.to_string();
        error!(
            "[{request_id}] discovery failed: {message}",
            request_id: request_id,
            message: message.as_str()
        );
    })?;

    Ok(DiscoverResponse {
        payload: scripts
            .iter()
            .map(|s| FileEntry {
                file_name: s.id().to_string(),
            })
            .collect(),
    })
}

/// Expand `files` per `request`, dating incremental units `today`
pub fn handle_expand(
    request: &ExpandRequest,
    files: &[ScriptFile],
    today: NaiveDate,
    ctx: &Context,
) -> Result<PlanResponse> {
    let request_id = ctx.id();
    let result = request
        .options()
        .and_then(|options| plan::expand(files, &options, today));

    match result {
        Ok(payload) => Ok(PlanResponse { payload }),
        Err(e) => {
            let message = e.to_string();
            error!(
                "[{request_id}] plan expansion failed: {message}",
                request_id: request_id,
                message: message.as_str()
            );
            Err(e)
        }
    }
}

/// Render the script named by `request` into an executable query
pub fn handle_resolve(
    request: &ResolveRequest,
    placeholders: &PlaceholderSet,
    ctx: &Context,
) -> Result<ResolveResponse> {
    let request_id = ctx.id();
    let result = match request.file_name.as_deref() {
        Some(name) if !name.is_empty() => {
            template::resolve_file(name, placeholders, request.dumpdate.as_deref())
        }
        _ => Err(Error::validation("file_name", "not provided in the request")),
    };

    match result {
        Ok(query) => Ok(ResolveResponse { query }),
        Err(e) => {
            let message = e.to_string();
            error!(
                "[{request_id}] template resolution failed: {message}",
                request_id: request_id,
                message: message.as_str()
            );
            Err(e)
        }
    }
}
