// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use serde::de::DeserializeOwned;

use crate::error_utils::ErrorContext;

/// Environment variable naming the directory that holds the script folders
pub const HOME_ENV: &str = "SQLPLAN_HOME";

/// Which script directory to list
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindChoice {
    /// Table and view creation scripts (default)
    Create,
    /// Data-load scripts
    Load,
}

impl From<KindChoice> for sqlplan::ScriptKind {
    fn from(choice: KindChoice) -> Self {
        match choice {
            KindChoice::Create => sqlplan::ScriptKind::Create,
            KindChoice::Load => sqlplan::ScriptKind::Load,
        }
    }
}

/// Get the base directory with an optional override, falling back to
/// SQLPLAN_HOME and then to the directory of the running executable
pub fn get_base_dir_with_override(override_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path);
    }

    if let Ok(home) = env::var(HOME_ENV) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    let exe = env::current_exe().with_context_msg("Failed to locate executable")?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Executable {} has no parent directory", exe.display()))
}

/// Shared state for one CLI invocation
#[derive(Debug, Clone, Default)]
pub struct CliContext {
    pub base_dir: Option<PathBuf>,
    /// Correlates log lines when the orchestrator passes an id
    pub request_id: Option<String>,
}

impl CliContext {
    pub fn new(base_dir: Option<PathBuf>, request_id: Option<String>) -> Self {
        Self {
            base_dir,
            request_id,
        }
    }

    pub fn layout(&self) -> Result<sqlplan::ScriptLayout> {
        let base = get_base_dir_with_override(self.base_dir.clone())?;
        Ok(sqlplan::ScriptLayout::new(base))
    }

    #[must_use]
    pub fn stage_context(&self) -> sqlplan::Context {
        sqlplan::Context {
            request_id: self.request_id.clone(),
        }
    }
}

/// Read the raw text of an event argument.
///
/// `-` reads standard input, `@path` reads a file, anything else is taken
/// as inline JSON. No argument means an empty event.
pub fn read_event_text(arg: Option<&str>) -> Result<String> {
    match arg {
        None => Ok("{}".to_string()),
        Some("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .with_context_msg("Failed to read event from stdin")?;
            Ok(text)
        }
        Some(arg) => match arg.strip_prefix('@') {
            Some(path) => std::fs::read_to_string(path).file_context("read event file", path),
            None => Ok(arg.to_string()),
        },
    }
}

/// Decode an event argument into a stage request
pub fn parse_event<T: DeserializeOwned>(arg: Option<&str>, stage: &str) -> Result<T> {
    let text = read_event_text(arg)?;
    let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
    serde_json::from_str(text).event_context(stage)
}
