// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Expansion of a script listing into an ordered execution plan.
//!
//! Scripts keep their discovery order; within a script, dates ascend.
//! Incremental runs date every unit "today". Historical runs replay each
//! script over an inclusive window, except run-once scripts, which still
//! get a single unit dated today.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use diagnostics::*;

use crate::dates::{self, DATE_FORMAT, DUMPDATE_FORMAT};
use crate::error::{Error, Result};
use crate::script::ScriptFile;

/// Historical window requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    pub start: NaiveDate,
    /// Defaults to the lagged "today" when absent
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    /// `Some` selects historical mode
    pub history: Option<HistoryWindow>,
    /// Keep only scripts whose identifier contains this substring
    pub file_filter: Option<String>,
}

impl ExpandOptions {
    #[must_use]
    pub fn incremental() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn historical(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            history: Some(HistoryWindow { start, end }),
            file_filter: None,
        }
    }

    #[must_use]
    pub fn with_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.file_filter = Some(filter.into());
        self
    }
}

/// One script invocation for one logical date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionUnit {
    #[serde(rename = "script_name", serialize_with = "serialize_script")]
    script: ScriptFile,
    #[serde(rename = "execution_date", serialize_with = "serialize_date")]
    date: NaiveDate,
    /// Same as `script_name`; the key the resolution stage reads
    file_name: String,
    dumpdate: String,
    year: String,
    month: String,
    day: String,
}

impl ExecutionUnit {
    #[must_use]
    pub fn new(script: ScriptFile, date: NaiveDate) -> Self {
        Self {
            file_name: script.id().to_string(),
            dumpdate: date.format(DUMPDATE_FORMAT).to_string(),
            year: date.year().to_string(),
            month: date.month().to_string(),
            day: date.day().to_string(),
            script,
            date,
        }
    }

    #[must_use]
    pub fn script(&self) -> &ScriptFile {
        &self.script
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// `YYYYMMDD`
    #[must_use]
    pub fn dumpdate(&self) -> &str {
        &self.dumpdate
    }

    #[must_use]
    pub fn year(&self) -> &str {
        &self.year
    }

    /// Month without zero padding
    #[must_use]
    pub fn month(&self) -> &str {
        &self.month
    }

    /// Day without zero padding
    #[must_use]
    pub fn day(&self) -> &str {
        &self.day
    }
}

fn serialize_script<S: serde::Serializer>(
    script: &ScriptFile,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(script.id())
}

fn serialize_date<S: serde::Serializer>(
    date: &NaiveDate,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DATE_FORMAT))
}

/// Ordered units; downstream execution must keep this order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExecutionPlan {
    units: Vec<ExecutionUnit>,
}

impl ExecutionPlan {
    #[must_use]
    pub fn units(&self) -> &[ExecutionUnit] {
        &self.units
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionUnit> {
        self.units.iter()
    }
}

impl IntoIterator for ExecutionPlan {
    type Item = ExecutionUnit;
    type IntoIter = std::vec::IntoIter<ExecutionUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExecutionPlan {
    type Item = &'a ExecutionUnit;
    type IntoIter = std::slice::Iter<'a, ExecutionUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

/// Expand `files` into an execution plan relative to the given `today`.
///
/// `files` must already be in discovery order. Fails without a partial plan
/// when the historical window ends before it starts.
pub fn expand(
    files: &[ScriptFile],
    options: &ExpandOptions,
    today: NaiveDate,
) -> Result<ExecutionPlan> {
    let history: Option<Vec<NaiveDate>> = match options.history {
        None => None,
        Some(window) => {
            let end = window.end.unwrap_or(today);
            if end < window.start {
                let message = format!(
                    "end date {} is earlier than start date {}",
                    end.format(DATE_FORMAT),
                    window.start.format(DATE_FORMAT)
                );
                error!("Rejecting historical window: {message}", message: message.as_str());
                return Err(Error::validation("end_date", message));
            }
            Some(dates::date_range(window.start, end, 1)?.collect())
        }
    };

    let mut units = Vec::new();
    for file in files {
        if let Some(filter) = &options.file_filter {
            if !file.matches(filter) {
                continue;
            }
        }

        match &history {
            Some(range) if !file.is_run_once() => {
                units.extend(range.iter().map(|date| ExecutionUnit::new(file.clone(), *date)));
            }
            _ => units.push(ExecutionUnit::new(file.clone(), today)),
        }
    }

    let unit_count = units.len();
    let script_count = files.len();
    info!(
        "Expanded {script_count} scripts into {unit_count} execution units",
        script_count: script_count,
        unit_count: unit_count
    );
    for unit in &units {
        let file = unit.script().id();
        let dumpdate = unit.dumpdate();
        debug!("unit {file} {dumpdate}", file: file, dumpdate: dumpdate);
    }

    Ok(ExecutionPlan { units })
}
