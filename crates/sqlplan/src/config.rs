// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Process-wide configuration, read once from the environment at startup.
//!
//! Nothing here is mutated after construction; stages receive these values
//! by reference.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::script::ScriptKind;

pub const TARGET_DB_ENV: &str = "athena_target_db";
pub const RAW_DB_ENV: &str = "athena_raw_db";
pub const BUCKET_ENV: &str = "aws_s3_data_lake";
pub const DATA_PATH_ENV: &str = "s3_data_path";
pub const LAG_DAYS_ENV: &str = "days_back";

/// Values substituted into SQL templates by the resolution stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSet {
    pub target_database: String,
    pub raw_database: String,
    pub bucket: String,
    pub data_path: String,
}

impl PlaceholderSet {
    /// Read all placeholder values from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read placeholder values through an arbitrary lookup, failing on the
    /// first variable that is unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &str| {
            lookup(var).ok_or_else(|| Error::configuration(var, "environment variable not set"))
        };

        Ok(Self {
            target_database: required(TARGET_DB_ENV)?,
            raw_database: required(RAW_DB_ENV)?,
            bucket: required(BUCKET_ENV)?,
            data_path: required(DATA_PATH_ENV)?,
        })
    }

    /// Bucket and path joined into the table base location
    #[must_use]
    pub fn base_location(&self) -> String {
        format!("{}/{}", self.bucket, self.data_path)
    }
}

/// Settings used when computing the incremental logical date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Days subtracted from the wall-clock date to get "today"
    pub lag_days: u64,
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lag_days = match lookup(LAG_DAYS_ENV) {
            None => 0,
            Some(raw) if raw.trim().is_empty() => 0,
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                Error::configuration(
                    LAG_DAYS_ENV,
                    format!("expected a non-negative number of days, got '{}': {}", raw, e),
                )
            })?,
        };
        Ok(Self { lag_days })
    }
}

/// Location of the script directories on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLayout {
    base: PathBuf,
}

impl ScriptLayout {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base: base.into() }
    }

    /// Directory holding the scripts of the given kind
    #[must_use]
    pub fn dir(&self, kind: ScriptKind) -> PathBuf {
        self.base.join(kind.dir_name())
    }
}
