// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

/// Marker in a script name meaning "never replay across a historical window"
pub const RUN_ONCE_MARKER: &str = "JUST-ONCE";

/// The two fixed script directories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// Table and view creation scripts
    Create,
    /// Data-load scripts, run per logical date
    Load,
}

impl ScriptKind {
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            ScriptKind::Create => "sql_create",
            ScriptKind::Load => "sql_load",
        }
    }
}

/// Identity of one SQL template on disk.
///
/// Ordering is by the full path string. Scripts run in that order because
/// later ones may read views created by earlier ones.
#[derive(Debug, Clone)]
pub struct ScriptFile {
    id: String,
    path: PathBuf,
    name: String,
}

impl ScriptFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let id = path.to_string_lossy().into_owned();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { id, path, name }
    }

    /// The identifier string used for ordering, filtering and contracts
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name, e.g. `010_orders.sql`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_run_once(&self) -> bool {
        self.id.contains(RUN_ONCE_MARKER)
    }

    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        self.id.contains(filter)
    }
}

impl PartialEq for ScriptFile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ScriptFile {}

impl PartialOrd for ScriptFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScriptFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for ScriptFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
