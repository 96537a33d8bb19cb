// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! sqlplan - execution plans for a directory of templated SQL scripts
//!
//! Three independent stages, chained by an external workflow engine:
//!
//! - discovery lists the `.sql` scripts of a directory in path order
//! - expansion turns that listing into (script, logical date) units
//! - resolution renders one unit's script into an executable query

pub mod config;
pub mod dates;
pub mod discovery;
pub mod error;
pub mod handler;
pub mod plan;
pub mod script;
pub mod template;

pub use config::{PlaceholderSet, PlannerConfig, ScriptLayout};
pub use discovery::{discover, discover_kind};
pub use error::{Error, Result};
pub use handler::{
    Context, DiscoverResponse, ExpandRequest, FileEntry, PlanResponse, ResolveRequest,
    ResolveResponse, handle_discover, handle_expand, handle_resolve,
};
pub use plan::{ExecutionPlan, ExecutionUnit, ExpandOptions, HistoryWindow, expand};
pub use script::{RUN_ONCE_MARKER, ScriptFile, ScriptKind};
pub use template::resolve_file;
