// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use diagnostics::*;

use crate::config::ScriptLayout;
use crate::error::{Error, Result};
use crate::script::{ScriptFile, ScriptKind};

const SQL_EXTENSION: &str = "sql";

/// List the `.sql` files directly under `dir`, sorted by path string.
///
/// Hidden entries and directories are skipped. An empty directory yields an
/// empty list; any filesystem error fails the whole listing.
pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Vec<ScriptFile>> {
    let dir = dir.as_ref();
    let dir_display = dir.display().to_string();
    debug!("Discovering SQL scripts in {dir}", dir: dir_display.as_str());

    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut scripts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();

        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;
        // Follow symlinks so a linked script counts like a regular one
        let is_file = if file_type.is_symlink() {
            std::fs::metadata(&path)
                .map_err(|e| Error::io(&path, e))?
                .is_file()
        } else {
            file_type.is_file()
        };
        if !is_file || !is_sql_script(&path) {
            continue;
        }

        scripts.push(ScriptFile::new(path));
    }

    scripts.sort();

    let count = scripts.len();
    info!("Discovered {count} SQL scripts in {dir}", count: count, dir: dir_display.as_str());
    for script in &scripts {
        let file = script.id();
        debug!("script {file}", file: file);
    }

    Ok(scripts)
}

/// Discover the scripts of one kind under the configured layout
pub fn discover_kind(layout: &ScriptLayout, kind: ScriptKind) -> Result<Vec<ScriptFile>> {
    discover(layout.dir(kind))
}

fn is_sql_script(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_none_or(|n| n.starts_with('.'));
    !hidden && path.extension().and_then(|e| e.to_str()) == Some(SQL_EXTENSION)
}
