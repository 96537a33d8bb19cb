// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! SQL template resolution
//!
//! Templates are plain SQL files containing fixed `{TOKEN}` markers. Comment
//! lines are dropped before substitution; tokens not listed here are left
//! untouched.

use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use diagnostics::*;

use crate::config::PlaceholderSet;
use crate::error::{Error, Result};

pub const TARGET_DATABASE_TOKEN: &str = "{TARGET_DATABASE_TPL}";
pub const RAW_DATABASE_TOKEN: &str = "{RAW_DATABASE}";
pub const BASE_LOCATION_TOKEN: &str = "{S3_TABLE_BASE_LOCATION_TPL}";
pub const DUMPDATE_TOKEN: &str = "{DUMPDATE_P}";

/// Substituted for the dump-date token when the caller gives none
pub const MISSING_DUMPDATE: &str = "None";

// A line whose first non-blank content is `--`, with its newline.
// `[^\S\n]` keeps the match on one line so blank lines above survive.
static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[^\S\n]*--[^\n]*\n?").expect("comment pattern is valid")
});

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(TARGET_DATABASE_TPL|RAW_DATABASE|S3_TABLE_BASE_LOCATION_TPL|DUMPDATE_P)\}")
        .expect("token pattern is valid")
});

/// Remove every line that starts (after whitespace) with `--`.
///
/// Trailing `--` comments after SQL on the same line are kept as written.
#[must_use]
pub fn strip_comment_lines(sql: &str) -> Cow<'_, str> {
    COMMENT_LINE.replace_all(sql, "")
}

/// Replace every known token in one pass. Substituted values are never
/// rescanned, so a value containing a token text stays literal.
#[must_use]
pub fn substitute<'a>(
    sql: &'a str,
    placeholders: &PlaceholderSet,
    dumpdate: Option<&str>,
) -> Cow<'a, str> {
    let base_location = placeholders.base_location();
    let dumpdate = dumpdate.unwrap_or(MISSING_DUMPDATE);

    TOKEN.replace_all(sql, |caps: &Captures<'_>| -> String {
        match &caps[0] {
            TARGET_DATABASE_TOKEN => placeholders.target_database.clone(),
            RAW_DATABASE_TOKEN => placeholders.raw_database.clone(),
            BASE_LOCATION_TOKEN => base_location.clone(),
            DUMPDATE_TOKEN => dumpdate.to_string(),
            other => other.to_string(),
        }
    })
}

/// Strip comment lines from `template` and substitute its tokens
#[must_use]
pub fn render(template: &str, placeholders: &PlaceholderSet, dumpdate: Option<&str>) -> String {
    let stripped = strip_comment_lines(template);
    substitute(&stripped, placeholders, dumpdate).into_owned()
}

/// Read the template at `path` and render it
pub fn resolve_file<P: AsRef<Path>>(
    path: P,
    placeholders: &PlaceholderSet,
    dumpdate: Option<&str>,
) -> Result<String> {
    let path = path.as_ref();
    let template = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    let query = render(&template, placeholders, dumpdate);

    let file = path.display().to_string();
    info!("Resolved template {file}", file: file.as_str());
    debug!("query {query}", query: query.as_str());

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn placeholders() -> PlaceholderSet {
        PlaceholderSet {
            target_database: "analytics".to_string(),
            raw_database: "raw".to_string(),
            bucket: "s3://lake".to_string(),
            data_path: "tables".to_string(),
        }
    }

    #[test]
    fn test_render_strips_comment_and_substitutes() {
        let template = "-- comment\nSELECT * FROM {RAW_DATABASE}.t WHERE d='{DUMPDATE_P}'";
        assert_eq!(
            render(template, &placeholders(), Some("20220101")),
            "SELECT * FROM raw.t WHERE d='20220101'"
        );
    }

    #[test]
    fn test_missing_dumpdate_renders_none() {
        let template = "SELECT * FROM t WHERE d='{DUMPDATE_P}'";
        assert_eq!(
            render(template, &placeholders(), None),
            "SELECT * FROM t WHERE d='None'"
        );
    }

    #[test]
    fn test_all_tokens_every_occurrence() {
        let template = concat!(
            "CREATE TABLE {TARGET_DATABASE_TPL}.a ",
            "LOCATION '{S3_TABLE_BASE_LOCATION_TPL}/a';\n",
            "INSERT INTO {TARGET_DATABASE_TPL}.a SELECT * FROM {RAW_DATABASE}.a;\n",
        );
        assert_eq!(
            render(template, &placeholders(), None),
            "CREATE TABLE analytics.a LOCATION 's3://lake/tables/a';\n\
             INSERT INTO analytics.a SELECT * FROM raw.a;\n"
        );
    }

    #[test]
    fn test_unknown_tokens_left_verbatim() {
        let template = "SELECT '{UNKNOWN}', '{raw_database}' FROM {RAW_DATABASE}.t";
        assert_eq!(
            render(template, &placeholders(), None),
            "SELECT '{UNKNOWN}', '{raw_database}' FROM raw.t"
        );
    }

    #[test]
    fn test_indented_comment_lines_removed() {
        let template = "SELECT a,\n    -- the b column\n\t--tab indented\n  b\nFROM t";
        assert_eq!(strip_comment_lines(template), "SELECT a,\n  b\nFROM t");
    }

    #[test]
    fn test_inline_comment_preserved() {
        let template = "SELECT a -- trailing note\nFROM t";
        assert_eq!(strip_comment_lines(template), template);
    }

    #[test]
    fn test_final_comment_line_without_newline() {
        assert_eq!(strip_comment_lines("SELECT 1;\n-- end"), "SELECT 1;\n");
    }

    #[test]
    fn test_blank_lines_kept() {
        assert_eq!(
            strip_comment_lines("SELECT 1;\n\n-- next\nSELECT 2;"),
            "SELECT 1;\n\nSELECT 2;"
        );
    }

    #[test]
    fn test_substituted_value_not_rescanned() {
        let mut set = placeholders();
        set.raw_database = "{DUMPDATE_P}".to_string();
        assert_eq!(
            render("{RAW_DATABASE}.{DUMPDATE_P}", &set, Some("20220101")),
            "{DUMPDATE_P}.20220101"
        );
    }

    #[test]
    fn test_resolve_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("load.sql");
        std::fs::write(
            &path,
            "-- load\nINSERT INTO {TARGET_DATABASE_TPL}.x VALUES ('{DUMPDATE_P}');\n",
        )
        .unwrap();

        let query = resolve_file(&path, &placeholders(), Some("20230801")).unwrap();
        assert_eq!(query, "INSERT INTO analytics.x VALUES ('20230801');\n");
    }

    #[test]
    fn test_resolve_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = resolve_file(temp.path().join("nope.sql"), &placeholders(), None).unwrap_err();
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("nope.sql"));
    }
}
