use anyhow::{Context, Result};
use sqlplan::{PlaceholderSet, ResolveRequest, ResolveResponse};

use crate::common::CliContext;

/// Command-line flags that take precedence over the event's fields
#[derive(Debug, Clone, Default)]
pub struct ResolveOverrides {
    pub file_name: Option<String>,
    pub dumpdate: Option<String>,
}

impl ResolveOverrides {
    #[must_use]
    pub fn apply(self, mut request: ResolveRequest) -> ResolveRequest {
        if self.file_name.is_some() {
            request.file_name = self.file_name;
        }
        if self.dumpdate.is_some() {
            request.dumpdate = self.dumpdate;
        }
        request
    }
}

/// Render the requested script into its final query
pub fn resolve_command(
    ctx: &CliContext,
    request: &ResolveRequest,
    placeholders: &PlaceholderSet,
) -> Result<ResolveResponse> {
    sqlplan::handle_resolve(request, placeholders, &ctx.stage_context()).with_context(|| {
        format!(
            "resolve failed for {}",
            request.file_name.as_deref().unwrap_or("<no file_name>")
        )
    })
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
    fn test_resolve_with_overrides() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("t.sql");
        std::fs::write(
            &path,
            "-- header\nSELECT '{DUMPDATE_P}' FROM {TARGET_DATABASE_TPL}.t",
        )
        .unwrap();

        let event = ResolveRequest {
            file_name: Some(path.display().to_string()),
            dumpdate: Some("20200101".to_string()),
        };
        let overrides = ResolveOverrides {
            dumpdate: Some("20230801".to_string()),
            ..Default::default()
        };
        let request = overrides.apply(event);

        let response = resolve_command(&CliContext::default(), &request, &placeholders()).unwrap();
        assert_eq!(response.query, "SELECT '20230801' FROM analytics.t");
    }

    #[test]
    fn test_resolve_missing_file_names_path() {
        let request = ResolveRequest {
            file_name: Some("/nonexistent/dir/x.sql".to_string()),
            dumpdate: None,
        };
        let err = resolve_command(&CliContext::default(), &request, &placeholders()).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/x.sql"));
        let kind = err.downcast_ref::<sqlplan::Error>().map(sqlplan::Error::kind);
        assert_eq!(kind, Some("io"));
    }
}
