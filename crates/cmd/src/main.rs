// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use cmd::commands::{self, ExpandOverrides, ResolveOverrides};
use cmd::common::{self, CliContext, KindChoice};
use diagnostics::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "sqlplan")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding sql_create/ and sql_load/ (overrides SQLPLAN_HOME)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Identifier attached to log lines for this invocation
    #[arg(long, global = true)]
    request_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the SQL scripts of one directory in execution order
    Discover {
        /// Which script directory to list
        #[arg(long, value_enum, default_value_t = KindChoice::Create)]
        kind: KindChoice,
    },
    /// Expand data-load scripts into (script, date) execution units
    Expand(ExpandArgs),
    /// Render one script into its executable query
    Resolve(ResolveArgs),
}

#[derive(Args)]
struct ExpandArgs {
    /// Request JSON: inline, @file, or - for stdin
    #[arg(long)]
    event: Option<String>,

    /// Replay scripts over a historical window
    #[arg(long)]
    history: bool,

    /// First date of the window (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// Last date of the window (YYYY-MM-DD), defaults to today
    #[arg(long)]
    end_date: Option<String>,

    /// Keep only scripts whose path contains this text
    #[arg(long)]
    file: Option<String>,
}

#[derive(Args)]
struct ResolveArgs {
    /// Request JSON: inline, @file, or - for stdin
    #[arg(long)]
    event: Option<String>,

    /// Script to render
    #[arg(long)]
    file_name: Option<String>,

    /// Value for the dump-date placeholder (YYYYMMDD)
    #[arg(long)]
    dumpdate: Option<String>,
}

fn run(cli: Cli) -> Result<String> {
    let ctx = CliContext::new(cli.base_dir, cli.request_id);

    match cli.command {
        Commands::Discover { kind } => {
            let response = commands::discover_command(&ctx, kind)?;
            commands::render_response(&response)
        }
        Commands::Expand(args) => {
            let config = sqlplan::PlannerConfig::from_env()?;
            let today = sqlplan::dates::today(config.lag_days);

            let event = common::parse_event(args.event.as_deref(), "expand")?;
            let request = ExpandOverrides {
                history: args.history,
                start_date: args.start_date,
                end_date: args.end_date,
                file: args.file,
            }
            .apply(event);

            let response = commands::expand_command(&ctx, &request, today)?;
            commands::render_response(&response)
        }
        Commands::Resolve(args) => {
            let placeholders = sqlplan::PlaceholderSet::from_env()?;

            let event = common::parse_event(args.event.as_deref(), "resolve")?;
            let request = ResolveOverrides {
                file_name: args.file_name,
                dumpdate: args.dumpdate,
            }
            .apply(event);

            let response = commands::resolve_command(&ctx, &request, &placeholders)?;
            commands::render_response(&response)
        }
    }
}

/// Exit status per error kind so the orchestrator can branch without parsing text
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<sqlplan::Error>().map(sqlplan::Error::kind) {
        Some("validation") => 2,
        Some("io") => 3,
        Some("configuration") => 4,
        _ => 1,
    }
}

fn main() -> ExitCode {
    diagnostics::init_diagnostics();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{}", output) {
                let message = e.to_string();
                error!("failed to write response: {message}", message: message.as_str());
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let message = format!("{:#}", e);
            error!("{message}", message: message.as_str());
            let _ = writeln!(std::io::stderr(), "Error: {}", message);
            ExitCode::from(exit_code(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_per_error_kind() {
        let validation = anyhow::Error::new(sqlplan::Error::validation("start_date", "required"));
        let io = anyhow::Error::new(sqlplan::Error::io(
            "/s/a.sql",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        ));
        let configuration =
            anyhow::Error::new(sqlplan::Error::configuration("athena_raw_db", "not set"));

        assert_eq!(exit_code(&validation), 2);
        assert_eq!(exit_code(&io), 3);
        assert_eq!(exit_code(&configuration), 4);
    }

    #[test]
    fn test_exit_code_through_context() {
        let result: std::result::Result<(), sqlplan::Error> =
            Err(sqlplan::Error::validation("end_date", "before start_date"));
        let err = result.context("expand failed").unwrap_err();
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_exit_code_other_errors() {
        assert_eq!(exit_code(&anyhow::anyhow!("Failed to decode expand event")), 1);
    }
}
