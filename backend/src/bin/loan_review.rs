//! Review loan applications against a running loan desk server.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use loan_desk::domain::{
    Application, ApplicationId, ApplicationStatus, ReviewerSession, StatusWorkflowController,
    TraceId,
};
use loan_desk::outbound::http::HttpApplicationStore;
use mockable::DefaultClock;
use tokio::runtime::Builder;
use url::Url;

/// `loan-review` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "loan-review",
    about = "List loan applications and record review decisions",
    version
)]
struct CliArgs {
    /// Base URL of the loan desk REST API.
    #[arg(long = "server-url", value_name = "url", default_value = "http://127.0.0.1:8080/api/v1/")]
    server_url: Url,
    /// Reviewer name recorded in logs.
    #[arg(long, value_name = "name", default_value = "reviewer")]
    reviewer: String,
    /// Per-request timeout in seconds.
    #[arg(long = "timeout-secs", value_name = "seconds", default_value_t = 10)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print every application with its current status.
    List,
    /// Move an application that is still under scrutiny to a new status.
    SetStatus {
        /// Application identifier.
        id: String,
        /// `Under Scrutiny`, `Approved` or `Rejected`.
        #[arg(value_parser = parse_status)]
        status: ApplicationStatus,
    },
}

fn parse_status(raw: &str) -> Result<ApplicationStatus, String> {
    raw.parse().map_err(|error| format!("{error}"))
}

fn main() -> io::Result<()> {
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    // One trace id per invocation; the server logs every call under it.
    let trace_id = TraceId::generate();
    runtime
        .block_on(TraceId::scope(trace_id, async_main(args)))
        .map_err(|error| io::Error::new(error.kind(), format!("{error} (trace id {trace_id})")))
}

async fn async_main(args: CliArgs) -> io::Result<()> {
    let store = HttpApplicationStore::new(args.server_url, Duration::from_secs(args.timeout_secs))
        .map_err(|error| io::Error::other(format!("build HTTP client: {error}")))?;
    let controller = StatusWorkflowController::new(
        Arc::new(store),
        Arc::new(DefaultClock),
        ReviewerSession::new(args.reviewer),
    );
    controller
        .load()
        .await
        .map_err(|error| io::Error::other(format!("load applications: {error}")))?;

    match args.command {
        Command::List => {
            for application in controller.applications() {
                println!("{}", summary_line(&application));
            }
            Ok(())
        }
        Command::SetStatus { id, status } => {
            let id = ApplicationId::new(id)
                .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
            match controller.change_status(&id, status).await {
                Ok(application) => {
                    println!("{}", summary_line(&application));
                    Ok(())
                }
                Err(error) => {
                    for notice in controller.notices() {
                        eprintln!("{}", notice.message);
                    }
                    Err(io::Error::other(format!("status change failed: {error}")))
                }
            }
        }
    }
}

fn summary_line(application: &Application) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        application.id(),
        application.customer_id(),
        application.credit_score(),
        application.status()
    )
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use clap::Parser;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn set_status_accepts_wire_names() {
        let args = CliArgs::try_parse_from(["loan-review", "set-status", "A1", "Under Scrutiny"])
            .expect("arguments parse");

        assert!(matches!(
            args.command,
            Command::SetStatus { ref id, status: ApplicationStatus::UnderScrutiny } if id == "A1"
        ));
        assert_eq!(args.server_url.as_str(), "http://127.0.0.1:8080/api/v1/");
        assert_eq!(args.timeout_secs, 10);
        assert_eq!(args.reviewer, "reviewer");
    }

    #[rstest]
    fn unknown_status_is_rejected_by_the_parser() {
        let error = CliArgs::try_parse_from(["loan-review", "set-status", "A1", "Escalated"])
            .expect_err("unknown status");

        assert!(error.to_string().contains("Escalated"));
    }
}
