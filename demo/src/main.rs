//! WARRANT Demo CLI
//!
//! Runs the reference HTTP scenarios, or checks a single action against the
//! simulated remote permission service.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- user-read
//!   cargo run -p demo -- self-access
//!   cargo run -p demo -- remote-check
//!   cargo run -p demo -- failure-modes
//!   cargo run -p demo -- check report.delete --role user --config warrant.toml

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use warrant_contracts::error::WarrantResult;
use warrant_core::{config::AuthorizerConfig, options::AuthorizeOptions};
use warrant_ref_http::{
    request::HttpRequest,
    response::respond,
    scenarios::{app, failure_modes, remote_check, self_access, user_read},
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// WARRANT: action-level authorization for request handlers.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "WARRANT authorization engine demo",
    long_about = "Runs WARRANT reference scenarios showing policy registration,\n\
                  inline conditions, remote decisions, and fail-closed error handling."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: Reading a user record (decision shapes).
    UserRead,
    /// Scenario 2: Inline `when` conditions (self or admin).
    SelfAccess,
    /// Scenario 3: Remote permission service (strict shapes, timeout).
    RemoteCheck,
    /// Scenario 4: Misconfiguration and failures (403 vs 500).
    FailureModes,
    /// Evaluate one `report.*` action against the remote permission service.
    Check {
        /// Action name, e.g. `report.view`.
        action: String,
        /// Role of the calling user.
        #[arg(long, default_value = "user")]
        role: String,
        /// TOML file with evaluator settings (decision_timeout_ms, explain_by_default).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Set RUST_LOG=debug to see every evaluation.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all().await,
        Command::UserRead => user_read::run_scenario().await,
        Command::SelfAccess => self_access::run_scenario().await,
        Command::RemoteCheck => remote_check::run_scenario().await,
        Command::FailureModes => failure_modes::run_scenario().await,
        Command::Check { action, role, config } => check(config.as_ref(), &action, &role).await,
    };

    match result {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> WarrantResult<AuthorizerConfig> {
    match path {
        Some(path) => {
            let config = AuthorizerConfig::from_file(path)?;
            info!(path = %path.display(), "loaded evaluator configuration");
            Ok(config)
        }
        None => Ok(AuthorizerConfig::default()),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn run_all() -> WarrantResult<()> {
    user_read::run_scenario().await?;
    self_access::run_scenario().await?;
    remote_check::run_scenario().await?;
    failure_modes::run_scenario().await?;
    Ok(())
}

async fn check(config_path: Option<&PathBuf>, action: &str, role: &str) -> WarrantResult<()> {
    let config = load_config(config_path)?;
    let options = AuthorizeOptions::from_config(&config);
    let authz = app().with_config(config);
    remote_check::install(&authz);

    let req = HttpRequest::get("/reports/q3").with_user(json!({ "id": 1, "role": role }));
    let outcome = authz.evaluate(action, &options, &req).await;

    println!("  Action:   {action}");
    println!("  Role:     {role}");
    println!("  Outcome:  {:?}", outcome);
    match respond(&outcome) {
        Some(response) => println!("  Response: {} {}", response.status, response.body),
        None => println!("  Response: handler runs"),
    }
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

/// The evaluation steps, in the order the authorizer runs them.
const PIPELINE: [&str; 5] = [
    "Look up the policy registered for the action (missing → 403)",
    "Build the authorization context from the request",
    "Await the policy; an error here is a fault (500), never a denial",
    "If allowed and a `when` condition is given, await it too",
    "Proceed only on an explicit allow",
];

fn print_banner() {
    println!();
    println!("WARRANT: Action-level Authorization");
    println!("===================================");
    println!();
    println!("Evaluation pipeline per request:");
    for (i, step) in PIPELINE.iter().enumerate() {
        println!("  [{}] {}", i + 1, step);
    }
    println!();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::{Cli, Command, PIPELINE};

    #[test]
    fn config_belongs_to_check() {
        let cli = Cli::try_parse_from(["demo", "check", "report.view", "--config", "warrant.toml"]).unwrap();
        match cli.command {
            Command::Check { action, role, config } => {
                assert_eq!(action, "report.view");
                assert_eq!(role, "user");
                assert_eq!(config, Some(PathBuf::from("warrant.toml")));
            }
            _ => panic!("expected the check subcommand"),
        }
    }

    #[test]
    fn scenarios_do_not_accept_config() {
        assert!(Cli::try_parse_from(["demo", "--config", "warrant.toml", "run-all"]).is_err());
        assert!(Cli::try_parse_from(["demo", "run-all", "--config", "warrant.toml"]).is_err());
    }

    #[test]
    fn banner_lists_lookup_before_context() {
        assert!(PIPELINE[0].starts_with("Look up the policy"));
        assert!(PIPELINE[1].starts_with("Build the authorization context"));
    }
}
