//! # okofend: remote heating mode daemon
//!
//! Composition root that wires the panel driver, the command runner and the
//! HTTP API together.
//!
//! ## Responsibilities
//! - Parse the command line and configuration (config file, env vars)
//! - Initialise logging
//! - Choose the runner: in-process WebDriver session or external worker
//! - Build the command gateway around a single execution slot
//! - Bind to a TCP port and serve until SIGTERM/SIGINT
//! - In `run` mode, drive the panel once and print a summary line
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod logging;
mod runner;
mod signals;
mod worker;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use okofen_adapter_http_axum::auth::BearerToken;
use okofen_adapter_http_axum::router;
use okofen_adapter_http_axum::state::AppState;
use okofen_app::services::command_gateway::CommandGateway;
use okofen_app::services::execution_slot::ExecutionSlot;
use okofen_domain::error::InvalidModeError;
use okofen_domain::mode::Mode;

use crate::config::Config;
use crate::logging::Destination;
use crate::runner::CommandRunner;

#[derive(Debug, Parser)]
#[command(name = "okofend", version, about = "Switch the heating between Auto and Stop")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Drive the control panel once and print a summary line.
    Run {
        /// Target mode: on/off, or an alias such as auto, stop, arret, 1, 0.
        #[arg(value_parser = parse_action, default_value = "off")]
        action: Mode,
    },
}

fn parse_action(input: &str) -> Result<Mode, InvalidModeError> {
    Mode::from_alias(input)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let _log_guard = logging::init(&config.logging, Destination::Configured)?;
            serve(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { action } => {
            let _log_guard = logging::init(&config.logging, Destination::Worker)?;
            config.validate_for_worker()?;
            Ok(worker::run(&config, action).await)
        }
    }
}

async fn serve(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    config.validate_for_serve()?;

    let runner = CommandRunner::from_config(config);
    let runner_kind = runner.kind();
    let gateway = CommandGateway::new(runner, ExecutionSlot::new(), config.worker.timeout());

    let state = AppState::new(
        gateway,
        BearerToken::new(config.auth.token.as_str()),
        config.worker.path.clone(),
    );
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        runner = runner_kind,
        timeout_s = config.worker.timeout_secs,
        "okofend listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(signals::terminated())
        .await?;

    tracing::info!("okofend stopped");
    Ok(())
}
