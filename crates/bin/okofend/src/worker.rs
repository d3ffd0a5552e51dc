//! `okofend run <action>`: one in-process actuation, reported as a summary
//! line on stdout.

use std::process::ExitCode;
use std::time::Instant;

use okofen_app::transcript::Transcript;
use okofen_domain::error::describe;
use okofen_domain::mode::Mode;
use okofen_domain::summary::Summary;

use crate::config::Config;
use crate::{runner, signals};

/// Drive the panel once and print the summary line.
///
/// Progress goes to the log (stderr); stdout carries only the summary so a
/// parent process can pick it up. SIGTERM or SIGINT abandons the run but
/// still closes the browser session.
pub async fn run(config: &Config, target: Mode) -> ExitCode {
    let lifecycle = runner::in_process(config);
    let transcript = Transcript::new();
    let started = Instant::now();

    let result = lifecycle
        .execute_until(target, &transcript, signals::terminated())
        .await;
    let summary = match result {
        Ok(outcome) => Summary::success(target, &outcome, started.elapsed()),
        Err(err) => {
            let error = describe(&err);
            tracing::error!(action = %target, error = %error, "actuation failed");
            Summary::failure(target, started.elapsed(), error)
        }
    };

    match summary.to_line() {
        Ok(line) => println!("{line}"),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode summary");
            return ExitCode::FAILURE;
        }
    }

    if summary.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
