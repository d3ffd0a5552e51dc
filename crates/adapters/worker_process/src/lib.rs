//! # okofen-adapter-worker-process
//!
//! Runs each command in a separate worker process, isolating the browser
//! automation runtime from the HTTP server.
//!
//! ## Protocol
//!
//! The worker is invoked as `<program> [args...] <on|off>`. Its stdout and
//! stderr are streamed line by line into the command transcript. When it
//! exits, the **last** `OKOFEN_SUMMARY:<json>` line on stdout is decoded
//! (see [`okofen_domain::summary`]):
//!
//! | summary              | exit code | result                      |
//! |----------------------|-----------|-----------------------------|
//! | `ok: true`, complete | any       | typed transition outcome    |
//! | `ok: true`, partial  | any       | success without outcome     |
//! | `ok: false`          | any       | reported failure            |
//! | absent / unparsable  | 0         | success without outcome     |
//! | absent / unparsable  | non-zero  | worker failure              |
//!
//! On unix the worker leads its own process group. Dropping the run future
//! (deadline exceeded) sends `SIGTERM` to the whole group, giving an
//! `okofend run` worker the chance to close its browser session, then
//! `SIGKILL` once the grace period has passed. Elsewhere only the direct
//! child is killed.

mod error;
#[cfg(unix)]
mod group;

pub use error::WorkerError;

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use okofen_app::ports::{ModeRunner, RunError, RunOutput};
use okofen_app::transcript::Transcript;
use okofen_domain::mode::Mode;
use okofen_domain::summary::Summary;

/// Time a cancelled worker gets between `SIGTERM` and `SIGKILL`.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Runs commands through an external worker executable.
#[derive(Debug, Clone)]
pub struct WorkerProcessRunner {
    program: PathBuf,
    args: Vec<String>,
    grace: Duration,
}

impl WorkerProcessRunner {
    /// Runner invoking `program` with `args` followed by the action.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            grace: DEFAULT_GRACE_PERIOD,
        }
    }

    /// Change how long a cancelled worker may take to shut down.
    #[must_use]
    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    #[must_use]
    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

impl ModeRunner for WorkerProcessRunner {
    #[tracing::instrument(skip(self, transcript), fields(program = %self.program.display()))]
    async fn run(&self, target: Mode, transcript: Transcript) -> Result<RunOutput, RunError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(target.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        command.process_group(0);
        #[cfg(not(unix))]
        command.kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| WorkerError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        tracing::debug!(pid = ?child.id(), "worker started");
        #[cfg(unix)]
        let mut group = group::GroupGuard::new(child.id(), self.grace);

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (stdout, (), status) = tokio::join!(
            forward_lines(stdout, &transcript, ""),
            async {
                forward_lines(stderr, &transcript, "[stderr] ").await;
            },
            child.wait(),
        );
        let status = status.map_err(WorkerError::Wait)?;
        #[cfg(unix)]
        group.disarm();
        tracing::debug!(%status, "worker exited");

        interpret(target, status, &stdout)
    }
}

/// Copy every line of `stream` into `transcript` and return the lines read.
async fn forward_lines<S>(stream: Option<S>, transcript: &Transcript, prefix: &str) -> String
where
    S: AsyncRead + Unpin,
{
    let mut collected = String::new();
    let Some(stream) = stream else {
        return collected;
    };
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                transcript.record(format!("{prefix}{line}"));
                collected.push_str(&line);
                collected.push('\n');
            }
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(error = %err, "stopped reading worker output");
                transcript.record(format!("{prefix}<unreadable output: {err}>"));
                break;
            }
        }
    }
    collected
}

fn interpret(target: Mode, status: ExitStatus, stdout: &str) -> Result<RunOutput, RunError> {
    let Some(summary) = Summary::parse_last(stdout) else {
        return if status.success() {
            tracing::info!("worker succeeded without summary");
            Ok(RunOutput::Unreported)
        } else {
            Err(WorkerError::Exit(status).into())
        };
    };

    if summary.action != target {
        return Err(WorkerError::ActionMismatch {
            expected: target,
            reported: summary.action,
        }
        .into());
    }
    if !summary.ok {
        return Err(RunError::Reported(
            summary.error.unwrap_or(summary.message),
        ));
    }
    if !status.success() {
        tracing::warn!(%status, "worker summary reports success despite exit status");
    }

    match summary.outcome() {
        Some(outcome) => Ok(RunOutput::Outcome(outcome)),
        None if summary.status_before.is_some()
            && summary.status_after.is_some()
            && summary.changed.is_some() =>
        {
            Err(WorkerError::InconsistentSummary.into())
        }
        None => Ok(RunOutput::Unreported),
    }
}
