//! Command gateway: single-flight, deadline-bounded command execution.
//!
//! ```text
//!   Idle --try_acquire--> Running --complete | timeout | fault--> Idle
//! ```
//!
//! There is no queued state: a request arriving while another one runs is
//! answered with [`ErrorCode::Busy`](okofen_domain::command::ErrorCode::Busy)
//! immediately.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use okofen_domain::command::CommandResult;
use okofen_domain::error::describe;
use okofen_domain::mode::Mode;

use crate::ports::{ModeRunner, RunOutput};
use crate::services::execution_slot::ExecutionSlot;
use crate::transcript::Transcript;

/// Serialises `on`/`off` commands and turns every outcome into a
/// [`CommandResult`].
pub struct CommandGateway<R> {
    runner: Arc<R>,
    slot: ExecutionSlot,
    deadline: Duration,
}

impl<R: ModeRunner> CommandGateway<R> {
    /// Create a gateway running commands through `runner`, guarded by `slot`
    /// and cut off after `deadline`.
    pub fn new(runner: R, slot: ExecutionSlot, deadline: Duration) -> Self {
        Self {
            runner: Arc::new(runner),
            slot,
            deadline,
        }
    }

    /// Per-command deadline.
    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Whether a command is currently running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.slot.is_held()
    }

    /// Validate `action` and run it.
    ///
    /// Unknown actions are rejected before the slot is touched.
    pub async fn execute(&self, action: &str) -> CommandResult {
        match action.parse::<Mode>() {
            Ok(target) => self.run(target).await,
            Err(err) => {
                tracing::warn!(error = %err, "rejecting invalid action");
                CommandResult::invalid_action(action)
            }
        }
    }

    /// Run one command for `target`.
    ///
    /// The lifecycle runs on its own task together with the slot guard, so a
    /// caller that goes away does not interrupt an actuation in progress;
    /// only the deadline does. The slot is freed before this returns on every
    /// path.
    pub async fn run(&self, target: Mode) -> CommandResult {
        let Some(guard) = self.slot.try_acquire() else {
            tracing::warn!(action = %target, "concurrent invocation refused");
            return CommandResult::busy(target);
        };

        let execution_id = Uuid::new_v4();
        let span = tracing::info_span!("command", %execution_id, action = %target);
        let transcript = Transcript::new();
        let runner = Arc::clone(&self.runner);
        let deadline = self.deadline;
        let task_transcript = transcript.clone();

        tracing::info!(
            parent: &span,
            timeout_s = deadline.as_secs(),
            "executing command"
        );
        let started = Instant::now();
        let task = tokio::spawn(
            async move {
                let _guard = guard;
                tokio::time::timeout(deadline, runner.run(target, task_transcript)).await
            }
            .instrument(span.clone()),
        );
        let joined = task.await;
        let elapsed = started.elapsed();

        let _entered = span.enter();
        match joined {
            Ok(Ok(Ok(RunOutput::Outcome(outcome)))) => {
                let result = CommandResult::completed(target, &outcome, elapsed);
                tracing::info!(
                    status_before = %outcome.state_before(),
                    status_after = %outcome.state_after(),
                    changed = outcome.action_taken(),
                    duration_ms = result.duration_ms,
                    "command completed"
                );
                result
            }
            Ok(Ok(Ok(RunOutput::Unreported))) => {
                let result = CommandResult::completed_without_report(target, elapsed);
                tracing::info!(
                    duration_ms = result.duration_ms,
                    "command completed without summary"
                );
                result
            }
            Ok(Ok(Err(err))) => {
                let detail = describe(&err);
                let result =
                    CommandResult::script_error(target, elapsed, detail, transcript.snapshot());
                tracing::warn!(
                    error = %result.detail.as_deref().unwrap_or_default(),
                    duration_ms = result.duration_ms,
                    "command failed"
                );
                result
            }
            Ok(Err(_)) => {
                let result = CommandResult::timeout(target, elapsed, transcript.snapshot());
                tracing::error!(duration_ms = result.duration_ms, "command timed out");
                result
            }
            Err(err) => {
                tracing::error!(error = %err, "command task aborted");
                CommandResult::script_error(
                    target,
                    elapsed,
                    format!("command task aborted: {err}"),
                    transcript.snapshot(),
                )
            }
        }
    }
}
