//! Worker summary line.
//!
//! A worker process prints one line of the form
//! `OKOFEN_SUMMARY:{"ok":true,"action":"off",...}` on stdout. The caller
//! scans captured output for the **last** line carrying the prefix. This is a
//! compatibility boundary for out-of-process workers; in-process callers use
//! [`TransitionOutcome`] directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::{millis, success_message};
use crate::mode::Mode;
use crate::state::ApplianceState;
use crate::transition::TransitionOutcome;

/// Prefix identifying the summary line.
pub const SUMMARY_PREFIX: &str = "OKOFEN_SUMMARY:";

/// Machine-readable result emitted by a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub ok: bool,
    pub action: Mode,
    #[serde(default)]
    pub status_before: Option<ApplianceState>,
    #[serde(default)]
    pub status_after: Option<ApplianceState>,
    #[serde(default)]
    pub changed: Option<bool>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl Summary {
    /// Summary of a successful transition.
    #[must_use]
    pub fn success(target: Mode, outcome: &TransitionOutcome, duration: Duration) -> Self {
        Self {
            ok: true,
            action: target,
            status_before: Some(outcome.state_before()),
            status_after: Some(outcome.state_after()),
            changed: Some(outcome.action_taken()),
            duration_ms: millis(duration),
            message: success_message(target, outcome).to_string(),
            error: None,
        }
    }

    /// Summary of a failed run.
    #[must_use]
    pub fn failure(target: Mode, duration: Duration, error: String) -> Self {
        Self {
            ok: false,
            action: target,
            status_before: None,
            status_after: None,
            changed: None,
            duration_ms: millis(duration),
            message: crate::command::messages::SCRIPT_ERROR.to_string(),
            error: Some(error),
        }
    }

    /// Render as a single prefixed line (without trailing newline).
    ///
    /// # Errors
    ///
    /// Returns a serialisation error from `serde_json`.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        Ok(format!("{SUMMARY_PREFIX}{}", serde_json::to_string(self)?))
    }

    /// Find the last summary line in `output` and decode it.
    ///
    /// Returns `None` when no line carries the prefix or when the last one
    /// does not decode; earlier summary lines are never used as a fallback.
    #[must_use]
    pub fn parse_last(output: &str) -> Option<Self> {
        let payload = output
            .lines()
            .rev()
            .find_map(|line| line.trim().strip_prefix(SUMMARY_PREFIX))?;
        serde_json::from_str(payload.trim()).ok()
    }

    /// The reported transition, when complete and self-consistent.
    #[must_use]
    pub fn outcome(&self) -> Option<TransitionOutcome> {
        TransitionOutcome::from_parts(
            self.action,
            self.status_before?,
            self.status_after?,
            self.changed?,
        )
    }
}
