//! Command result: the stable contract returned to API callers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::mode::Mode;
use crate::state::ApplianceState;
use crate::transition::TransitionOutcome;

/// Maximum number of characters of captured diagnostic output kept in a
/// result.
pub const OUTPUT_TAIL_CHARS: usize = 4000;

/// Why a command did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The requested action is neither `on` nor `off`. Nothing ran.
    InvalidAction,
    /// Another command holds the execution slot. Nothing ran; retry later.
    Busy,
    /// The session lifecycle started but failed.
    ScriptError,
    /// The session lifecycle exceeded its deadline and was torn down.
    Timeout,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidAction => "invalid_action",
            Self::Busy => "busy",
            Self::ScriptError => "script_error",
            Self::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one `on`/`off` command as seen by API callers.
///
/// Independent of any control-panel detail. Built through the named
/// constructors so that every error kind carries the fields callers rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub ok: bool,
    /// Requested action, echoed as received.
    pub action: String,
    pub status_before: Option<ApplianceState>,
    pub status_after: Option<ApplianceState>,
    /// `None` when the lifecycle never reported (busy, invalid, failures).
    pub action_taken: Option<bool>,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    pub message: String,
    /// One-line description of the underlying failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Tail of the captured diagnostic output, for operators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl CommandResult {
    /// The lifecycle finished and reported a transition outcome.
    #[must_use]
    pub fn completed(target: Mode, outcome: &TransitionOutcome, duration: Duration) -> Self {
        Self {
            ok: true,
            action: target.to_string(),
            status_before: Some(outcome.state_before()),
            status_after: Some(outcome.state_after()),
            action_taken: Some(outcome.action_taken()),
            duration_ms: millis(duration),
            error_code: None,
            message: success_message(target, outcome).to_string(),
            detail: None,
            output: None,
        }
    }

    /// The lifecycle finished successfully without reporting an outcome.
    #[must_use]
    pub fn completed_without_report(target: Mode, duration: Duration) -> Self {
        Self {
            ok: true,
            action: target.to_string(),
            status_before: None,
            status_after: None,
            action_taken: None,
            duration_ms: millis(duration),
            error_code: None,
            message: messages::COMPLETED.to_string(),
            detail: None,
            output: None,
        }
    }

    /// The requested action is not recognised.
    #[must_use]
    pub fn invalid_action(action: &str) -> Self {
        Self::rejected(action.to_string(), ErrorCode::InvalidAction, messages::INVALID_ACTION)
    }

    /// The execution slot is held by another command.
    #[must_use]
    pub fn busy(target: Mode) -> Self {
        Self::rejected(target.to_string(), ErrorCode::Busy, messages::BUSY)
    }

    /// The lifecycle ran and failed.
    #[must_use]
    pub fn script_error(
        target: Mode,
        duration: Duration,
        detail: String,
        output: Option<String>,
    ) -> Self {
        Self {
            ok: false,
            action: target.to_string(),
            status_before: None,
            status_after: None,
            action_taken: None,
            duration_ms: millis(duration),
            error_code: Some(ErrorCode::ScriptError),
            message: messages::SCRIPT_ERROR.to_string(),
            detail: Some(detail),
            output: output.map(|o| tail(&o).to_string()),
        }
    }

    /// The lifecycle exceeded its deadline.
    #[must_use]
    pub fn timeout(target: Mode, elapsed: Duration, output: Option<String>) -> Self {
        Self {
            ok: false,
            action: target.to_string(),
            status_before: None,
            status_after: None,
            action_taken: None,
            duration_ms: millis(elapsed),
            error_code: Some(ErrorCode::Timeout),
            message: messages::TIMEOUT.to_string(),
            detail: None,
            output: output.map(|o| tail(&o).to_string()),
        }
    }

    fn rejected(action: String, code: ErrorCode, message: &str) -> Self {
        Self {
            ok: false,
            action,
            status_before: None,
            status_after: None,
            action_taken: None,
            duration_ms: 0,
            error_code: Some(code),
            message: message.to_string(),
            detail: None,
            output: None,
        }
    }
}

/// Fixed human-readable messages.
pub mod messages {
    pub const TURNED_ON: &str = "heating turned on";
    pub const TURNED_OFF: &str = "heating turned off";
    pub const ALREADY_ON: &str = "heating already on";
    pub const ALREADY_OFF: &str = "heating already off";
    pub const INDETERMINATE: &str = "heating state is indeterminate, no action taken";
    pub const COMPLETED: &str = "command completed";
    pub const INVALID_ACTION: &str = "unknown action, expected `on` or `off`";
    pub const BUSY: &str = "another command is already running, retry later";
    pub const SCRIPT_ERROR: &str = "failed to drive the heating control panel";
    pub const TIMEOUT: &str = "heating control panel unreachable (timed out)";
}

/// Message for a successful outcome, chosen by `(action_taken, target)`.
#[must_use]
pub fn success_message(target: Mode, outcome: &TransitionOutcome) -> &'static str {
    if outcome.is_indeterminate() {
        return messages::INDETERMINATE;
    }
    match (outcome.action_taken(), target) {
        (true, Mode::On) => messages::TURNED_ON,
        (true, Mode::Off) => messages::TURNED_OFF,
        (false, Mode::On) => messages::ALREADY_ON,
        (false, Mode::Off) => messages::ALREADY_OFF,
    }
}

/// Last [`OUTPUT_TAIL_CHARS`] characters of `output`.
#[must_use]
pub fn tail(output: &str) -> &str {
    let count = output.chars().count();
    if count <= OUTPUT_TAIL_CHARS {
        return output;
    }
    let skip = count - OUTPUT_TAIL_CHARS;
    let start = output
        .char_indices()
        .nth(skip)
        .map_or(output.len(), |(idx, _)| idx);
    &output[start..]
}

/// Whole milliseconds in `duration`, saturating.
#[must_use]
pub fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
