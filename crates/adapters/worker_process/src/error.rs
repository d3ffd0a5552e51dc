//! Worker process adapter error types.

use std::path::PathBuf;
use std::process::ExitStatus;

use okofen_app::ports::RunError;
use okofen_domain::mode::Mode;

/// Errors specific to running an external worker.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The worker executable could not be started.
    #[error("failed to start worker {}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Waiting for the worker failed.
    #[error("failed to wait for worker")]
    Wait(#[source] std::io::Error),

    /// The worker exited unsuccessfully without a summary line.
    #[error("worker exited with {0} and no summary")]
    Exit(ExitStatus),

    /// The summary describes another action than the one requested.
    #[error("worker summary is for `{reported}`, expected `{expected}`")]
    ActionMismatch { expected: Mode, reported: Mode },

    /// The summary reports a transition that cannot happen.
    #[error("worker summary reports an inconsistent transition")]
    InconsistentSummary,
}

impl From<WorkerError> for RunError {
    fn from(err: WorkerError) -> Self {
        RunError::Worker(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_action_mismatch() {
        let err = WorkerError::ActionMismatch {
            expected: Mode::On,
            reported: Mode::Off,
        };
        assert_eq!(err.to_string(), "worker summary is for `off`, expected `on`");
    }

    #[test]
    fn should_wrap_into_run_error() {
        let err: RunError = WorkerError::InconsistentSummary.into();
        assert!(matches!(err, RunError::Worker(_)));
    }
}
