//! Runner port: executes one complete session lifecycle.
//!
//! The gateway owns the deadline and the execution slot; a runner only knows
//! how to carry a target mode through to the appliance, either in-process or
//! by delegating to a worker process.

use std::future::Future;

use okofen_domain::error::ActuationError;
use okofen_domain::mode::Mode;
use okofen_domain::transition::TransitionOutcome;

use crate::transcript::Transcript;

/// What a successful run reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutput {
    /// A typed transition outcome.
    Outcome(TransitionOutcome),
    /// The run succeeded but did not report an outcome (legacy workers).
    Unreported,
}

/// Why a run failed.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// A control-panel step could not be completed.
    #[error("actuation failed")]
    Actuation(#[from] ActuationError),

    /// The worker reported a failure in its summary.
    #[error("worker reported failure: {0}")]
    Reported(String),

    /// The worker could not be run or exited abnormally.
    #[error("worker process failed")]
    Worker(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Runs a full session lifecycle for a target mode.
///
/// Implementations append human-readable progress to `transcript` so that a
/// caller can report partial output even when the run is cancelled. Dropping
/// the returned future must tear the session down.
pub trait ModeRunner: Send + Sync + 'static {
    fn run(
        &self,
        target: Mode,
        transcript: Transcript,
    ) -> impl Future<Output = Result<RunOutput, RunError>> + Send;
}
