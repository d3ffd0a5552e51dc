//! Session lifecycle: one end-to-end interaction with the control panel.

use std::time::Duration;

use okofen_domain::error::{ActuationError, describe};
use okofen_domain::mode::Mode;
use okofen_domain::transition::TransitionOutcome;

use crate::ports::{ModeRunner, PanelDriver, PanelSession, RunError, RunOutput};
use crate::services::mode_controller::ModeController;
use crate::transcript::Transcript;

/// Opens a session, authenticates, navigates to the heating circuit, runs the
/// [`ModeController`], confirms when needed and closes the session.
///
/// Nothing is cached between runs; each run re-observes the appliance.
pub struct SessionLifecycle<D> {
    driver: D,
    controller: ModeController,
    step_timeout: Duration,
}

impl<D: PanelDriver> SessionLifecycle<D> {
    /// Create a lifecycle that opens sessions through `driver` and waits at
    /// most `step_timeout` for each interactive step.
    pub fn new(driver: D, step_timeout: Duration) -> Self {
        Self {
            driver,
            controller: ModeController::new(step_timeout),
            step_timeout,
        }
    }

    /// Run the full lifecycle for `target`, recording each step.
    ///
    /// The session is closed on every path once it has been opened. A failure
    /// to close is logged but does not turn a completed transition into an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns the first [`ActuationError`] raised by session setup, login,
    /// navigation, the transition, or the confirmation.
    pub async fn execute(
        &self,
        target: Mode,
        transcript: &Transcript,
    ) -> Result<TransitionOutcome, ActuationError> {
        self.execute_until(target, transcript, std::future::pending())
            .await
    }

    /// Like [`execute`](Self::execute), but abandons the interaction as soon
    /// as `interrupt` resolves. The session is still closed.
    ///
    /// # Errors
    ///
    /// Returns [`ActuationError::Cancelled`] when interrupted, otherwise as
    /// [`execute`](Self::execute).
    #[tracing::instrument(skip(self, transcript, interrupt))]
    pub async fn execute_until(
        &self,
        target: Mode,
        transcript: &Transcript,
        interrupt: impl Future<Output = ()> + Send,
    ) -> Result<TransitionOutcome, ActuationError> {
        let mut interrupt = std::pin::pin!(interrupt);

        progress(transcript, &format!("opening browser session (target={target})"));
        let session = tokio::select! {
            biased;
            () = &mut interrupt => {
                transcript.record("interrupted before the session opened");
                return Err(ActuationError::Cancelled);
            }
            session = self.driver.open_session() => session?,
        };

        let result = tokio::select! {
            biased;
            () = &mut interrupt => {
                tracing::warn!("interrupted, abandoning interaction");
                Err(ActuationError::Cancelled)
            }
            result = self.drive(&session, target, transcript) => result,
        };
        if let Err(err) = &result {
            transcript.record(format!("failed: {}", describe(err)));
        }

        progress(transcript, "closing browser session");
        if let Err(err) = session.close().await {
            tracing::warn!(error = %describe(&err), "failed to close session");
            transcript.record(format!("close failed: {}", describe(&err)));
        }
        result
    }

    async fn drive(
        &self,
        session: &D::Session,
        target: Mode,
        transcript: &Transcript,
    ) -> Result<TransitionOutcome, ActuationError> {
        progress(transcript, "logging in");
        session.login().await?;

        progress(transcript, "opening heating circuit page");
        session.open_heating_circuit().await?;

        progress(transcript, "scanning mode indicators");
        let outcome = self.controller.transition(session, target).await?;
        progress(
            transcript,
            &format!(
                "mode scan: before={} after={} changed={}",
                outcome.state_before(),
                outcome.state_after(),
                outcome.action_taken()
            ),
        );

        if outcome.action_taken() {
            progress(transcript, "confirming mode change");
            session.confirm(self.step_timeout).await?;
        } else {
            progress(transcript, "no mode change requested, skipping confirmation");
        }

        if let Err(err) = session.return_home().await {
            tracing::debug!(error = %describe(&err), "could not return to home page");
            transcript.record(format!("return home skipped: {}", describe(&err)));
        }

        Ok(outcome)
    }
}

/// Record a lifecycle step in the transcript and the log.
fn progress(transcript: &Transcript, step: &str) {
    tracing::info!("{step}");
    transcript.record(step);
}

impl<D> ModeRunner for SessionLifecycle<D>
where
    D: PanelDriver + 'static,
    D::Session: 'static,
{
    async fn run(&self, target: Mode, transcript: Transcript) -> Result<RunOutput, RunError> {
        let outcome = self.execute(target, &transcript).await?;
        Ok(RunOutput::Outcome(outcome))
    }
}
