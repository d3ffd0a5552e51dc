//! Mode controller: infers the current mode and performs the transition.

use std::time::Duration;

use okofen_domain::error::ActuationError;
use okofen_domain::mode::Mode;
use okofen_domain::state::{ApplianceState, ObservedSignal};
use okofen_domain::transition::{Decision, TransitionOutcome};

use crate::ports::{ControlPanel, Indicator};

/// Drives the mode selector of an open control panel.
///
/// Never guesses: when the indicators are ambiguous the outcome is
/// [`ApplianceState::Unknown`] with no action taken.
#[derive(Debug, Clone, Copy)]
pub struct ModeController {
    step_timeout: Duration,
}

impl ModeController {
    /// Create a controller that waits at most `step_timeout` for the
    /// precondition indicator before interacting.
    #[must_use]
    pub fn new(step_timeout: Duration) -> Self {
        Self { step_timeout }
    }

    /// Read both mode indicators.
    ///
    /// # Errors
    ///
    /// Propagates driver failures from the panel.
    pub async fn observe<P: ControlPanel>(
        &self,
        panel: &P,
    ) -> Result<ObservedSignal, ActuationError> {
        Ok(ObservedSignal {
            saw_auto_indicator: panel.is_indicator_present(Indicator::Auto).await?,
            saw_stop_indicator: panel.is_indicator_present(Indicator::Stop).await?,
        })
    }

    /// Bring the appliance to `target` if, and only if, the current mode is
    /// known to be the opposite one.
    ///
    /// The caller must acknowledge the confirmation prompt when the returned
    /// outcome reports an action.
    ///
    /// # Errors
    ///
    /// Returns [`ActuationError`] when the precondition indicator does not
    /// become visible in time or when the selector cannot be operated.
    #[tracing::instrument(skip(self, panel))]
    pub async fn transition<P: ControlPanel>(
        &self,
        panel: &P,
        target: Mode,
    ) -> Result<TransitionOutcome, ActuationError> {
        let signal = self.observe(panel).await?;
        let before = signal.state();
        tracing::debug!(
            saw_auto = signal.saw_auto_indicator,
            saw_stop = signal.saw_stop_indicator,
            state = %before,
            "mode scan"
        );

        match Decision::for_target(target, before) {
            Decision::AlreadySatisfied => {
                tracing::info!(state = %before, "already in requested mode, no action");
                Ok(TransitionOutcome::unchanged(before))
            }
            Decision::Indeterminate => {
                tracing::warn!(
                    saw_auto = signal.saw_auto_indicator,
                    saw_stop = signal.saw_stop_indicator,
                    "cannot determine current mode, no action"
                );
                Ok(TransitionOutcome::unchanged(ApplianceState::Unknown))
            }
            Decision::Switch => {
                let current = Indicator::showing(target.opposite());
                panel
                    .wait_indicator_visible(current, self.step_timeout)
                    .await?;
                panel.open_mode_selector(current).await?;
                panel.select_mode(target).await?;
                tracing::info!(from = %before, "mode change requested");
                Ok(TransitionOutcome::switched(target))
            }
        }
    }
}
