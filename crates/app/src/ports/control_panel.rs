//! Control-panel port: the UI-automation capability the controller drives.
//!
//! Adapters implement these traits on top of a browser automation driver.
//! The core never sees elements, selectors or pages; it only asks whether an
//! indicator is present, waits for it, and operates the mode selector.

use std::future::Future;
use std::time::Duration;

use okofen_domain::error::ActuationError;
use okofen_domain::mode::Mode;

/// One of the two mode indicators shown at the top of the heating circuit page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Shown while the circuit runs in automatic mode.
    Auto,
    /// Shown while the circuit is stopped.
    Stop,
}

impl Indicator {
    /// The indicator displayed while the appliance is in `mode`.
    #[must_use]
    pub fn showing(mode: Mode) -> Self {
        match mode {
            Mode::On => Self::Auto,
            Mode::Off => Self::Stop,
        }
    }
}

/// Operations needed to read and change the operating mode on an open page.
pub trait ControlPanel: Send + Sync {
    /// Whether `indicator` is present on the page right now. Never waits.
    fn is_indicator_present(
        &self,
        indicator: Indicator,
    ) -> impl Future<Output = Result<bool, ActuationError>> + Send;

    /// Wait until `indicator` is actually visible.
    ///
    /// Fails with [`ActuationError::NotVisible`] after `timeout`.
    fn wait_indicator_visible(
        &self,
        indicator: Indicator,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), ActuationError>> + Send;

    /// Open the mode selector by activating `indicator`.
    fn open_mode_selector(
        &self,
        indicator: Indicator,
    ) -> impl Future<Output = Result<(), ActuationError>> + Send;

    /// Choose `target` in the open mode selector.
    fn select_mode(&self, target: Mode) -> impl Future<Output = Result<(), ActuationError>> + Send;
}

/// An authenticated interaction with the appliance, from login to close.
pub trait PanelSession: ControlPanel {
    /// Authenticate on the login page.
    fn login(&self) -> impl Future<Output = Result<(), ActuationError>> + Send;

    /// Navigate to the heating circuit page that shows the mode indicators.
    fn open_heating_circuit(&self) -> impl Future<Output = Result<(), ActuationError>> + Send;

    /// Acknowledge the confirmation prompt that follows a mode change.
    ///
    /// Only valid after [`ControlPanel::select_mode`]; no prompt exists
    /// otherwise.
    fn confirm(&self, timeout: Duration) -> impl Future<Output = Result<(), ActuationError>> + Send;

    /// Navigate back to the home page, if a link to it is shown.
    fn return_home(&self) -> impl Future<Output = Result<(), ActuationError>> + Send;

    /// Tear the session down, releasing the browser.
    fn close(self) -> impl Future<Output = Result<(), ActuationError>> + Send;
}

/// Factory for fresh [`PanelSession`]s. Every command opens its own session.
pub trait PanelDriver: Send + Sync {
    type Session: PanelSession;

    /// Open a new browser session on the appliance.
    fn open_session(&self) -> impl Future<Output = Result<Self::Session, ActuationError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_mode_to_displayed_indicator() {
        assert_eq!(Indicator::showing(Mode::On), Indicator::Auto);
        assert_eq!(Indicator::showing(Mode::Off), Indicator::Stop);
    }
}
