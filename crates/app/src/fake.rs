//! In-memory control panel used by the service tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use okofen_domain::error::ActuationError;
use okofen_domain::mode::Mode;

use crate::ports::{ControlPanel, Indicator, PanelDriver, PanelSession};

#[derive(Debug, Default)]
struct Panel {
    auto: bool,
    stop: bool,
    pending: Option<Mode>,
    fail_at: Option<&'static str>,
    calls: Vec<String>,
}

/// A simulated appliance whose displayed mode survives across sessions.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeAppliance {
    panel: Arc<Mutex<Panel>>,
}

impl FakeAppliance {
    /// Appliance whose page shows the given indicators.
    pub(crate) fn showing(auto: bool, stop: bool) -> Self {
        let appliance = Self::default();
        {
            let mut panel = appliance.lock();
            panel.auto = auto;
            panel.stop = stop;
        }
        appliance
    }

    pub(crate) fn in_mode(mode: Mode) -> Self {
        Self::showing(mode == Mode::On, mode == Mode::Off)
    }

    /// Make the step named `step` fail.
    pub(crate) fn failing_at(self, step: &'static str) -> Self {
        self.lock().fail_at = Some(step);
        self
    }

    /// Interactions recorded so far (observations are not recorded).
    pub(crate) fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub(crate) fn indicators(&self) -> (bool, bool) {
        let panel = self.lock();
        (panel.auto, panel.stop)
    }

    pub(crate) fn session(&self) -> FakeSession {
        FakeSession(self.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Panel> {
        self.panel.lock().unwrap()
    }

    fn step(&self, name: impl Into<String>) -> Result<(), ActuationError> {
        let name = name.into();
        let mut panel = self.lock();
        panel.calls.push(name.clone());
        match panel.fail_at {
            Some(step) if step == name => Err(ActuationError::NotVisible {
                step,
                timeout: Duration::ZERO,
            }),
            _ => Ok(()),
        }
    }
}

fn indicator_name(indicator: Indicator) -> &'static str {
    match indicator {
        Indicator::Auto => "auto",
        Indicator::Stop => "stop",
    }
}

pub(crate) struct FakeSession(FakeAppliance);

impl ControlPanel for FakeSession {
    async fn is_indicator_present(&self, indicator: Indicator) -> Result<bool, ActuationError> {
        let panel = self.0.lock();
        Ok(match indicator {
            Indicator::Auto => panel.auto,
            Indicator::Stop => panel.stop,
        })
    }

    async fn wait_indicator_visible(
        &self,
        indicator: Indicator,
        timeout: Duration,
    ) -> Result<(), ActuationError> {
        self.0.step(format!("wait:{}", indicator_name(indicator)))?;
        if self.is_indicator_present(indicator).await? {
            Ok(())
        } else {
            Err(ActuationError::NotVisible {
                step: "mode indicator",
                timeout,
            })
        }
    }

    async fn open_mode_selector(&self, indicator: Indicator) -> Result<(), ActuationError> {
        self.0.step(format!("open_selector:{}", indicator_name(indicator)))
    }

    async fn select_mode(&self, target: Mode) -> Result<(), ActuationError> {
        self.0.step(format!("select:{target}"))?;
        self.0.lock().pending = Some(target);
        Ok(())
    }
}

impl PanelSession for FakeSession {
    async fn login(&self) -> Result<(), ActuationError> {
        self.0.step("login")
    }

    async fn open_heating_circuit(&self) -> Result<(), ActuationError> {
        self.0.step("open_heating_circuit")
    }

    async fn confirm(&self, timeout: Duration) -> Result<(), ActuationError> {
        self.0.step("confirm")?;
        let mut panel = self.0.lock();
        let Some(target) = panel.pending.take() else {
            return Err(ActuationError::NotVisible {
                step: "confirmation button",
                timeout,
            });
        };
        panel.auto = target == Mode::On;
        panel.stop = target == Mode::Off;
        Ok(())
    }

    async fn return_home(&self) -> Result<(), ActuationError> {
        self.0.step("home")
    }

    async fn close(self) -> Result<(), ActuationError> {
        self.0.step("close")
    }
}

impl PanelDriver for FakeAppliance {
    type Session = FakeSession;

    async fn open_session(&self) -> Result<FakeSession, ActuationError> {
        self.step("open")?;
        Ok(self.session())
    }
}
